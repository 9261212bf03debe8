//! Manifest parsers: `package.json` and `requirements*.txt`

use super::{DependencyError, DependencyParser};
use serde::Deserialize;

/// Base name of a path, accepting both separators
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
}

/// npm `package.json`: `dependencies` followed by `devDependencies`
pub struct PackageJsonParser;

#[derive(Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: Option<serde_json::Map<String, serde_json::Value>>,
}

impl DependencyParser for PackageJsonParser {
    fn name(&self) -> &'static str {
        "package.json"
    }

    fn can_parse(&self, filename: &str) -> bool {
        base_name(filename).eq_ignore_ascii_case("package.json")
    }

    fn parse(&self, content: &str) -> Result<Vec<String>, DependencyError> {
        let manifest: PackageJson =
            serde_json::from_str(content).map_err(|source| DependencyError::InvalidJson {
                manifest: self.name(),
                source,
            })?;

        let mut names: Vec<String> = manifest.dependencies.iter().flat_map(|m| m.keys()).cloned().collect();
        for name in manifest.dev_dependencies.iter().flat_map(|m| m.keys()) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        Ok(names)
    }
}

/// pip requirements files (`requirements.txt`, `requirements-dev.txt`, ...)
pub struct RequirementsParser;

/// Version specifiers and markers that end a requirement's package name
const REQUIREMENT_DELIMITERS: &[&str] = &["==", ">=", "<=", "~=", "!=", "<", ">", "[", ";", "@", " "];

impl RequirementsParser {
    fn package_name(line: &str) -> Option<&str> {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() || line.starts_with('-') {
            return None;
        }

        let end = REQUIREMENT_DELIMITERS
            .iter()
            .filter_map(|delim| line.find(delim))
            .min()
            .unwrap_or(line.len());
        let name = line[..end].trim();
        (!name.is_empty()).then_some(name)
    }
}

impl DependencyParser for RequirementsParser {
    fn name(&self) -> &'static str {
        "requirements.txt"
    }

    fn can_parse(&self, filename: &str) -> bool {
        let name = base_name(filename).to_ascii_lowercase();
        name.starts_with("requirements") && name.ends_with(".txt")
    }

    fn parse(&self, content: &str) -> Result<Vec<String>, DependencyError> {
        let mut names: Vec<String> = Vec::new();
        for name in content.lines().filter_map(Self::package_name) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_json_can_parse() {
        let parser = PackageJsonParser;
        assert!(parser.can_parse("package.json"));
        assert!(parser.can_parse("apps/web/package.json"));
        assert!(parser.can_parse("C:\\code\\app\\package.json"));
        assert!(!parser.can_parse("package-lock.json"));
        assert!(!parser.can_parse("requirements.txt"));
    }

    #[test]
    fn test_package_json_merges_dependencies_and_dev_dependencies() {
        let content = r#"{
            "name": "shop",
            "dependencies": { "react": "^19.0.0", "next": "15.1.0" },
            "devDependencies": { "vitest": "^3.0.0", "react": "^19.0.0" }
        }"#;
        let names = PackageJsonParser.parse(content).unwrap();
        assert_eq!(names, vec!["react", "next", "vitest"]);
    }

    #[test]
    fn test_package_json_without_dependencies() {
        let names = PackageJsonParser.parse(r#"{ "name": "empty" }"#).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_package_json_null_sections() {
        let names = PackageJsonParser
            .parse(r#"{ "dependencies": null, "devDependencies": { "vitest": "^3.0.0" } }"#)
            .unwrap();
        assert_eq!(names, vec!["vitest"]);
    }

    #[test]
    fn test_package_json_invalid() {
        let err = PackageJsonParser.parse("{ not json").unwrap_err();
        assert!(matches!(err, DependencyError::InvalidJson { .. }));
    }

    #[test]
    fn test_requirements_can_parse() {
        let parser = RequirementsParser;
        assert!(parser.can_parse("requirements.txt"));
        assert!(parser.can_parse("backend/requirements-dev.txt"));
        assert!(!parser.can_parse("requirements.in"));
        assert!(!parser.can_parse("package.json"));
    }

    #[test]
    fn test_requirements_strips_specifiers_and_comments() {
        let content = "\
# web
Django==5.1.2
fastapi>=0.110
pytest<=8.0  # tests

-r base.txt
ruff~=0.6
uvicorn[standard]>=0.30
psycopg2-binary ; python_version > '3.8'
requests
Django==5.1.2
";
        let names = RequirementsParser.parse(content).unwrap();
        assert_eq!(
            names,
            vec![
                "Django",
                "fastapi",
                "pytest",
                "ruff",
                "uvicorn",
                "psycopg2-binary",
                "requests"
            ]
        );
    }

    #[test]
    fn test_requirements_empty_file() {
        assert!(RequirementsParser.parse("\n# only comments\n\n").unwrap().is_empty());
    }
}

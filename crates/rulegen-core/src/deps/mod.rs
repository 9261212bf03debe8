//! Dependency identification
//!
//! Turns dependency manifests into a library selection:
//! - Pluggable manifest parsers (`package.json`, `requirements*.txt`)
//! - A package name → library lookup table
//! - Directory scanning for manifests

pub mod mapping;
pub mod parsers;
pub mod scan;

use crate::taxonomy::LibraryId;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

pub use mapping::DependencyMap;
pub use parsers::{PackageJsonParser, RequirementsParser};
pub use scan::scan_manifests;

/// Manifest parsing failures
#[derive(Debug, thiserror::Error)]
pub enum DependencyError {
    #[error("invalid {manifest}")]
    InvalidJson {
        manifest: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported dependency file '{0}' (expected package.json or requirements.txt)")]
    Unsupported(String),
}

/// A manifest format that yields package names
pub trait DependencyParser: Send + Sync {
    /// Format name used in messages
    fn name(&self) -> &'static str;

    /// Whether this parser understands the given file name or path
    fn can_parse(&self, filename: &str) -> bool;

    /// Package names in manifest order, without duplicates
    fn parse(&self, content: &str) -> Result<Vec<String>, DependencyError>;
}

static PARSERS: &[&dyn DependencyParser] = &[&PackageJsonParser, &RequirementsParser];

/// First registered parser that accepts the file name
pub fn parser_for(filename: &str) -> Option<&'static dyn DependencyParser> {
    PARSERS.iter().copied().find(|p| p.can_parse(filename))
}

/// Parse manifest content with the parser matching its file name
pub fn parse_manifest(filename: &str, content: &str) -> Result<Vec<String>, DependencyError> {
    let parser =
        parser_for(filename).ok_or_else(|| DependencyError::Unsupported(filename.to_string()))?;
    parser.parse(content)
}

/// Map package names to libraries, dropping unknown packages and keeping first-seen order
pub fn map_dependencies_to_libraries<S: AsRef<str>>(
    map: &DependencyMap,
    names: &[S],
) -> Vec<LibraryId> {
    let mut libraries: Vec<LibraryId> = Vec::new();
    for name in names {
        match map.lookup(name.as_ref()) {
            Some(library) if !libraries.contains(library) => libraries.push(library.clone()),
            Some(_) => {}
            None => {
                tracing::trace!(package = name.as_ref(), "no library for package");
            }
        }
    }
    libraries
}

/// One manifest and what was identified in it
#[derive(Debug, Clone)]
pub struct DetectedManifest {
    pub path: PathBuf,
    pub packages: Vec<String>,
    pub libraries: Vec<LibraryId>,
}

/// Read and identify a single manifest file
pub async fn detect_file(map: &DependencyMap, path: &Path) -> Result<DetectedManifest> {
    let filename = path.to_string_lossy();
    if parser_for(&filename).is_none() {
        return Err(DependencyError::Unsupported(path.display().to_string()).into());
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let packages = parse_manifest(&filename, &content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let libraries = map_dependencies_to_libraries(map, &packages);

    tracing::debug!(
        path = %path.display(),
        packages = packages.len(),
        libraries = libraries.len(),
        "identified dependencies"
    );
    Ok(DetectedManifest {
        path: path.to_path_buf(),
        packages,
        libraries,
    })
}

/// Identify a manifest file, or every supported manifest under a directory.
///
/// An explicit file must parse; manifests found by a directory scan that fail to read or
/// parse are logged and skipped.
pub async fn detect(map: &DependencyMap, path: &Path) -> Result<Vec<DetectedManifest>> {
    if path.is_dir() {
        let mut detected = Vec::new();
        for manifest in scan_manifests(path)? {
            match detect_file(map, &manifest).await {
                Ok(found) => detected.push(found),
                Err(e) => {
                    tracing::warn!(path = %manifest.display(), error = %format!("{:#}", e), "skipping manifest");
                }
            }
        }
        Ok(detected)
    } else {
        Ok(vec![detect_file(map, path).await?])
    }
}

/// Combined selection across manifests, de-duplicated in discovery order
pub fn selection_from(detected: &[DetectedManifest]) -> Vec<LibraryId> {
    let mut selection: Vec<LibraryId> = Vec::new();
    for library in detected.iter().flat_map(|d| d.libraries.iter()) {
        if !selection.contains(library) {
            selection.push(library.clone());
        }
    }
    selection
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_for() {
        assert_eq!(parser_for("package.json").map(|p| p.name()), Some("package.json"));
        assert_eq!(
            parser_for("requirements.txt").map(|p| p.name()),
            Some("requirements.txt")
        );
        assert!(parser_for("Cargo.toml").is_none());
    }

    #[test]
    fn test_parse_manifest_unsupported() {
        let err = parse_manifest("Gemfile", "gem 'rails'").unwrap_err();
        assert!(matches!(err, DependencyError::Unsupported(_)));
    }

    #[test]
    fn test_map_dependencies_dedupes_and_drops_unknown() {
        let map = DependencyMap::builtin();
        let names = ["react", "left-pad", "react-dom", "@prisma/client", "prisma", "vitest"];
        let libraries = map_dependencies_to_libraries(&map, &names);
        assert_eq!(
            libraries,
            vec![
                LibraryId::from("REACT_CODING_STANDARDS"),
                LibraryId::from("PRISMA"),
                LibraryId::from("VITEST"),
            ]
        );
    }

    #[tokio::test]
    async fn test_detect_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        std::fs::write(&path, "fastapi==0.115\nunknown-pkg\npytest\n").unwrap();

        let detected = detect_file(&DependencyMap::builtin(), &path).await.unwrap();
        assert_eq!(detected.packages.len(), 3);
        assert_eq!(
            detected.libraries,
            vec![LibraryId::from("FASTAPI"), LibraryId::from("PYTEST")]
        );
    }

    #[tokio::test]
    async fn test_detect_rejects_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        std::fs::write(&path, "[package]\n").unwrap();

        assert!(detect_file(&DependencyMap::builtin(), &path).await.is_err());
    }

    #[test]
    fn test_invalid_json_message_names_manifest_once() {
        let err = parse_manifest("package.json", "{ not json").unwrap_err();
        assert_eq!(err.to_string(), "invalid package.json");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_detect_directory_skips_broken_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{ "dependencies": { "react": "19" } }"#,
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("fixtures/broken")).unwrap();
        std::fs::write(dir.path().join("fixtures/broken/package.json"), "{ not json").unwrap();

        let detected = detect(&DependencyMap::builtin(), dir.path()).await.unwrap();
        assert_eq!(detected.len(), 1);
        assert_eq!(
            selection_from(&detected),
            vec![LibraryId::from("REACT_CODING_STANDARDS")]
        );

        // Pointing at the broken file directly still fails
        let broken = dir.path().join("fixtures/broken/package.json");
        assert!(detect(&DependencyMap::builtin(), &broken).await.is_err());
    }

    #[tokio::test]
    async fn test_detect_directory_combines_selection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{ "dependencies": { "react": "19" }, "devDependencies": { "vitest": "3" } }"#,
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("api")).unwrap();
        std::fs::write(dir.path().join("api/requirements.txt"), "fastapi\npytest\n").unwrap();

        let detected = detect(&DependencyMap::builtin(), dir.path()).await.unwrap();
        assert_eq!(detected.len(), 2);

        let selection = selection_from(&detected);
        assert_eq!(selection.len(), 4);
        assert!(selection.contains(&LibraryId::from("REACT_CODING_STANDARDS")));
        assert!(selection.contains(&LibraryId::from("FASTAPI")));
    }
}

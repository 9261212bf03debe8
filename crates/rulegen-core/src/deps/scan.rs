//! Project directory scanning for dependency manifests

use super::parser_for;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// How deep below the project root manifests are searched for
const MAX_SCAN_DEPTH: usize = 4;

/// Directories that hold installed or generated code, never project manifests
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "target",
    "dist",
    "build",
    ".venv",
    "venv",
    "__pycache__",
    ".next",
    ".nuxt",
];

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Supported manifests under `root`, shallowest first
pub fn scan_manifests(root: &Path) -> Result<Vec<PathBuf>> {
    let mut manifests = Vec::new();

    let walker = WalkDir::new(root)
        .max_depth(MAX_SCAN_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_manifest = parser_for(&entry.file_name().to_string_lossy()).is_some();
        if is_manifest {
            manifests.push((entry.depth(), entry.into_path()));
        }
    }

    // Stable sort keeps file-name order within a depth
    manifests.sort_by_key(|(depth, _)| *depth);
    Ok(manifests.into_iter().map(|(_, path)| path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_finds_manifests_and_skips_vendored_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("package.json"), "{}").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();
        fs::create_dir_all(root.join("services/api")).unwrap();
        fs::write(root.join("services/api/requirements.txt"), "fastapi").unwrap();
        fs::create_dir_all(root.join("node_modules/react")).unwrap();
        fs::write(root.join("node_modules/react/package.json"), "{}").unwrap();
        fs::create_dir_all(root.join(".venv/lib")).unwrap();
        fs::write(root.join(".venv/lib/requirements.txt"), "six").unwrap();

        let found = scan_manifests(root).unwrap();
        assert_eq!(
            found,
            vec![
                root.join("package.json"),
                root.join("services/api/requirements.txt")
            ]
        );
    }

    #[test]
    fn test_scan_respects_max_depth() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("a/b/c/d/e");
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("package.json"), "{}").unwrap();

        assert!(scan_manifests(dir.path()).unwrap().is_empty());
    }
}

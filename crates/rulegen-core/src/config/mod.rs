//! Project configuration file (`rulegen.yaml`)
//!
//! Every field is optional. Relative paths are resolved against the directory holding the file,
//! and command-line flags override whatever the file sets.

use crate::generate::ProjectInfo;
use crate::taxonomy::LibraryId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// File looked up in the working directory when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "rulegen.yaml";

/// Where documents are written when neither the file nor a flag says otherwise
pub const DEFAULT_OUTPUT_DIR: &str = ".ai/rules";

/// Contents of `rulegen.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub project: ProjectInfo,
    /// Libraries selected in addition to anything detected from manifests
    pub libraries: Vec<LibraryId>,
    /// Dependency manifests (files or directories) to identify libraries from
    pub manifests: Vec<PathBuf>,
    pub multi_file: bool,
    pub catalog_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl ProjectConfig {
    /// Parse config content; relative paths are resolved against `base_dir`
    pub fn from_yaml(content: &str, base_dir: &Path) -> Result<Self> {
        let config: ProjectConfig =
            serde_yaml::from_str(content).context("Failed to parse project config")?;
        Ok(config.resolve_paths(base_dir))
    }

    /// Load a config file. A missing file yields the defaults.
    pub async fn load(path: &Path) -> Result<Self> {
        let exists = fs::try_exists(path)
            .await
            .with_context(|| format!("Failed to check {}", path.display()))?;
        if !exists {
            tracing::debug!(path = %path.display(), "no project config, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_yaml(&content, base_dir)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load the explicitly named config (which must exist) or `rulegen.yaml` in `cwd`
    pub async fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        match explicit {
            Some(path) => {
                let exists = fs::try_exists(path)
                    .await
                    .with_context(|| format!("Failed to check {}", path.display()))?;
                if !exists {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::load(path).await
            }
            None => Self::load(&cwd.join(CONFIG_FILE_NAME)).await,
        }
    }

    fn resolve_paths(mut self, base_dir: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base_dir.join(p) };
        self.manifests = self.manifests.into_iter().map(resolve).collect();
        self.catalog_dir = self.catalog_dir.map(resolve);
        self.output_dir = self.output_dir.map(resolve);
        self
    }

    /// Project metadata with the name falling back to the directory name
    pub fn project_info(&self, cwd: &Path) -> ProjectInfo {
        let name = if self.project.name.trim().is_empty() {
            default_project_name(cwd)
        } else {
            self.project.name.clone()
        };
        ProjectInfo::new(name, self.project.description.clone())
    }

    pub fn output_dir_or_default(&self, cwd: &Path) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_OUTPUT_DIR))
    }
}

/// Last component of `dir`, or `project` when it has none (e.g. `/`)
pub fn default_project_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "project".to_string())
}

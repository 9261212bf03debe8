//! Catalog manifest types and parsing

use crate::taxonomy::{LayerId, LibraryId, StackId};
use serde::{Deserialize, Serialize};

fn default_taxonomy_path() -> String {
    "taxonomy.yaml".to_string()
}

/// Root catalog manifest (`catalog.yaml`)
/// Points at the taxonomy file and the partial rule files merged into one catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootManifest {
    /// Semver of the oldest rulegen release that understands this catalog
    pub version: String,

    /// Taxonomy file, relative to the catalog directory
    #[serde(default = "default_taxonomy_path")]
    pub taxonomy: String,

    /// Partial rule files, merged in order
    #[serde(default)]
    pub rules: Vec<String>,
}

/// Taxonomy file: the layer → stack and stack → library maps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyFile {
    #[serde(default)]
    pub layers: Vec<LayerEntry>,

    #[serde(default)]
    pub stacks: Vec<StackEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerEntry {
    pub id: LayerId,

    /// Heading text; the id is used when absent
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub stacks: Vec<StackId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackEntry {
    pub id: StackId,

    /// Heading text; the id is used when absent
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub libraries: Vec<LibraryId>,
}

/// One library's rules inside a partial rule file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    pub library: LibraryId,

    #[serde(default)]
    pub rules: Vec<String>,
}

//! Catalog loading, validation, and reporting
//!
//! This module provides:
//! - Catalog manifest types (RootManifest, TaxonomyFile, RuleEntry)
//! - Loading from the embedded catalog or a local directory override
//! - Fail-fast validation of duplicate and dangling identifiers
//! - Version compatibility checking

pub mod manifest;
pub mod version;

use crate::generate::RulesGenerator;
use crate::rules::RuleCatalog;
use crate::taxonomy::{Layer, LibraryId, Stack, StackId, Taxonomy};
use colored::Colorize;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

pub use manifest::{LayerEntry, RootManifest, RuleEntry, StackEntry, TaxonomyFile};
pub use version::check_compatibility;

/// Environment variable pointing at a local catalog directory
pub const CATALOG_DIR_ENV: &str = "RULEGEN_CATALOG_DIR";

/// Root manifest file name inside a catalog directory
pub const ROOT_MANIFEST: &str = "catalog.yaml";

/// Catalog files compiled into the binary, keyed by their path inside the catalog directory
const EMBEDDED_FILES: &[(&str, &str)] = &[
    ("catalog.yaml", include_str!("../../catalog/catalog.yaml")),
    ("taxonomy.yaml", include_str!("../../catalog/taxonomy.yaml")),
    (
        "rules/frontend.yaml",
        include_str!("../../catalog/rules/frontend.yaml"),
    ),
    (
        "rules/backend.yaml",
        include_str!("../../catalog/rules/backend.yaml"),
    ),
    (
        "rules/database.yaml",
        include_str!("../../catalog/rules/database.yaml"),
    ),
    (
        "rules/devops.yaml",
        include_str!("../../catalog/rules/devops.yaml"),
    ),
    (
        "rules/testing.yaml",
        include_str!("../../catalog/rules/testing.yaml"),
    ),
    (
        "rules/coding.yaml",
        include_str!("../../catalog/rules/coding.yaml"),
    ),
];

/// Catalog loading and validation failures
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("catalog file '{0}' is not part of the built-in catalog")]
    MissingEmbedded(String),
    #[error("layer '{0}' is declared more than once")]
    DuplicateLayer(String),
    #[error("stack '{0}' is declared more than once")]
    DuplicateStack(String),
    #[error("stack '{stack}' is listed twice in layer '{layer}'")]
    DuplicateLayerStack { layer: String, stack: String },
    #[error("layer '{layer}' references undeclared stack '{stack}'")]
    UnknownStack { layer: String, stack: String },
    #[error("library '{library}' is listed twice in stack '{stack}'")]
    DuplicateLibrary { stack: String, library: String },
    #[error("rules for '{library}' are declared in both {first} and {second}")]
    DuplicateRules {
        library: String,
        first: String,
        second: String,
    },
}

/// Where catalog files are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The catalog compiled into the binary
    Embedded,
    /// A directory laid out like the built-in catalog
    Local(PathBuf),
}

impl CatalogSource {
    /// Pick the catalog source: explicit flag, then environment variable, then config file
    pub fn resolve(explicit: Option<PathBuf>, configured: Option<PathBuf>) -> Self {
        Self::resolve_with(explicit, std::env::var(CATALOG_DIR_ENV).ok(), configured)
    }

    fn resolve_with(
        explicit: Option<PathBuf>,
        from_env: Option<String>,
        configured: Option<PathBuf>,
    ) -> Self {
        if let Some(dir) = explicit {
            return Self::Local(dir);
        }
        if let Some(dir) = from_env.filter(|d| !d.trim().is_empty()) {
            return Self::Local(PathBuf::from(dir));
        }
        configured.map(Self::Local).unwrap_or(Self::Embedded)
    }

    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Embedded => "built-in".to_string(),
            CatalogSource::Local(dir) => dir.display().to_string(),
        }
    }

    fn read(&self, path: &str) -> Result<String, CatalogError> {
        match self {
            CatalogSource::Embedded => EMBEDDED_FILES
                .iter()
                .find(|(name, _)| *name == path)
                .map(|(_, content)| content.to_string())
                .ok_or_else(|| CatalogError::MissingEmbedded(path.to_string())),
            CatalogSource::Local(dir) => {
                let full_path = dir.join(path);
                std::fs::read_to_string(&full_path).map_err(|source| CatalogError::Read {
                    path: full_path.display().to_string(),
                    source,
                })
            }
        }
    }

    fn read_yaml<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let content = self.read(path)?;
        serde_yaml::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.to_string(),
            source,
        })
    }
}

/// Taxonomy and rules loaded together, read-only after construction
#[derive(Debug, Clone)]
pub struct Catalog {
    pub version: String,
    pub taxonomy: Taxonomy,
    pub rules: RuleCatalog,
    pub source: CatalogSource,
}

impl Catalog {
    /// Load and validate a catalog
    pub fn load(source: &CatalogSource) -> Result<Self, CatalogError> {
        let root: RootManifest = source.read_yaml(ROOT_MANIFEST)?;
        let taxonomy_file: TaxonomyFile = source.read_yaml(&root.taxonomy)?;

        let mut rule_files = Vec::with_capacity(root.rules.len());
        for path in &root.rules {
            let entries: Vec<RuleEntry> = source.read_yaml(path)?;
            rule_files.push((path.clone(), entries));
        }

        let catalog = Self {
            version: root.version,
            taxonomy: build_taxonomy(taxonomy_file)?,
            rules: merge_rules(rule_files)?,
            source: source.clone(),
        };
        tracing::debug!(
            source = %catalog.source.describe(),
            version = %catalog.version,
            layers = catalog.taxonomy.layers().len(),
            documented = catalog.rules.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::load(&CatalogSource::Embedded)
    }

    pub fn generator(&self) -> RulesGenerator<'_> {
        RulesGenerator::new(&self.taxonomy, &self.rules)
    }

    /// Warning text when this catalog expects a newer CLI
    pub fn compatibility_warning(&self, cli_version: &str, upgrade_command: &str) -> Option<String> {
        let warning = check_compatibility(cli_version, &self.version, upgrade_command);
        if warning.is_some() {
            tracing::warn!(
                catalog = %self.version,
                cli = cli_version,
                "catalog expects a newer rulegen"
            );
        }
        warning
    }

    /// Summary of gaps a catalog author should know about
    pub fn report(&self) -> CatalogReport {
        let libraries = self.taxonomy.libraries();
        let placed: HashSet<&LibraryId> = libraries.iter().copied().collect();

        CatalogReport {
            source: self.source.describe(),
            version: self.version.clone(),
            layers: self.taxonomy.layers().len(),
            stacks: self.taxonomy.stacks().len(),
            libraries: libraries.len(),
            documented: libraries
                .iter()
                .filter(|l| self.rules.contains(l))
                .count(),
            rules: self.rules.rule_count(),
            orphan_stacks: self.taxonomy.orphan_stacks().into_iter().cloned().collect(),
            undocumented: libraries
                .iter()
                .filter(|l| !self.rules.contains(l))
                .map(|l| (*l).clone())
                .collect(),
            unplaced_rules: self
                .rules
                .libraries()
                .into_iter()
                .filter(|l| !placed.contains(l))
                .cloned()
                .collect(),
        }
    }
}

/// Validate the taxonomy file and build the lookup structure
pub fn build_taxonomy(file: TaxonomyFile) -> Result<Taxonomy, CatalogError> {
    let mut stacks = Vec::with_capacity(file.stacks.len());
    let mut declared: HashSet<StackId> = HashSet::new();
    for entry in file.stacks {
        if !declared.insert(entry.id.clone()) {
            return Err(CatalogError::DuplicateStack(entry.id.to_string()));
        }
        let mut seen: HashSet<&LibraryId> = HashSet::new();
        for library in &entry.libraries {
            if !seen.insert(library) {
                return Err(CatalogError::DuplicateLibrary {
                    stack: entry.id.to_string(),
                    library: library.to_string(),
                });
            }
        }
        stacks.push(Stack {
            name: entry.name.unwrap_or_else(|| entry.id.to_string()),
            id: entry.id,
            libraries: entry.libraries,
        });
    }

    let mut layers = Vec::with_capacity(file.layers.len());
    let mut layer_ids = HashSet::new();
    for entry in file.layers {
        if !layer_ids.insert(entry.id.clone()) {
            return Err(CatalogError::DuplicateLayer(entry.id.to_string()));
        }
        let mut seen: HashSet<&StackId> = HashSet::new();
        for stack in &entry.stacks {
            if !declared.contains(stack) {
                return Err(CatalogError::UnknownStack {
                    layer: entry.id.to_string(),
                    stack: stack.to_string(),
                });
            }
            if !seen.insert(stack) {
                return Err(CatalogError::DuplicateLayerStack {
                    layer: entry.id.to_string(),
                    stack: stack.to_string(),
                });
            }
        }
        layers.push(Layer {
            name: entry.name.unwrap_or_else(|| entry.id.to_string()),
            id: entry.id,
            stacks: entry.stacks,
        });
    }

    Ok(Taxonomy::new(layers, stacks))
}

/// Merge partial rule files; a library may be documented in only one place
pub fn merge_rules(parts: Vec<(String, Vec<RuleEntry>)>) -> Result<RuleCatalog, CatalogError> {
    let mut rules: HashMap<LibraryId, Vec<String>> = HashMap::new();
    let mut origin: HashMap<LibraryId, String> = HashMap::new();

    for (path, entries) in parts {
        for entry in entries {
            if let Some(first) = origin.get(&entry.library) {
                return Err(CatalogError::DuplicateRules {
                    library: entry.library.to_string(),
                    first: first.clone(),
                    second: path,
                });
            }
            origin.insert(entry.library.clone(), path.clone());
            rules.insert(entry.library, entry.rules);
        }
    }

    Ok(RuleCatalog::new(rules))
}

/// Result of [`Catalog::report`]
#[derive(Debug, Clone)]
pub struct CatalogReport {
    pub source: String,
    pub version: String,
    pub layers: usize,
    pub stacks: usize,
    pub libraries: usize,
    pub documented: usize,
    pub rules: usize,
    /// Stacks no layer lists; their libraries never render
    pub orphan_stacks: Vec<StackId>,
    /// Libraries that render with the default rule
    pub undocumented: Vec<LibraryId>,
    /// Rules for libraries no stack lists
    pub unplaced_rules: Vec<LibraryId>,
}

impl CatalogReport {
    pub fn is_clean(&self) -> bool {
        self.orphan_stacks.is_empty() && self.undocumented.is_empty() && self.unplaced_rules.is_empty()
    }

    pub fn print(&self) {
        println!(
            "{}",
            format!("Catalog {} (version {})", self.source, self.version)
                .cyan()
                .bold()
        );
        println!();
        println!(
            "  {} {} layers, {} stacks, {} libraries",
            "->".blue(),
            self.layers,
            self.stacks,
            self.libraries
        );
        println!(
            "  {} {} of {} libraries documented ({} rules)",
            "->".blue(),
            self.documented,
            self.libraries,
            self.rules
        );

        for stack in &self.orphan_stacks {
            eprintln!(
                "{} Stack '{}' is not listed under any layer",
                "Warning:".yellow(),
                stack
            );
        }
        for library in &self.undocumented {
            eprintln!(
                "{} '{}' has no rules and will use the default rule",
                "Note:".dimmed(),
                library
            );
        }
        for library in &self.unplaced_rules {
            eprintln!(
                "{} Rules for '{}' are never rendered: no stack lists it",
                "Warning:".yellow(),
                library
            );
        }

        println!();
        if self.is_clean() {
            println!("{}", "Catalog is complete".green().bold());
        } else {
            println!("{}", "Catalog loaded with gaps".yellow().bold());
        }
    }
}

//! Rulegen Core - Composing AI assistant rules documents from a technology stack selection
//!
//! A selection is a flat list of library identifiers. The library groups it through the
//! Layer → Stack → Library taxonomy and renders Markdown rules, either as one document or as
//! one document per library.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Data** - The [`Taxonomy`], the [`RuleCatalog`] and the YAML [`Catalog`] that loads both
//! - **Layer 2: Composition** - Grouping and the single-file / multi-file generation strategies
//! - **Layer 3: Collaborators** - Dependency manifest identification, project config, export
//! - **Layer 4: CLI/TUI Interface** - The `generate` workflow and optional cliclack prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based interactive prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use rulegen_core::{Catalog, LibraryId, OutputMode, ProjectInfo};
//!
//! let catalog = Catalog::builtin()?;
//! let project = ProjectInfo::new("Shop", "Storefront and admin");
//! let selected = vec![LibraryId::from("NEXT_JS"), LibraryId::from("POSTGRES")];
//! let documents = catalog.generator().generate(&project, &selected, OutputMode::MultiFile);
//! ```

pub mod catalog;
pub mod config;
pub mod deps;
pub mod export;
pub mod generate;
pub mod grouping;
pub mod rules;
pub mod taxonomy;
pub mod workflow;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use catalog::{Catalog, CatalogError, CatalogReport, CatalogSource};
pub use config::ProjectConfig;
pub use deps::{DependencyError, DependencyMap, DetectedManifest};
pub use generate::{Document, GenerationStrategy, OutputMode, ProjectInfo, RulesGenerator};
pub use grouping::Grouping;
pub use rules::RuleCatalog;
pub use taxonomy::{LayerId, LibraryId, StackId, Taxonomy};
pub use workflow::GenerateArgs;

#[cfg(feature = "tui")]
pub use tui::run;

/// Suggested when a catalog expects a newer CLI
pub const UPGRADE_COMMAND: &str = "cargo install rulegen-tools --force";

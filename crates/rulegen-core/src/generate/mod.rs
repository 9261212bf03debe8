//! Rules document generation
//!
//! This module provides:
//! - The [`Document`] output type
//! - The [`GenerationStrategy`] trait with single-file and multi-file implementations
//! - [`RulesGenerator`], which groups a selection and dispatches to a strategy

pub mod multi;
pub mod single;
pub mod slug;

use crate::grouping::Grouping;
use crate::rules::RuleCatalog;
use crate::taxonomy::{LayerId, LibraryId, StackId, Taxonomy};
use serde::{Deserialize, Serialize};

pub use multi::MultiFileStrategy;
pub use single::SingleFileStrategy;
pub use slug::slugify;

/// Extension shared by every generated file
pub const FILE_EXTENSION: &str = "mdc";

/// Header-only document name (empty selection, or the first multi-file document)
pub const PROJECT_FILE_NAME: &str = "project.mdc";
pub const PROJECT_LABEL: &str = "Project";

/// Single-file document name
pub const RULES_FILE_NAME: &str = "rules.mdc";
pub const RULES_LABEL: &str = "All Rules";

/// Appended to the header when nothing is selected
pub const EMPTY_SELECTION_PLACEHOLDER: &str =
    "---\n\nSelect libraries in the rule builder or provide a dependency file to generate rules.\n";

/// One generated markdown artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub markdown: String,
    pub label: String,
    pub file_name: String,
}

impl Document {
    pub fn new(
        markdown: impl Into<String>,
        label: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            markdown: markdown.into(),
            label: label.into(),
            file_name: file_name.into(),
        }
    }
}

/// Free-text project metadata; no validation is applied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ProjectInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// `# AI Rules for <name>` followed by the description
    pub fn header(&self) -> String {
        format!("# AI Rules for {}\n\n{}\n\n", self.name, self.description)
    }
}

/// Everything a strategy needs to render a selection
pub struct GenerationContext<'a> {
    pub project: &'a ProjectInfo,
    pub selected: &'a [LibraryId],
    pub grouping: &'a Grouping,
    pub taxonomy: &'a Taxonomy,
    pub catalog: &'a RuleCatalog,
}

impl GenerationContext<'_> {
    /// `## <Layer>` heading
    pub fn layer_heading(&self, layer: &LayerId) -> String {
        format!("## {}\n\n", self.taxonomy.layer_name(layer))
    }

    /// `### Guidelines for <Stack>` heading
    pub fn stack_heading(&self, stack: &StackId) -> String {
        format!("### Guidelines for {}\n\n", self.taxonomy.stack_name(stack))
    }

    /// `#### <Library>` heading followed by its rules as a bullet list
    pub fn library_section(&self, library: &LibraryId) -> String {
        let mut section = format!("#### {}\n\n", library);
        for rule in self.catalog.rules_or_default(library).iter() {
            section.push_str("- ");
            section.push_str(rule);
            section.push('\n');
        }
        section.push('\n');
        section
    }

    /// Header document with the empty-selection placeholder
    pub fn placeholder_document(&self) -> Document {
        let mut markdown = self.project.header();
        markdown.push_str(EMPTY_SELECTION_PLACEHOLDER);
        Document::new(markdown, PROJECT_LABEL, PROJECT_FILE_NAME)
    }
}

/// Output shape for a generation run
pub trait GenerationStrategy {
    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Document>;
}

/// Which strategy to run; chosen by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    #[default]
    SingleFile,
    MultiFile,
}

impl OutputMode {
    pub fn from_multi_file(multi_file: bool) -> Self {
        if multi_file {
            Self::MultiFile
        } else {
            Self::SingleFile
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OutputMode::SingleFile => "Single file",
            OutputMode::MultiFile => "One file per library",
        }
    }
}

/// Groups a selection and renders it with the requested strategy
#[derive(Clone, Copy)]
pub struct RulesGenerator<'a> {
    taxonomy: &'a Taxonomy,
    catalog: &'a RuleCatalog,
}

impl<'a> RulesGenerator<'a> {
    pub fn new(taxonomy: &'a Taxonomy, catalog: &'a RuleCatalog) -> Self {
        Self { taxonomy, catalog }
    }

    pub fn generate(
        &self,
        project: &ProjectInfo,
        selected: &[LibraryId],
        mode: OutputMode,
    ) -> Vec<Document> {
        let grouping = Grouping::from_selection(self.taxonomy, selected);
        let ctx = GenerationContext {
            project,
            selected,
            grouping: &grouping,
            taxonomy: self.taxonomy,
            catalog: self.catalog,
        };

        let documents = match mode {
            OutputMode::SingleFile => SingleFileStrategy.generate(&ctx),
            OutputMode::MultiFile => MultiFileStrategy.generate(&ctx),
        };
        tracing::debug!(
            ?mode,
            selected = selected.len(),
            documents = documents.len(),
            "generated rules"
        );
        documents
    }
}

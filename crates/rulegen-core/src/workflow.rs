//! The `generate` workflow shared by the batch and interactive front ends
//!
//! [`Plan::prepare`] merges flags, the project config file and detected manifests into a
//! selection; [`emit`] delivers the generated documents.

use crate::catalog::{Catalog, CatalogSource};
use crate::config::ProjectConfig;
use crate::deps::{self, DependencyMap, DetectedManifest};
use crate::export;
use crate::generate::{Document, OutputMode, ProjectInfo};
use crate::rules::placeholders;
use crate::taxonomy::{LibraryId, Taxonomy};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Options of the `generate` command
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Library identifiers, matched case-insensitively against the catalog
    pub libraries: Option<Vec<String>>,
    /// Dependency manifests or directories to identify libraries from
    pub manifests: Vec<PathBuf>,
    /// Project directory scanned for manifests
    pub scan: Option<PathBuf>,
    pub multi_file: bool,
    pub output: Option<PathBuf>,
    pub zip: Option<PathBuf>,
    pub stdout: bool,
    pub json: bool,
    /// Skip prompts and accept detected defaults
    pub yes: bool,
    pub name: Option<String>,
    pub description: Option<String>,
    pub config: Option<PathBuf>,
    pub catalog_dir: Option<PathBuf>,
}

impl GenerateArgs {
    /// True when the options already decide everything the prompts would ask
    pub fn is_batch(&self) -> bool {
        self.yes || self.stdout || self.json || self.zip.is_some() || self.libraries.is_some()
    }
}

/// Where generated documents go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Directory(PathBuf),
    Zip(PathBuf),
    Stdout,
    StdoutJson,
}

/// What [`emit`] produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    Files(Vec<PathBuf>),
    Zip { path: PathBuf, bytes: usize },
    Printed,
}

/// Everything needed to generate, before any prompt has refined it
#[derive(Debug)]
pub struct Plan {
    pub catalog: Catalog,
    pub project: ProjectInfo,
    pub selected: Vec<LibraryId>,
    pub detected: Vec<DetectedManifest>,
    pub mode: OutputMode,
    pub destination: Destination,
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Catalog from the flag, `RULEGEN_CATALOG_DIR`, the config's `catalog_dir`, or the built-in one
fn load_catalog(catalog_dir: Option<&Path>, config: &ProjectConfig, cwd: &Path) -> Result<Catalog> {
    let source = CatalogSource::resolve(
        catalog_dir.map(|dir| absolute(cwd, dir)),
        config.catalog_dir.clone(),
    );
    Catalog::load(&source)
        .with_context(|| format!("Failed to load catalog from {}", source.describe()))
}

/// Discover the project config, then load the catalog it points at unless a flag overrides it
pub async fn discover_catalog(
    catalog_dir: Option<&Path>,
    config: Option<&Path>,
    cwd: &Path,
) -> Result<Catalog> {
    let config = ProjectConfig::discover(config, cwd).await?;
    load_catalog(catalog_dir, &config, cwd)
}

/// Catalog spelling of a library id typed by a user; unknown ids are kept as typed
pub fn resolve_library(taxonomy: &Taxonomy, raw: &str) -> LibraryId {
    let raw = raw.trim();
    taxonomy
        .libraries()
        .into_iter()
        .find(|library| library.as_str().eq_ignore_ascii_case(raw))
        .cloned()
        .unwrap_or_else(|| LibraryId::from(raw))
}

fn push_unique(selection: &mut Vec<LibraryId>, library: LibraryId) {
    if !selection.contains(&library) {
        selection.push(library);
    }
}

impl Plan {
    /// Load config and catalog, identify manifests and build the initial selection
    pub async fn prepare(args: &GenerateArgs, cwd: &Path) -> Result<Self> {
        let config = ProjectConfig::discover(args.config.as_deref(), cwd).await?;

        let catalog = load_catalog(args.catalog_dir.as_deref(), &config, cwd)?;

        // Flags replace config values rather than adding to them
        let manifests: Vec<PathBuf> = if args.manifests.is_empty() {
            config.manifests.clone()
        } else {
            args.manifests.iter().map(|p| absolute(cwd, p)).collect()
        };

        let map = DependencyMap::builtin();
        let mut detected = Vec::new();
        for manifest in &manifests {
            detected.extend(deps::detect(&map, manifest).await?);
        }
        if let Some(dir) = &args.scan {
            let dir = absolute(cwd, dir);
            if !dir.is_dir() {
                anyhow::bail!("Scan path is not a directory: {}", dir.display());
            }
            detected.extend(deps::detect(&map, &dir).await?);
        }

        let mut selected = Vec::new();
        match &args.libraries {
            Some(libraries) => {
                for raw in libraries.iter().filter(|l| !l.trim().is_empty()) {
                    push_unique(&mut selected, resolve_library(&catalog.taxonomy, raw));
                }
            }
            None => {
                for library in &config.libraries {
                    push_unique(&mut selected, resolve_library(&catalog.taxonomy, library.as_str()));
                }
            }
        }
        for library in deps::selection_from(&detected) {
            push_unique(&mut selected, library);
        }

        let mut project = config.project_info(cwd);
        if let Some(name) = &args.name {
            project.name = name.clone();
        }
        if let Some(description) = &args.description {
            project.description = description.clone();
        }

        let destination = if args.json {
            Destination::StdoutJson
        } else if args.stdout {
            Destination::Stdout
        } else if let Some(zip) = &args.zip {
            Destination::Zip(absolute(cwd, zip))
        } else {
            match &args.output {
                Some(dir) => Destination::Directory(absolute(cwd, dir)),
                None => Destination::Directory(config.output_dir_or_default(cwd)),
            }
        };

        Ok(Self {
            catalog,
            project,
            selected,
            detected,
            mode: OutputMode::from_multi_file(args.multi_file || config.multi_file),
            destination,
        })
    }

    /// Selected ids that no stack lists; generation skips them
    pub fn unplaced_libraries(&self) -> Vec<&LibraryId> {
        self.selected
            .iter()
            .filter(|library| self.catalog.taxonomy.stacks_of_library(library).is_empty())
            .collect()
    }

    pub fn generate(&self) -> Vec<Document> {
        self.catalog
            .generator()
            .generate(&self.project, &self.selected, self.mode)
    }
}

/// Write, zip or print the documents
pub async fn emit(documents: &[Document], destination: &Destination) -> Result<Emitted> {
    match destination {
        Destination::Directory(dir) => Ok(Emitted::Files(
            export::write_documents(documents, dir).await?,
        )),
        Destination::Zip(path) => {
            let bytes = export::write_zip(documents, path).await?;
            Ok(Emitted::Zip {
                path: path.clone(),
                bytes,
            })
        }
        Destination::Stdout => {
            print!("{}", export::render_markdown(documents));
            Ok(Emitted::Printed)
        }
        Destination::StdoutJson => {
            println!("{}", export::render_json(documents)?);
            Ok(Emitted::Printed)
        }
    }
}

/// Distinct `{{placeholder}}` names left in the documents, in order of appearance
pub fn placeholders_in(documents: &[Document]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for document in documents {
        for name in placeholders(&document.markdown) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Run `generate` without prompts; status goes to stderr so stdout stays clean for `--stdout`
pub async fn run(args: GenerateArgs, cli_version: &str) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let plan = Plan::prepare(&args, &cwd).await?;

    if let Some(warning) = plan
        .catalog
        .compatibility_warning(cli_version, crate::UPGRADE_COMMAND)
    {
        eprintln!("{} {}", "Warning:".yellow(), warning);
    }

    for manifest in &plan.detected {
        eprintln!(
            "  {} {}: {} packages, {} libraries",
            "->".blue(),
            manifest.path.display(),
            manifest.packages.len(),
            manifest.libraries.len()
        );
    }
    for library in plan.unplaced_libraries() {
        eprintln!(
            "{} Unknown library '{}' will be skipped",
            "Warning:".yellow(),
            library
        );
    }
    if plan.selected.is_empty() {
        eprintln!(
            "{} No libraries selected; writing the placeholder document",
            "Note:".dimmed()
        );
    }

    let documents = plan.generate();
    match emit(&documents, &plan.destination).await? {
        Emitted::Files(paths) => {
            for path in &paths {
                eprintln!("  {} {}", "->".blue(), path.display());
            }
            eprintln!(
                "{}",
                format!("Generated {} file(s) ({})", paths.len(), plan.mode.display_name())
                    .green()
                    .bold()
            );
        }
        Emitted::Zip { path, bytes } => {
            eprintln!(
                "{}",
                format!(
                    "Wrote {} document(s) to {} ({} bytes)",
                    documents.len(),
                    path.display(),
                    bytes
                )
                .green()
                .bold()
            );
        }
        Emitted::Printed => {}
    }

    let blanks = placeholders_in(&documents);
    if !blanks.is_empty() {
        eprintln!(
            "{} Fill in these placeholders: {}",
            "Note:".dimmed(),
            blanks.join(", ")
        );
    }

    Ok(())
}

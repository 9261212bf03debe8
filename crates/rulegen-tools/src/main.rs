//! rulegen CLI - AI assistant rules from a technology stack selection

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rulegen_core::deps::{self, DependencyMap};
use rulegen_core::workflow::discover_catalog;
use rulegen_core::{GenerateArgs, Taxonomy};
use std::path::PathBuf;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "rulegen")]
#[command(about = "Generate AI assistant rules for your technology stack")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate rules documents (default)
    Generate(CliGenerateArgs),
    /// List layers, stacks and libraries in the catalog
    List(ListArgs),
    /// Identify libraries from a dependency manifest or project directory
    Detect(DetectArgs),
    /// Validate a catalog and report gaps (for catalog authors)
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
pub struct CliGenerateArgs {
    /// Libraries to include (comma-separated identifiers, e.g. NEXT_JS,POSTGRES)
    #[arg(short, long, value_delimiter = ',')]
    pub libraries: Option<Vec<String>>,

    /// Dependency manifest to identify libraries from (package.json, requirements.txt); repeatable
    #[arg(short, long = "manifest")]
    pub manifests: Vec<PathBuf>,

    /// Scan a project directory for dependency manifests
    #[arg(long)]
    pub scan: Option<PathBuf>,

    /// Write one file per library instead of a single rules.mdc
    #[arg(long = "multi-file")]
    pub multi_file: bool,

    /// Output directory for generated files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Bundle generated files into a zip archive at this path
    #[arg(long)]
    pub zip: Option<PathBuf>,

    /// Print generated Markdown to stdout instead of writing files
    #[arg(long, conflicts_with_all = ["zip", "output"])]
    pub stdout: bool,

    /// Print generated documents as JSON to stdout
    #[arg(long, conflicts_with_all = ["zip", "output", "stdout"])]
    pub json: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Project name (defaults to the current directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Project description
    #[arg(long)]
    pub description: Option<String>,

    /// Project config file (defaults to ./rulegen.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Local catalog directory to use instead of the built-in catalog (for development use)
    #[arg(long = "catalog-dir")]
    pub catalog_dir: Option<PathBuf>,
}

impl From<CliGenerateArgs> for GenerateArgs {
    fn from(args: CliGenerateArgs) -> Self {
        GenerateArgs {
            libraries: args.libraries,
            manifests: args.manifests,
            scan: args.scan,
            multi_file: args.multi_file,
            output: args.output,
            zip: args.zip,
            stdout: args.stdout,
            json: args.json,
            yes: args.yes,
            name: args.name,
            description: args.description,
            config: args.config,
            catalog_dir: args.catalog_dir,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only show this layer (identifier or name, case-insensitive)
    #[arg(long)]
    pub layer: Option<String>,

    /// Only show libraries matching this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Project config file (defaults to ./rulegen.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Local catalog directory to use instead of the built-in catalog (for development use)
    #[arg(long = "catalog-dir")]
    pub catalog_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// Dependency manifest or project directory
    pub path: PathBuf,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Catalog directory to validate (defaults to the config's catalog_dir, then the built-in catalog)
    #[arg(long = "catalog-dir")]
    pub catalog_dir: Option<PathBuf>,

    /// Project config file (defaults to ./rulegen.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also fail when the catalog has gaps (orphan stacks, undocumented libraries)
    #[arg(long)]
    pub strict: bool,
}

async fn generate(args: GenerateArgs) -> Result<()> {
    if args.is_batch() {
        return rulegen_core::workflow::run(args, CLI_VERSION).await;
    }

    // Run the interactive prompts
    let result = rulegen_core::run(args, CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

async fn list(args: ListArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let catalog = discover_catalog(args.catalog_dir.as_deref(), args.config.as_deref(), &cwd).await?;
    let taxonomy = &catalog.taxonomy;

    if let Some(query) = &args.search {
        let matches = taxonomy.search(query);
        if matches.is_empty() {
            println!("No libraries match '{}'", query);
            return Ok(());
        }
        for library in matches {
            println!("{}  {}", library.as_str().bold(), library_path(taxonomy, library).dimmed());
        }
        return Ok(());
    }

    let layers: Vec<_> = taxonomy
        .layers()
        .iter()
        .filter(|layer| {
            args.layer.as_deref().map_or(true, |wanted| {
                layer.id.as_str().eq_ignore_ascii_case(wanted) || layer.name.eq_ignore_ascii_case(wanted)
            })
        })
        .collect();

    if layers.is_empty() {
        anyhow::bail!(
            "Layer '{}' not found. Available layers: {}",
            args.layer.unwrap_or_default(),
            taxonomy
                .layers()
                .iter()
                .map(|l| l.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    for layer in layers {
        println!(
            "{} {}",
            layer.name.cyan().bold(),
            format!("({}, {} libraries)", layer.id, taxonomy.library_count_of_layer(&layer.id)).dimmed()
        );
        for stack in taxonomy.stacks_of_layer(&layer.id) {
            println!("  {} {}", "->".blue(), taxonomy.stack_name(stack));
            for library in taxonomy.libraries_of_stack(stack) {
                let marker = if catalog.rules.contains(library) {
                    String::new()
                } else {
                    " (default rule)".dimmed().to_string()
                };
                println!("       {}{}", library, marker);
            }
        }
        println!();
    }

    Ok(())
}

fn library_path(taxonomy: &Taxonomy, library: &rulegen_core::LibraryId) -> String {
    taxonomy
        .stacks_of_library(library)
        .into_iter()
        .map(|stack| match taxonomy.layer_of_stack(stack) {
            Some(layer) => format!("{} / {}", taxonomy.layer_name(layer), taxonomy.stack_name(stack)),
            None => taxonomy.stack_name(stack).to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

async fn detect(args: DetectArgs) -> Result<()> {
    let map = DependencyMap::builtin();
    let detected = deps::detect(&map, &args.path).await?;
    let selection = deps::selection_from(&detected);

    if args.json {
        let manifests: Vec<serde_json::Value> = detected
            .iter()
            .map(|d| {
                serde_json::json!({
                    "path": d.path.display().to_string(),
                    "packages": d.packages,
                    "libraries": d.libraries,
                })
            })
            .collect();
        let output = serde_json::json!({ "manifests": manifests, "libraries": selection });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if detected.is_empty() {
        println!("No dependency manifests found in {}", args.path.display());
        return Ok(());
    }

    for manifest in &detected {
        println!("{}", manifest.path.display().to_string().cyan().bold());
        for package in &manifest.packages {
            match map.lookup(package) {
                Some(library) => println!("  {} {} {}", "->".blue(), package, library.as_str().green()),
                None => println!("  {} {}", "  ".blue(), package.dimmed()),
            }
        }
        println!();
    }

    if selection.is_empty() {
        println!("{}", "No known libraries identified".yellow());
    } else {
        let names: Vec<&str> = selection.iter().map(|l| l.as_str()).collect();
        println!("{} {}", "Libraries:".green().bold(), names.join(","));
    }

    Ok(())
}

async fn check(args: CheckArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let catalog = discover_catalog(args.catalog_dir.as_deref(), args.config.as_deref(), &cwd).await?;

    if let Some(warning) = catalog.compatibility_warning(CLI_VERSION, rulegen_core::UPGRADE_COMMAND) {
        eprintln!("{} {}", "Warning:".yellow(), warning);
    }

    let report = catalog.report();
    report.print();

    if args.strict && !report.is_clean() {
        anyhow::bail!("Catalog has gaps (--strict)");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Some(Command::Generate(generate_args)) => generate(generate_args.into()).await,
        Some(Command::List(list_args)) => list(list_args).await,
        Some(Command::Detect(detect_args)) => detect(detect_args).await,
        Some(Command::Check(check_args)) => check(check_args).await,
        None => {
            // No subcommand provided, default to generate behavior (interactive mode)
            generate(GenerateArgs::default()).await
        }
    }
}

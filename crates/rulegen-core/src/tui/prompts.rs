//! Charm-style CLI prompts using cliclack

use crate::generate::{OutputMode, ProjectInfo};
use crate::taxonomy::{LayerId, LibraryId, StackId, Taxonomy};
use crate::workflow::{self, Destination, Emitted, GenerateArgs, Plan};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Run the generate command with interactive prompts
pub async fn run(args: GenerateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro("rulegen")?;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;

    // Step 1: Load catalog, config and manifests
    let spinner = cliclack::spinner();
    spinner.start("Loading catalog...");
    let mut plan = match Plan::prepare(&args, &cwd).await {
        Ok(plan) => plan,
        Err(e) => {
            spinner.stop("Failed to load catalog");
            return Err(e);
        }
    };
    spinner.stop(format!(
        "Catalog: {} ({} libraries)",
        plan.catalog.source.describe(),
        plan.catalog.taxonomy.libraries().len()
    ));

    if let Some(warning) = plan
        .catalog
        .compatibility_warning(cli_version, crate::UPGRADE_COMMAND)
    {
        cliclack::log::warning(format!(
            "Version warning: {}",
            warning.lines().next().unwrap_or(&warning)
        ))?;
    }

    report_detected(&plan)?;

    // Step 2: Project metadata
    plan.project = input_project(&plan.project)?;

    // Step 3: Layer -> stack -> library selection
    plan.selected = select_libraries(&plan.catalog.taxonomy, &plan.selected)?;

    // Step 4: Single or multi file
    plan.mode = select_mode(plan.mode)?;

    // Step 5: Output directory
    if let Destination::Directory(dir) = &plan.destination {
        plan.destination = Destination::Directory(select_directory(&cwd, dir)?);
    }

    // Step 6: Generate and write
    let spinner = cliclack::spinner();
    spinner.start("Generating rules...");
    let documents = plan.generate();
    let emitted = match workflow::emit(&documents, &plan.destination).await {
        Ok(emitted) => emitted,
        Err(e) => {
            spinner.stop("Failed to write rules");
            return Err(e);
        }
    };
    match &emitted {
        Emitted::Files(paths) => spinner.stop(format!("Wrote {} file(s)", paths.len())),
        Emitted::Zip { path, .. } => spinner.stop(format!("Wrote {}", path.display())),
        Emitted::Printed => spinner.stop("Rules printed"),
    }

    let blanks = workflow::placeholders_in(&documents);
    if !blanks.is_empty() {
        cliclack::log::remark(format!("Fill in these placeholders: {}", blanks.join(", ")))?;
    }

    print_written(&emitted)?;

    Ok(())
}

fn report_detected(plan: &Plan) -> Result<()> {
    for manifest in &plan.detected {
        let names: Vec<&str> = manifest.libraries.iter().map(LibraryId::as_str).collect();
        if names.is_empty() {
            cliclack::log::info(format!(
                "{}: no known libraries among {} packages",
                manifest.path.display(),
                manifest.packages.len()
            ))?;
        } else {
            cliclack::log::success(format!(
                "{}: {}",
                manifest.path.display(),
                names.join(", ")
            ))?;
        }
    }

    for library in plan.unplaced_libraries() {
        cliclack::log::warning(format!("Unknown library: {}", library))?;
    }

    Ok(())
}

fn input_project(current: &ProjectInfo) -> Result<ProjectInfo> {
    let name: String = cliclack::input("Project name")
        .default_input(&current.name)
        .placeholder(&current.name)
        .interact()?;

    let description: String = cliclack::input("Project description")
        .default_input(&current.description)
        .placeholder("What the project does (optional)")
        .required(false)
        .interact()?;

    Ok(ProjectInfo::new(name, description))
}

/// Narrow the taxonomy one level at a time; `preselected` seeds the initial choices
fn select_libraries(taxonomy: &Taxonomy, preselected: &[LibraryId]) -> Result<Vec<LibraryId>> {
    let preselected_layers: Vec<LayerId> = taxonomy
        .layers()
        .iter()
        .filter(|layer| {
            preselected
                .iter()
                .any(|library| taxonomy.layers_of_library(library).contains(&&layer.id))
        })
        .map(|layer| layer.id.clone())
        .collect();

    let mut layer_prompt = cliclack::multiselect("Select layers")
        .initial_values(preselected_layers)
        .required(false);
    for layer in taxonomy.layers() {
        let count = taxonomy.library_count_of_layer(&layer.id);
        if count == 0 {
            continue;
        }
        layer_prompt = layer_prompt.item(
            layer.id.clone(),
            &layer.name,
            format!("{} libraries", count),
        );
    }
    let layers: Vec<LayerId> = layer_prompt.interact()?;

    let mut selected: Vec<LibraryId> = Vec::new();
    for layer in &layers {
        let stacks: Vec<&StackId> = taxonomy
            .stacks_of_layer(layer)
            .iter()
            .filter(|stack| !taxonomy.libraries_of_stack(stack).is_empty())
            .collect();

        let chosen_stacks: Vec<StackId> = if stacks.len() == 1 {
            vec![stacks[0].clone()]
        } else {
            let initial: Vec<StackId> = stacks
                .iter()
                .filter(|stack| {
                    taxonomy
                        .libraries_of_stack(stack)
                        .iter()
                        .any(|library| preselected.contains(library))
                })
                .map(|stack| (*stack).clone())
                .collect();

            let mut stack_prompt =
                cliclack::multiselect(format!("{}: select stacks", taxonomy.layer_name(layer)))
                    .initial_values(initial)
                    .required(false);
            for stack in &stacks {
                stack_prompt = stack_prompt.item(
                    (*stack).clone(),
                    taxonomy.stack_name(stack),
                    format!("{} libraries", taxonomy.libraries_of_stack(stack).len()),
                );
            }
            stack_prompt.interact()?
        };

        for stack in &chosen_stacks {
            let libraries = taxonomy.libraries_of_stack(stack);
            let initial: Vec<LibraryId> = libraries
                .iter()
                .filter(|library| preselected.contains(library) || selected.contains(library))
                .cloned()
                .collect();

            let mut library_prompt =
                cliclack::multiselect(format!("{}: select libraries", taxonomy.stack_name(stack)))
                    .initial_values(initial)
                    .required(false);
            for library in libraries {
                library_prompt = library_prompt.item(library.clone(), library.as_str(), "");
            }

            let chosen: Vec<LibraryId> = library_prompt.interact()?;
            for library in chosen {
                if !selected.contains(&library) {
                    selected.push(library);
                }
            }
        }
    }

    if selected.is_empty() {
        cliclack::log::warning("No libraries selected; only the placeholder document will be written")?;
    } else {
        let names: Vec<&str> = selected.iter().map(LibraryId::as_str).collect();
        cliclack::log::success(format!("Libraries: {}", names.join(", ")))?;
    }

    Ok(selected)
}

fn select_mode(current: OutputMode) -> Result<OutputMode> {
    let mode = cliclack::select("Output format")
        .item(
            OutputMode::SingleFile,
            OutputMode::SingleFile.display_name(),
            "rules.mdc",
        )
        .item(
            OutputMode::MultiFile,
            OutputMode::MultiFile.display_name(),
            "project.mdc plus one file per library",
        )
        .initial_value(current)
        .interact()?;

    Ok(mode)
}

fn select_directory(cwd: &Path, default_dir: &Path) -> Result<PathBuf> {
    let default_display = default_dir
        .strip_prefix(cwd)
        .unwrap_or(default_dir)
        .display()
        .to_string();

    let input: String = cliclack::input("Output directory")
        .placeholder(&default_display)
        .default_input(&default_display)
        .interact()?;

    let path = if input.is_empty() {
        default_dir.to_path_buf()
    } else {
        let p = PathBuf::from(&input);
        if p.is_absolute() {
            p
        } else {
            cwd.join(p)
        }
    };

    // Warn before overwriting earlier output
    if path.is_dir() {
        let existing = std::fs::read_dir(&path)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| {
                        e.path().extension().and_then(|ext| ext.to_str())
                            == Some(crate::generate::FILE_EXTENSION)
                    })
                    .count()
            })
            .unwrap_or(0);

        if existing > 0 {
            cliclack::log::warning(format!(
                "Directory has {} existing rules file(s)",
                existing
            ))?;

            let confirm: bool = cliclack::confirm("Overwrite files with the same name?")
                .initial_value(true)
                .interact()?;

            if !confirm {
                anyhow::bail!("Generation cancelled.");
            }
        }
    }

    Ok(path)
}

fn print_written(emitted: &Emitted) -> Result<()> {
    if let Emitted::Files(paths) = emitted {
        println!();
        println!("  Written files");
        println!();

        for (i, path) in paths.iter().enumerate() {
            println!("  {}.  {}", i + 1, path.display());
        }
    }

    cliclack::outro("Rules ready!")?;

    Ok(())
}

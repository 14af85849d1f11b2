//! Generate command - render the targets of the enclosing project

use crate::context::Context;
use anyhow::Result;
use colored::Colorize;
use dtig_core::DtigError;
use dtig_core::project::{generate_all, generate_target};
use std::path::PathBuf;

/// Render targets listed in dtig.toml
///
/// # Arguments
///
/// * `target` - Optional output path selecting one target. If None, renders all
/// * `verbose` - Enable verbose output if true
pub fn run(target: Option<PathBuf>, verbose: bool) -> Result<()> {
    let ctx = Context::new(verbose)?;
    let manifest = ctx.project.manifest();

    match target {
        Some(output) => {
            let target = manifest
                .find_target(&output)
                .ok_or_else(|| DtigError::TargetNotFound(output.display().to_string()))?;

            if ctx.verbose {
                println!(
                    "{} Rendering {} ({})",
                    "→".cyan(),
                    target.template.display(),
                    target.language
                );
            }

            let written = generate_target(&ctx.project, target)?;
            println!("{} Generated {}", "✓".green().bold(), written.display());
        }
        None => {
            if manifest.targets.is_empty() {
                println!("{} No targets in dtig.toml", "!".yellow());
                return Ok(());
            }

            if ctx.verbose {
                println!(
                    "{} Generating {} target(s) for '{}'",
                    "→".cyan(),
                    manifest.targets.len(),
                    ctx.project.name()
                );
            }

            let written = generate_all(&ctx.project)?;
            for path in &written {
                println!("{} Generated {}", "✓".green().bold(), path.display());
            }
            println!(
                "\n{} Generated {} file(s)",
                "✓".green().bold(),
                written.len()
            );
        }
    }

    Ok(())
}

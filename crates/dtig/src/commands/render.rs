//! Render command - render one template to stdout or a file

use crate::context::RenderInputs;
use anyhow::Result;
use colored::Colorize;
use dtig_core::{DtigError, TemplateEngine};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Render `template` against `model`
///
/// # Arguments
///
/// * `output` - Destination file. If None, the result goes to stdout
/// * `verbose` - Enable verbose output if true
pub fn run(
    template: PathBuf,
    model: PathBuf,
    language: String,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let inputs = RenderInputs::load(&template, &model, &language)?;
    debug!(
        template = %template.display(),
        language = %inputs.language,
        model = %inputs.model.summary(),
        "rendering"
    );

    let engine = TemplateEngine::new(inputs.language.callbacks());
    let rendered = engine
        .render(&inputs.template, &inputs.model)
        .map_err(|source| DtigError::RenderFailed {
            template: template.display().to_string(),
            source,
        })?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &rendered)?;

            if verbose {
                println!(
                    "{} {} → {} ({})",
                    "→".cyan(),
                    template.display(),
                    path.display(),
                    inputs.language
                );
            }
            println!("{} Rendered {}", "✓".green().bold(), path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

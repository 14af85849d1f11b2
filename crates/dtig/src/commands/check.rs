//! Check command - render and discard, reporting the outcome

use crate::context::RenderInputs;
use anyhow::{Result, bail};
use colored::Colorize;
use dtig_core::TemplateEngine;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct CheckReport {
    template: String,
    language: String,
    ok: bool,
    bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
}

/// Render `template` and report success or the first error
///
/// Exits with an error when the template does not render.
pub fn run(template: PathBuf, model: PathBuf, language: String, json: bool) -> Result<()> {
    let inputs = RenderInputs::load(&template, &model, &language)?;
    let engine = TemplateEngine::new(inputs.language.callbacks());
    let result = engine.render(&inputs.template, &inputs.model);

    let report = CheckReport {
        template: template.display().to_string(),
        language: inputs.language.to_string(),
        ok: result.is_ok(),
        bytes: result.as_ref().map_or(0, String::len),
        error: result.as_ref().err().map(ToString::to_string),
        line: result.as_ref().err().and_then(|e| e.line()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.ok {
        println!(
            "{} {} renders ({} bytes, {})",
            "✓".green().bold(),
            report.template,
            report.bytes,
            inputs.model.summary()
        );
    } else {
        println!("{} {} does not render", "✗".red().bold(), report.template);
    }

    if let Err(e) = result {
        bail!("{}: {}", report.template, e);
    }
    Ok(())
}

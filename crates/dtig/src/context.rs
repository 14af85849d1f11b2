//! Shared inputs for CLI commands

use anyhow::{Result, anyhow};
use dtig_core::{DtigError, Language, ModelConfig, project::Project};
use std::env;
use std::fs;
use std::path::Path;

/// Project-scoped context for `generate`
pub struct Context {
    pub project: Project,
    pub verbose: bool,
}

impl Context {
    /// Find the project containing the current directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Not in a dtig project
    /// - dtig.toml cannot be read or parsed
    pub fn new(verbose: bool) -> Result<Self> {
        let current_dir = env::current_dir()?;
        let project = Project::find_root(&current_dir)
            .map_err(|e| anyhow!("Failed to find project: {}", e))?
            .ok_or_else(|| anyhow!("Not in a dtig project (no dtig.toml found)"))?;

        Ok(Self { project, verbose })
    }
}

/// Inputs of a one-off render: template text, model and language
pub struct RenderInputs {
    pub template: String,
    pub model: ModelConfig,
    pub language: Language,
}

impl RenderInputs {
    pub fn load(template: &Path, model: &Path, language: &str) -> Result<Self> {
        let language: Language = language.parse()?;
        let model = ModelConfig::from_file(model)?;
        let template = fs::read_to_string(template).map_err(|e| DtigError::TemplateRead {
            path: template.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            template,
            model,
            language,
        })
    }
}

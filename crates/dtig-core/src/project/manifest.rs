use crate::error::{DtigError, Result};
use crate::language::Language;
use crate::template::engine::{DEFAULT_MAX_DEPTH, RENDER_TIMEOUT};
use crate::template::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// dtig.toml schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    pub project: ProjectSection,
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSection {
    pub name: String,
    /// Model configuration, relative to the manifest
    pub model: PathBuf,
}

/// Engine limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderSection {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_timeout_ms() -> u64 {
    u64::try_from(RENDER_TIMEOUT.as_millis()).unwrap_or(u64::MAX)
}

/// One template -> output file pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    pub template: PathBuf,
    pub output: PathBuf,
    pub language: Language,
}

impl Manifest {
    /// Minimal manifest with no targets
    pub fn new(name: impl Into<String>, model: impl Into<PathBuf>) -> Self {
        Self {
            project: ProjectSection {
                name: name.into(),
                model: model.into(),
            },
            render: RenderSection::default(),
            targets: Vec::new(),
        }
    }

    /// Read dtig.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DtigError::ManifestInvalid(e.to_string()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DtigError::ManifestInvalid(e.to_string()))
    }

    /// Write dtig.toml
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DtigError::ManifestInvalid(e.to_string()))?;

        std::fs::write(path.as_ref(), content)?;

        Ok(())
    }

    /// Engine limits from `[render]`
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_depth: self.render.max_depth,
            timeout: Duration::from_millis(self.render.timeout_ms),
        }
    }

    /// Target whose output path matches `output`
    pub fn find_target(&self, output: &Path) -> Option<&Target> {
        self.targets.iter().find(|target| target.output == output)
    }
}

//! Project detection and management
//!
//! A project is a directory holding a `dtig.toml` manifest that names one
//! model configuration and any number of template targets.

mod generate;
mod manifest;

pub use generate::{generate_all, generate_target};
pub use manifest::{Manifest, ProjectSection, RenderSection, Target};

use crate::config::ModelConfig;
use crate::error::{DtigError, Result};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Manifest file name
pub const MANIFEST_FILE: &str = "dtig.toml";

/// Represents a dtig project
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    manifest: Manifest,
}

impl Project {
    /// Load the project rooted at `root`
    pub fn load(root: PathBuf) -> Result<Self> {
        let manifest = Manifest::from_file(root.join(MANIFEST_FILE))?;
        Ok(Self { root, manifest })
    }

    /// Find project root by searching `start` and its parents for dtig.toml
    pub fn find_root(start: &Path) -> Result<Option<Self>> {
        for dir in start.ancestors() {
            if dir.join(MANIFEST_FILE).is_file() {
                debug!(root = %dir.display(), "found project manifest");
                return Self::load(dir.to_path_buf()).map(Some);
            }
        }
        Ok(None)
    }

    /// Like [`Project::find_root`], but a missing manifest is an error
    pub fn discover(start: &Path) -> Result<Self> {
        Self::find_root(start)?.ok_or(DtigError::ProjectNotFound)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn name(&self) -> &str {
        &self.manifest.project.name
    }

    /// Load the model configuration named by the manifest
    pub fn model(&self) -> Result<ModelConfig> {
        ModelConfig::from_file(self.resolve(&self.manifest.project.model)?)
    }

    /// Join a manifest-relative path onto the root, refusing to leave it
    pub fn resolve(&self, relative: &Path) -> Result<PathBuf> {
        resolve_within(&self.root, relative)
    }
}

/// Check if path is absolute OR rooted (cross-platform)
///
/// `Path::is_absolute()` is false for `/tmp` on Windows, so rooted
/// components are checked separately.
fn has_absolute_or_rooted_component(path: &Path) -> bool {
    path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
}

/// Lexically join `relative` onto `root`; `..` may not climb above `root`
fn resolve_within(root: &Path, relative: &Path) -> Result<PathBuf> {
    let escape = || DtigError::ProjectPathEscape {
        path: relative.to_path_buf(),
    };

    if has_absolute_or_rooted_component(relative) {
        return Err(escape());
    }

    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop().ok_or_else(escape)?;
            }
            Component::RootDir | Component::Prefix(_) => return Err(escape()),
        }
    }

    Ok(parts.iter().fold(root.to_path_buf(), |path, part| path.join(part)))
}

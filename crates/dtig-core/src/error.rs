use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DtigError {
    // Project errors
    #[error("PROJECT_NOT_FOUND: dtig.toml not found in current or parent directories")]
    ProjectNotFound,

    #[error("PROJECT_MANIFEST_INVALID: failed to parse dtig.toml: {0}")]
    ManifestInvalid(String),

    #[error("PROJECT_TARGET_NOT_FOUND: no target writes '{0}'")]
    TargetNotFound(String),

    #[error("PROJECT_PATH_ESCAPE: path '{path}' resolves outside project root")]
    ProjectPathEscape { path: PathBuf },

    // Model configuration errors
    #[error("MODEL_CONFIG_READ_ERROR: failed to read '{path}': {reason}")]
    ModelConfigRead { path: PathBuf, reason: String },

    #[error("MODEL_CONFIG_INVALID: {0}")]
    ModelConfigInvalid(String),

    #[error("MODEL_CONFIG_UNSUPPORTED: '{0}' is neither .json nor .toml")]
    ModelConfigUnsupported(PathBuf),

    // Language errors
    #[error("LANGUAGE_UNKNOWN: '{0}' (expected python, cpp or matlab)")]
    UnknownLanguage(String),

    // Template errors
    #[error("TEMPLATE_READ_ERROR: failed to read '{path}': {reason}")]
    TemplateRead { path: PathBuf, reason: String },

    #[error("TEMPLATE_RENDER_FAILED: {template}: {source}")]
    RenderFailed {
        template: String,
        #[source]
        source: crate::template::TemplateError,
    },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl From<serde_json::Error> for DtigError {
    fn from(err: serde_json::Error) -> Self {
        DtigError::ModelConfigInvalid(format!("JSON error: {}", err))
    }
}

impl From<crate::template::TemplateError> for DtigError {
    fn from(err: crate::template::TemplateError) -> Self {
        DtigError::RenderFailed {
            template: "<inline>".to_string(),
            source: err,
        }
    }
}

pub type Result<T> = std::result::Result<T, DtigError>;

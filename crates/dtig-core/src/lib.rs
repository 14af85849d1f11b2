// Core modules
pub mod config;
pub mod error;
pub mod language;
pub mod project;
pub mod template;

// Re-export commonly used types
pub use config::{ConfigReader, ModelConfig};
pub use error::{DtigError, Result};
pub use language::Language;
pub use template::{render, Callbacks, RenderOptions, TemplateEngine, TemplateError, Value};

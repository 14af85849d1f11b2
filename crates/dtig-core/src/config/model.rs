use super::keys::{collection, field};
use super::ConfigReader;
use crate::error::{DtigError, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Model configuration loaded from a `.json` or `.toml` file
///
/// The root must be an object. Nothing about its contents is validated
/// beyond that; templates decide which keys they need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelConfig {
    root: Map<String, Value>,
}

impl ModelConfig {
    /// Wrap an already parsed JSON object
    pub fn new(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Read a model configuration, picking the format from the file extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DtigError::ModelConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Err(DtigError::ModelConfigUnsupported(path.to_path_buf())),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let value: Value = toml::from_str(content)
            .map_err(|e| DtigError::ModelConfigInvalid(format!("TOML error: {}", e)))?;
        Self::from_value(value)
    }

    /// Accept any JSON value whose root is an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(DtigError::ModelConfigInvalid(format!(
                "root must be an object, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Number of records in `inputs`/`outputs`/`parameters`, zero when absent
    pub fn collection_len(&self, name: &str) -> usize {
        self.root
            .get(name)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Short human summary, e.g. `2 inputs, 1 output, 0 parameters`
    pub fn summary(&self) -> String {
        let plural = |n: usize, word: &str| {
            if n == 1 {
                format!("{} {}", n, word.trim_end_matches('s'))
            } else {
                format!("{} {}", n, word)
            }
        };
        format!(
            "{}, {}, {}",
            plural(self.collection_len(collection::INPUTS), collection::INPUTS),
            plural(self.collection_len(collection::OUTPUTS), collection::OUTPUTS),
            plural(
                self.collection_len(collection::PARAMETERS),
                collection::PARAMETERS
            ),
        )
    }

    /// Records of a collection that carry no `name` field
    pub fn unnamed_records(&self, name: &str) -> usize {
        self.root
            .get(name)
            .and_then(Value::as_array)
            .map_or(0, |records| {
                records
                    .iter()
                    .filter(|record| record.get(field::NAME).is_none())
                    .count()
            })
    }
}

impl ConfigReader for ModelConfig {
    fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

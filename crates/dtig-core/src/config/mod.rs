//! Model configuration access
//!
//! The template engine never owns the model configuration: it reads it through
//! [`ConfigReader`], a two-method view over a JSON-like object. [`ModelConfig`]
//! is the file-backed implementation used by the CLI and by project generation;
//! a bare `serde_json::Value` works just as well in tests and embedders.

pub mod keys;
mod model;

pub use model::ModelConfig;

use serde_json::Value;

/// Read-only key/value view over a model configuration
pub trait ConfigReader {
    /// Look up a top-level key
    fn get(&self, key: &str) -> Option<&Value>;

    /// Check whether a top-level key is present
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl ConfigReader for Value {
    fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl ConfigReader for serde_json::Map<String, Value> {
    fn get(&self, key: &str) -> Option<&Value> {
        serde_json::Map::get(self, key)
    }
}

impl<T: ConfigReader + ?Sized> ConfigReader for &T {
    fn get(&self, key: &str) -> Option<&Value> {
        (**self).get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_reader_on_object() {
        let cfg = json!({ "inputs": [], "formalism": "discrete" });
        assert!(cfg.has("inputs"));
        assert_eq!(cfg.get("formalism"), Some(&json!("discrete")));
        assert!(!cfg.has("outputs"));
    }

    #[test]
    fn test_value_reader_on_non_object() {
        let cfg = json!([1, 2, 3]);
        assert!(!cfg.has("inputs"));
        assert_eq!(cfg.get("inputs"), None);
    }
}

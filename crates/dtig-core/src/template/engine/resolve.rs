//! Symbolic name resolution against the model configuration and loop state

use crate::config::keys::{self, collection, field};
use crate::config::ConfigReader;
use crate::template::value::Value;

/// Collection accessor suffixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accessor {
    /// The records themselves
    Records,
    Length,
    Names,
    Ids,
}

/// Resolves `DTIG_*` names for one render frame
pub(crate) struct Resolver<'a> {
    config: &'a dyn ConfigReader,
    item: Option<&'a Value>,
    index: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a dyn ConfigReader, item: Option<&'a Value>, index: usize) -> Self {
        Self {
            config,
            item,
            index,
        }
    }

    /// Resolve a name, first match wins:
    /// loop pseudo-variables, collections, constants and config keys, then
    /// the name itself as text.
    pub fn resolve(&self, name: &str) -> Value {
        let Some(suffix) = name.strip_prefix("DTIG_") else {
            return Value::Str(name.to_string());
        };

        if let Some(value) = self.resolve_loop_variable(suffix) {
            return value;
        }
        if let Some(value) = self.resolve_collection(suffix) {
            return value;
        }
        if let Some(value) = self.resolve_constant(suffix) {
            return value;
        }

        Value::Str(name.to_string())
    }

    fn resolve_loop_variable(&self, suffix: &str) -> Option<Value> {
        if suffix == "INDEX" {
            return Some(Value::Int(i64::try_from(self.index).unwrap_or(i64::MAX)));
        }
        if suffix == "ITEM" {
            return Some(self.item.cloned().unwrap_or(Value::Absent));
        }

        let field_name = suffix.strip_prefix("ITEM_")?;
        let key = field::ALL
            .iter()
            .find(|key| key.eq_ignore_ascii_case(field_name))?;

        Some(
            self.item
                .and_then(|item| item.field(key))
                .cloned()
                .unwrap_or(Value::Absent),
        )
    }

    fn resolve_collection(&self, suffix: &str) -> Option<Value> {
        let (name, accessor) = split_collection(suffix)?;
        let records = self
            .config
            .get(name)
            .and_then(serde_json::Value::as_array)
            .filter(|records| !records.is_empty());

        let value = match (accessor, records) {
            (Accessor::Records, Some(records)) => {
                Value::List(records.iter().map(Value::from).collect())
            }
            (Accessor::Records, None) => Value::Sentinel,
            (Accessor::Length, records) => {
                Value::Int(records.map_or(0, |r| i64::try_from(r.len()).unwrap_or(i64::MAX)))
            }
            (Accessor::Names, Some(records)) => project_field(records, field::NAME),
            (Accessor::Ids, Some(records)) => project_field(records, field::ID),
            (Accessor::Names | Accessor::Ids, None) => Value::Absent,
        };
        Some(value)
    }

    fn resolve_constant(&self, suffix: &str) -> Option<Value> {
        match suffix {
            "TRUE" => return Some(Value::Bool(true)),
            "FALSE" => return Some(Value::Bool(false)),
            _ => {}
        }

        if let Some(constant) = suffix
            .strip_prefix("TYPE_")
            .and_then(|rest| keys::lookup(keys::TYPE_CONSTANTS, rest))
        {
            return Some(Value::from(constant));
        }
        if let Some(constant) = suffix
            .strip_prefix("FORMALISM_")
            .and_then(|rest| keys::lookup(keys::FORMALISM_CONSTANTS, rest))
        {
            return Some(Value::from(constant));
        }

        let key = keys::lookup(keys::CONFIG_KEYS, suffix)?;
        Some(self.config.get(key).map_or(Value::Absent, Value::from))
    }
}

/// `INPUTS_NAMES` -> (`inputs`, Names)
fn split_collection(suffix: &str) -> Option<(&'static str, Accessor)> {
    const COLLECTIONS: [(&str, &str); 3] = [
        ("INPUTS", collection::INPUTS),
        ("OUTPUTS", collection::OUTPUTS),
        ("PARAMETERS", collection::PARAMETERS),
    ];

    COLLECTIONS.iter().find_map(|(prefix, name)| {
        let rest = suffix.strip_prefix(prefix)?;
        let accessor = match rest {
            "" => Accessor::Records,
            "_LENGTH" => Accessor::Length,
            "_NAMES" => Accessor::Names,
            "_IDS" => Accessor::Ids,
            _ => return None,
        };
        Some((*name, accessor))
    })
}

/// One field from every record that has it
fn project_field(records: &[serde_json::Value], key: &str) -> Value {
    Value::List(
        records
            .iter()
            .filter_map(|record| record.get(key))
            .map(Value::from)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> serde_json::Value {
        json!({
            "inputs": [
                {"id": 0, "name": "throttle", "type": "float32", "unit": "%"},
                {"id": 1, "type": "bool"},
            ],
            "outputs": [],
            "formalism": "discrete",
            "classname": "Engine",
        })
    }

    #[test]
    fn test_index_and_item_fields() {
        let config = config();
        let item = Value::from(&config["inputs"][0]);
        let resolver = Resolver::new(&config, Some(&item), 3);

        assert_eq!(resolver.resolve("DTIG_INDEX"), Value::Int(3));
        assert_eq!(resolver.resolve("DTIG_ITEM_NAME"), Value::from("throttle"));
        assert_eq!(resolver.resolve("DTIG_ITEM_UNIT"), Value::from("%"));
        assert_eq!(resolver.resolve("DTIG_ITEM_DEFAULT"), Value::Absent);
    }

    #[test]
    fn test_item_fields_without_item() {
        let config = config();
        let resolver = Resolver::new(&config, None, 0);
        assert_eq!(resolver.resolve("DTIG_ITEM_NAME"), Value::Absent);
        assert_eq!(resolver.resolve("DTIG_ITEM"), Value::Absent);
        assert_eq!(resolver.resolve("DTIG_INDEX"), Value::Int(0));
    }

    #[test]
    fn test_collection_accessors() {
        let config = config();
        let resolver = Resolver::new(&config, None, 0);

        assert!(matches!(resolver.resolve("DTIG_INPUTS"), Value::List(ref l) if l.len() == 2));
        assert_eq!(resolver.resolve("DTIG_INPUTS_LENGTH"), Value::Int(2));
        assert_eq!(
            resolver.resolve("DTIG_INPUTS_NAMES"),
            Value::List(vec![Value::from("throttle")])
        );
        assert_eq!(
            resolver.resolve("DTIG_INPUTS_IDS"),
            Value::List(vec![Value::Int(0), Value::Int(1)])
        );
    }

    #[test]
    fn test_missing_or_empty_collections() {
        let config = config();
        let resolver = Resolver::new(&config, None, 0);

        assert_eq!(resolver.resolve("DTIG_OUTPUTS"), Value::Sentinel);
        assert_eq!(resolver.resolve("DTIG_PARAMETERS"), Value::Sentinel);
        assert_eq!(resolver.resolve("DTIG_PARAMETERS_LENGTH"), Value::Int(0));
        assert_eq!(resolver.resolve("DTIG_PARAMETERS_NAMES"), Value::Absent);
        assert_eq!(resolver.resolve("DTIG_OUTPUTS_IDS"), Value::Absent);
    }

    #[test]
    fn test_constants_and_config_keys() {
        let config = config();
        let resolver = Resolver::new(&config, None, 0);

        assert_eq!(resolver.resolve("DTIG_TYPE_FLOAT_32"), Value::from("float32"));
        assert_eq!(resolver.resolve("DTIG_TYPE_PROP_DENSITY"), Value::from("density"));
        assert_eq!(resolver.resolve("DTIG_FORMALISM_DISCRETE"), Value::from("discrete"));
        assert_eq!(resolver.resolve("DTIG_FORMALISM"), Value::from("discrete"));
        assert_eq!(resolver.resolve("DTIG_CLASS_NAME"), Value::from("Engine"));
        assert_eq!(resolver.resolve("DTIG_VERSION"), Value::Absent);
        assert_eq!(resolver.resolve("DTIG_TRUE"), Value::Bool(true));
    }

    #[test]
    fn test_fallback_is_verbatim() {
        let config = config();
        let resolver = Resolver::new(&config, None, 0);
        assert_eq!(resolver.resolve("DTIG_SOMETHING_ELSE"), Value::from("DTIG_SOMETHING_ELSE"));
        assert_eq!(resolver.resolve("float32"), Value::from("float32"));
        assert_eq!(resolver.resolve("DTIG_INPUTS_COUNT"), Value::from("DTIG_INPUTS_COUNT"));
    }
}

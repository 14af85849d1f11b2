//! Target languages and their type mappings
//!
//! Each language supplies the three callbacks the template engine injects
//! for `DTIG_TO_PROTO_MESSAGE`, `DTIG_TYPE_TO_FUNCTION` and `DTIG_STR`.

use crate::config::keys::types;
use crate::error::DtigError;
use crate::template::{Callbacks, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Language a template generates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Cpp,
    Matlab,
}

/// Wire type -> (Python, C++, MATLAB) message constructor
const PROTO_MESSAGES: &[(&str, [&str; 3])] = &[
    (types::FLOAT_32, ["dtig_utils.MF32()", "dtig::MF32", "dtig.MF32"]),
    (types::FLOAT_64, ["dtig_utils.MF64()", "dtig::MF64", "dtig.MF64"]),
    (types::INT_8, ["dtig_utils.MI8()", "dtig::MI8", "dtig.MI8"]),
    (types::INT_16, ["dtig_utils.MI16()", "dtig::MI16", "dtig.MI16"]),
    (types::INT_32, ["dtig_utils.MI32()", "dtig::MI32", "dtig.MI32"]),
    (types::INT_64, ["dtig_utils.MI64()", "dtig::MI64", "dtig.MI64"]),
    (types::UINT_8, ["dtig_utils.MU8()", "dtig::MU8", "dtig.MU8"]),
    (types::UINT_16, ["dtig_utils.MU16()", "dtig::MU16", "dtig.MU16"]),
    (types::UINT_32, ["dtig_utils.MU32()", "dtig::MU32", "dtig.MU32"]),
    (types::UINT_64, ["dtig_utils.MU64()", "dtig::MU64", "dtig.MU64"]),
    (types::STRING, ["dtig_utils.MString()", "dtig::MString", "dtig.MString"]),
    (types::BOOL, ["dtig_utils.MBool()", "dtig::MBool", "dtig.MBool"]),
    (types::BYTES, ["dtig_utils.MBytes()", "dtig::MBytes", "dtig.MBytes"]),
];

/// Wire type -> (Python, C++, MATLAB) native type
const NATIVE_TYPES: &[(&str, [&str; 3])] = &[
    (types::FLOAT_32, ["float", "float", "single"]),
    (types::FLOAT_64, ["float", "double", "double"]),
    (types::INT_8, ["int", "int8_t", "int8"]),
    (types::INT_16, ["int", "int16_t", "int16"]),
    (types::INT_32, ["int", "int32_t", "int32"]),
    (types::INT_64, ["int", "int64_t", "int64"]),
    (types::UINT_8, ["int", "uint8_t", "uint8"]),
    (types::UINT_16, ["int", "uint16_t", "uint16"]),
    (types::UINT_32, ["int", "uint32_t", "uint32"]),
    (types::UINT_64, ["int", "uint64_t", "uint64"]),
    (types::STRING, ["str", "std::string", "string"]),
    (types::BOOL, ["bool", "bool", "logical"]),
    (types::BYTES, ["bytes", "std::string", "uint8"]),
];

impl Language {
    pub const ALL: [Language; 3] = [Language::Python, Language::Cpp, Language::Matlab];

    /// Stable identifier used in manifests and on the command line
    pub const fn key(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Matlab => "matlab",
        }
    }

    const fn column(self) -> usize {
        match self {
            Language::Python => 0,
            Language::Cpp => 1,
            Language::Matlab => 2,
        }
    }

    /// Message constructor for a wire type, e.g. `float32` -> `dtig::MF32`
    pub fn proto_message(self, wire_type: &str) -> Option<&'static str> {
        lookup(PROTO_MESSAGES, wire_type).map(|row| row[self.column()])
    }

    /// Native type for a wire type, e.g. `float64` -> `double`
    pub fn native_type(self, wire_type: &str) -> Option<&'static str> {
        lookup(NATIVE_TYPES, wire_type).map(|row| row[self.column()])
    }

    /// Callbacks for the template engine
    ///
    /// Unknown types are passed through unchanged.
    pub fn callbacks(self) -> Callbacks {
        Callbacks::new()
            .with_to_proto_message(move |value| {
                map_or_pass_through(value, "DTIG_TO_PROTO_MESSAGE", self, |t| {
                    self.proto_message(t)
                })
            })
            .with_type_to_function(move |value| {
                map_or_pass_through(value, "DTIG_TYPE_TO_FUNCTION", self, |t| {
                    self.native_type(t)
                })
            })
            .with_to_string(|value| format!("\"{}\"", value))
    }
}

fn lookup(table: &[(&str, [&'static str; 3])], wire_type: &str) -> Option<[&'static str; 3]> {
    table
        .iter()
        .find(|(name, _)| *name == wire_type)
        .map(|(_, row)| *row)
}

fn map_or_pass_through(
    value: &Value,
    function: &str,
    language: Language,
    map: impl Fn(&str) -> Option<&'static str>,
) -> String {
    let text = value.to_string();
    match map(&text) {
        Some(mapped) => mapped.to_string(),
        None => {
            warn!(
                function,
                language = language.key(),
                value = text.as_str(),
                "no mapping for type, passing it through"
            );
            text
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Language {
    type Err = DtigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "cpp" | "c++" => Ok(Language::Cpp),
            "matlab" => Ok(Language::Matlab),
            _ => Err(DtigError::UnknownLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::render;
    use serde_json::json;

    #[test]
    fn test_parse_language() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("C++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!(" matlab ".parse::<Language>().unwrap(), Language::Matlab);
        assert!(matches!(
            "rust".parse::<Language>(),
            Err(DtigError::UnknownLanguage(name)) if name == "rust"
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for language in Language::ALL {
            assert_eq!(language.to_string().parse::<Language>().unwrap(), language);
        }
    }

    #[test]
    fn test_every_wire_type_is_mapped() {
        let wire_types = [
            types::BOOL,
            types::BYTES,
            types::STRING,
            types::INT_8,
            types::INT_16,
            types::INT_32,
            types::INT_64,
            types::UINT_8,
            types::UINT_16,
            types::UINT_32,
            types::UINT_64,
            types::FLOAT_32,
            types::FLOAT_64,
        ];
        for language in Language::ALL {
            for wire_type in wire_types {
                assert!(language.proto_message(wire_type).is_some());
                assert!(language.native_type(wire_type).is_some());
            }
        }
    }

    #[test]
    fn test_mappings() {
        assert_eq!(Language::Python.proto_message("float32"), Some("dtig_utils.MF32()"));
        assert_eq!(Language::Cpp.proto_message("bool"), Some("dtig::MBool"));
        assert_eq!(Language::Matlab.proto_message("uint16"), Some("dtig.MU16"));
        assert_eq!(Language::Cpp.native_type("string"), Some("std::string"));
        assert_eq!(Language::Matlab.native_type("bool"), Some("logical"));
        assert_eq!(Language::Python.native_type("force"), None);
    }

    #[test]
    fn test_callbacks_render() {
        let config = json!({"inputs": [{"name": "rpm", "type": "uint32"}]});
        let template = "DTIG_FOR(DTIG_INPUTS)\nDTIG_TYPE_TO_FUNCTION(DTIG_ITEM_TYPE) DTIG_ITEM_NAME = DTIG_TO_PROTO_MESSAGE(DTIG_ITEM_TYPE); // DTIG_STR(DTIG_ITEM_NAME)\nDTIG_END_FOR";
        let output = render(template, &config, &Language::Cpp.callbacks()).unwrap();
        assert_eq!(output, "\nuint32_t rpm = dtig::MU32; // \"rpm\"");
    }

    #[test]
    fn test_callbacks_pass_unknown_types_through() {
        let config = json!({"type": "material"});
        let output = render(
            "DTIG_TO_PROTO_MESSAGE(DTIG_TYPE)",
            &config,
            &Language::Python.callbacks(),
        )
        .unwrap();
        assert_eq!(output, "material");
    }

    #[test]
    fn test_language_serde() {
        #[derive(Deserialize)]
        struct Target {
            language: Language,
        }
        let target: Target = toml::from_str("language = \"matlab\"").unwrap();
        assert_eq!(target.language, Language::Matlab);
    }
}

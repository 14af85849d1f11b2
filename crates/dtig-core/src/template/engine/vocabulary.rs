//! Reserved directive names, for tooling and documentation

use super::tokenize::{InlineFunction, Keyword};
use crate::config::keys::{self, field};
use serde::Serialize;

/// A resolver name and the text or configuration key it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameEntry {
    pub name: String,
    pub value: &'static str,
}

/// Every name the engine treats specially
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    pub keywords: Vec<&'static str>,
    pub inline_functions: Vec<&'static str>,
    pub loop_variables: Vec<String>,
    pub collections: Vec<String>,
    /// `DTIG_TYPE_*`, `DTIG_FORMALISM_*`, `DTIG_TRUE`/`DTIG_FALSE`
    pub constants: Vec<NameEntry>,
    /// `DTIG_<KEY>` names read from the configuration root
    pub config_keys: Vec<NameEntry>,
}

pub fn vocabulary() -> Vocabulary {
    let prefixed = |prefix: &str, table: &[(&str, &'static str)]| {
        table
            .iter()
            .map(|&(suffix, value)| NameEntry {
                name: format!("DTIG_{}{}", prefix, suffix),
                value,
            })
            .collect::<Vec<_>>()
    };

    let mut loop_variables = vec!["DTIG_INDEX".to_string(), "DTIG_ITEM".to_string()];
    loop_variables.extend(
        field::ALL
            .iter()
            .map(|f| format!("DTIG_ITEM_{}", f.to_ascii_uppercase())),
    );

    let collections = ["INPUTS", "OUTPUTS", "PARAMETERS"]
        .iter()
        .flat_map(|c| {
            ["", "_LENGTH", "_NAMES", "_IDS"]
                .iter()
                .map(move |accessor| format!("DTIG_{}{}", c, accessor))
        })
        .collect();

    let mut constants = prefixed("TYPE_", keys::TYPE_CONSTANTS);
    constants.extend(prefixed("FORMALISM_", keys::FORMALISM_CONSTANTS));
    constants.extend(prefixed("", &[("TRUE", "True"), ("FALSE", "False")]));

    Vocabulary {
        keywords: Keyword::ALL.iter().map(|k| k.directive()).collect(),
        inline_functions: InlineFunction::ALL.iter().map(|f| f.directive()).collect(),
        loop_variables,
        collections,
        constants,
        config_keys: prefixed("", keys::CONFIG_KEYS),
    }
}

//! Fixture models, templates and projects

use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// Python server fragment dispatching on input names
pub const SERVER_TEMPLATE: &str = "\
import dtig_utils

class DTIG_CLASS_NAME:
    def set_input(self, ref, value):
DTIG_FOR(DTIG_INPUTS)
DTIG_IF(DTIG_INDEX == 0)
        if ref == DTIG_STR(DTIG_ITEM_NAME):
DTIG_ELSE
        elif ref == DTIG_STR(DTIG_ITEM_NAME):
DTIG_END_IF
            value = DTIG_TO_PROTO_MESSAGE(DTIG_ITEM_TYPE)
DTIG_END_FOR
";

/// C++ struct with one member per input
pub const HEADER_TEMPLATE: &str = "\
#pragma once
#include <cstdint>
#include <string>

struct DTIG_CLASS_NAME {
DTIG_FOR(DTIG_INPUTS)
    DTIG_TYPE_TO_FUNCTION(DTIG_ITEM_TYPE) DTIG_ITEM_NAME;
DTIG_END_FOR
};
";

/// dtig.toml for [`write_project`]
pub const MANIFEST: &str = r#"[project]
name = "fixture-project"
model = "model.json"

[[targets]]
template = "templates/server.py.tmpl"
output = "generated/server.py"
language = "python"

[[targets]]
template = "templates/model.hpp.tmpl"
output = "generated/model.hpp"
language = "cpp"
"#;

/// Model with two inputs, one output and no parameters
pub fn engine_model() -> Value {
    json!({
        "formalism": "discrete",
        "classname": "Engine",
        "version": "1.2.0",
        "inputs": [
            {"id": 0, "name": "throttle", "type": "float32", "unit": "%"},
            {"id": 1, "name": "brake", "type": "bool"}
        ],
        "outputs": [
            {"id": 2, "name": "speed", "type": "float64", "unit": "m/s"}
        ]
    })
}

/// Write [`engine_model`] as `model.json` under `dir`
pub fn write_model(dir: &Path) -> PathBuf {
    let path = dir.join("model.json");
    let content = serde_json::to_string_pretty(&engine_model()).expect("Failed to serialize model");
    std::fs::write(&path, content).expect("Failed to write model.json");
    path
}

/// Lay out a complete project under `root`
///
/// ```text
/// root/
/// ├── dtig.toml
/// ├── model.json
/// └── templates/
///     ├── server.py.tmpl
///     └── model.hpp.tmpl
/// ```
pub fn write_project(root: &Path) {
    std::fs::write(root.join("dtig.toml"), MANIFEST).expect("Failed to write dtig.toml");
    write_model(root);

    let templates = root.join("templates");
    std::fs::create_dir_all(&templates).expect("Failed to create templates/");
    std::fs::write(templates.join("server.py.tmpl"), SERVER_TEMPLATE)
        .expect("Failed to write server template");
    std::fs::write(templates.join("model.hpp.tmpl"), HEADER_TEMPLATE)
        .expect("Failed to write header template");
}

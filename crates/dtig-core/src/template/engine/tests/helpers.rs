//! Shared test helpers for template engine tests

use crate::template::engine::{Callbacks, TemplateEngine};
use crate::template::{TemplateError, Value};
use serde_json::{json, Value as Json};

/// Model with two inputs, one output and no parameters
pub(super) fn engine_config() -> Json {
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

/// Callbacks in the style of the Python target, with short message names
pub(super) fn test_callbacks() -> Callbacks {
    Callbacks::new()
        .with_to_proto_message(|v: &Value| match v.as_str() {
            Some("float32") => "FloatMsg()".to_string(),
            Some("float64") => "DoubleMsg()".to_string(),
            Some("bool") => "BoolMsg()".to_string(),
            _ => format!("Msg({})", v),
        })
        .with_type_to_function(|v: &Value| format!("to_{}", v))
        .with_to_string(|v: &Value| format!("\"{}\"", v))
}

/// Render with [`test_callbacks`]
pub(super) fn render_with(template: &str, config: &Json) -> Result<String, TemplateError> {
    TemplateEngine::new(test_callbacks()).render(template, config)
}

//! FOR loop rendering tests

use super::helpers::{engine_config, render_with};
use serde_json::json;

#[test]
fn test_render_for_order_and_index() {
    let config = engine_config();
    let template = "DTIG_FOR(DTIG_INPUTS)DTIG_INDEX:DTIG_ITEM_NAME DTIG_END_FOR";
    assert_eq!(render_with(template, &config).unwrap(), "0:throttle 1:brake ");
}

#[test]
fn test_render_for_one_line_per_item() {
    let config = engine_config();
    let template = "\
fields = [
DTIG_FOR(DTIG_INPUTS)
    DTIG_STR(DTIG_ITEM_NAME),
DTIG_END_FOR
]
";
    assert_eq!(
        render_with(template, &config).unwrap(),
        "fields = [\n    \"throttle\",\n    \"brake\",\n]"
    );
}

#[test]
fn test_render_for_missing_collection_is_silent() {
    let config = engine_config();
    let template = "a DTIG_FOR(DTIG_PARAMETERS)x DTIG_END_FOR b";
    assert_eq!(render_with(template, &config).unwrap(), "a  b");
}

#[test]
fn test_render_for_empty_collection_is_silent() {
    let config = json!({"inputs": []});
    let template = "[DTIG_FOR(DTIG_INPUTS)DTIG_ITEM_NAME DTIG_END_FOR]";
    assert_eq!(render_with(template, &config).unwrap(), "[]");
}

#[test]
fn test_render_for_falsy_values_skip() {
    let config = engine_config();
    assert_eq!(
        render_with("[DTIG_FOR(DTIG_FALSE)x DTIG_END_FOR]", &config).unwrap(),
        "[]"
    );
    assert_eq!(
        render_with("[DTIG_FOR(DTIG_AUTHORS)x DTIG_END_FOR]", &config).unwrap(),
        "[]"
    );
}

#[test]
fn test_render_for_dry_run_keeps_macros() {
    // The body of a loop over a missing collection still runs once
    let config = engine_config();
    let template = "DTIG_FOR(DTIG_PARAMETERS)DTIG_DEF DTIG_P()p DTIG_END_DEF DTIG_END_FOR DTIG_P";
    assert_eq!(render_with(template, &config).unwrap(), " p ");
}

#[test]
fn test_render_for_dry_run_binds_placeholder() {
    let config = engine_config();
    let template = "\
DTIG_FOR(DTIG_PARAMETERS)
DTIG_IF(DTIG_ITEM_NAME == Invalid)
DTIG_DEF DTIG_SEEN()placeholder
DTIG_END_DEF
DTIG_END_IF
DTIG_END_FOR
DTIG_SEEN";
    assert_eq!(render_with(template, &config).unwrap(), "placeholder");
}

#[test]
fn test_render_nested_for() {
    let config = engine_config();
    let template = "DTIG_FOR(DTIG_OUTPUTS)DTIG_ITEM_NAME: DTIG_FOR(DTIG_INPUTS)DTIG_ITEM_NAME,DTIG_END_FOR DTIG_END_FOR";
    assert_eq!(
        render_with(template, &config).unwrap(),
        "speed: throttle,brake, "
    );
}

#[test]
fn test_render_for_restores_outer_scope() {
    let config = engine_config();
    let template = "DTIG_FOR(DTIG_INPUTS)DTIG_END_FOR[DTIG_ITEM_NAME][DTIG_INDEX]";
    assert_eq!(render_with(template, &config).unwrap(), "[][0]");
}

#[test]
fn test_render_for_over_names() {
    let config = engine_config();
    let template = "DTIG_FOR(DTIG_INPUTS_NAMES)DTIG_ITEM;DTIG_END_FOR";
    assert_eq!(render_with(template, &config).unwrap(), "throttle;brake;");
}

#[test]
fn test_render_for_over_expression() {
    let config = engine_config();
    let template = "DTIG_FOR(DTIG_INPUTS + DTIG_OUTPUTS)DTIG_ITEM_ID DTIG_END_FOR";
    assert_eq!(render_with(template, &config).unwrap(), "0 1 2 ");
}

#[test]
fn test_render_for_index_condition() {
    let config = engine_config();
    let template = "DTIG_FOR(DTIG_INPUTS)DTIG_IF(DTIG_INDEX == 0)first DTIG_ELSE next DTIG_END_IF DTIG_END_FOR";
    assert_eq!(render_with(template, &config).unwrap(), "first   next  ");
}

#[test]
fn test_render_for_missing_field_condition() {
    let config = engine_config();
    let template = "\
DTIG_FOR(DTIG_INPUTS)
DTIG_IF(NOT HAS DTIG_ITEM_UNIT)
DTIG_ITEM_NAME has no unit
DTIG_END_IF
DTIG_END_FOR";
    assert_eq!(
        render_with(template, &config).unwrap(),
        "\nbrake has no unit"
    );
}

#[test]
fn test_render_concrete_scenario() {
    let config = json!({"inputs": [{"name": "throttle", "type": "float32"}]});
    let template = "\
DTIG_FOR(DTIG_INPUTS)
DTIG_IF(DTIG_INDEX == 0)
if ref == DTIG_STR(DTIG_ITEM_NAME):
DTIG_ELSE
elif ref == DTIG_STR(DTIG_ITEM_NAME):
DTIG_END_IF
    value = DTIG_TO_PROTO_MESSAGE(DTIG_ITEM_TYPE)
DTIG_END_FOR
";
    assert_eq!(
        render_with(template, &config).unwrap(),
        "\nif ref == \"throttle\":\n    value = FloatMsg()"
    );
}

#[test]
fn test_render_concrete_scenario_two_inputs() {
    let config = engine_config();
    let template = "\
def handle(ref, value):
DTIG_FOR(DTIG_INPUTS)
DTIG_IF(DTIG_INDEX == 0)
    if ref == DTIG_STR(DTIG_ITEM_NAME):
DTIG_ELSE
    elif ref == DTIG_STR(DTIG_ITEM_NAME):
DTIG_END_IF
        value = DTIG_TO_PROTO_MESSAGE(DTIG_ITEM_TYPE)
DTIG_END_FOR
";
    let expected = "\
def handle(ref, value):
    if ref == \"throttle\":
        value = FloatMsg()
    elif ref == \"brake\":
        value = BoolMsg()";
    assert_eq!(render_with(template, &config).unwrap(), expected);
}

//! Timeout, depth limit and large input tests for template engine

use super::helpers::{engine_config, test_callbacks};
use super::tokenize::TokenStream;
use super::*;
use serde_json::json;
use std::time::Duration;

#[test]
fn test_tokenstream_step_counter_terminates_on_large_input() {
    // 250 directives in well over 5000 bytes: the 3x step bound must not
    // cut the scan short
    let mut large_input = String::with_capacity(8000);
    for i in 0..250 {
        large_input.push_str(&format!("text before {} DTIG_ITEM_NAME text after. ", i));
    }

    let tokens: Vec<_> = TokenStream::new(&large_input).collect();
    assert_eq!(tokens.len(), 250);
    assert!(large_input.len() > 5000);
}

#[test]
fn test_render_large_template_completes() {
    let items: Vec<_> = (0..100)
        .map(|i| json!({"id": i, "name": format!("item{}", i), "type": "int32"}))
        .collect();
    let config = json!({ "inputs": items.clone(), "outputs": items });

    let template = "\
DTIG_FOR(DTIG_INPUTS)
in DTIG_ITEM_NAME
DTIG_FOR(DTIG_OUTPUTS)
  out DTIG_ITEM_NAME = DTIG_TYPE_TO_FUNCTION(DTIG_ITEM_TYPE)
DTIG_END_FOR
DTIG_END_FOR";

    let output = TemplateEngine::new(test_callbacks())
        .render(template, &config)
        .expect("large template should render within the timeout");
    assert!(output.len() > 100_000);
    assert_eq!(output.lines().filter(|l| l.starts_with("in ")).count(), 100);
}

#[test]
fn test_self_invoking_macro_hits_depth_limit() {
    let options = RenderOptions {
        max_depth: 8,
        ..RenderOptions::default()
    };
    let engine = TemplateEngine::with_options(test_callbacks(), options);
    let err = engine
        .render("DTIG_DEF DTIG_LOOP()DTIG_LOOP()DTIG_END_DEF DTIG_LOOP()", &engine_config())
        .unwrap_err();
    assert_eq!(
        err,
        TemplateError::RecursionLimit {
            directive: "DTIG_LOOP".to_string(),
            limit: 8,
            line: 1,
        }
    );
}

#[test]
fn test_self_invoking_macro_default_limit() {
    let err = render(
        "DTIG_DEF DTIG_LOOP()x DTIG_LOOP DTIG_END_DEF\nDTIG_LOOP",
        &engine_config(),
        &test_callbacks(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        TemplateError::RecursionLimit { limit, .. } if limit == DEFAULT_MAX_DEPTH
    ));
}

#[test]
fn test_nested_if_depth_limit() {
    let options = RenderOptions {
        max_depth: 3,
        ..RenderOptions::default()
    };
    let engine = TemplateEngine::with_options(test_callbacks(), options);
    let config = engine_config();

    // One directive per line: `DTIG_END_IFDTIG_END_IF` would scan as a single name
    let nested = |depth: usize| {
        format!(
            "{}core{}",
            "DTIG_IF(1)\n".repeat(depth),
            "\nDTIG_END_IF".repeat(depth)
        )
    };

    assert_eq!(engine.render(&nested(3), &config).unwrap(), "\ncore");
    let err = engine.render(&nested(4), &config).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::RecursionLimit { ref directive, limit: 3, line: 4 } if directive == "DTIG_IF"
    ));
}

#[test]
fn test_zero_timeout_fails_on_first_directive() {
    let options = RenderOptions {
        timeout: Duration::ZERO,
        ..RenderOptions::default()
    };
    let engine = TemplateEngine::with_options(test_callbacks(), options);
    let err = engine.render("class DTIG_CLASS_NAME", &engine_config()).unwrap_err();

    assert!(matches!(err, TemplateError::Timeout { max_duration, .. } if max_duration.is_zero()));
    assert_eq!(err.line(), None);
    assert!(err.to_string().contains("timed out"));
}

// A wall-clock test against RENDER_TIMEOUT itself would have to run for ten
// seconds; the zero-timeout test above drives the same check.

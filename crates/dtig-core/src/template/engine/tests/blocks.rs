//! Balancer and argument extraction tests

use crate::template::engine::blocks::{
    extract_arguments, find_balanced_end, find_block_end, split_arguments, ArgumentError,
    BlockSpec, Mark,
};
use super::tokenize::{Keyword, TokenStream};

/// Body text from `body_start` to the terminator found for `spec`
fn block(text: &str, body_start: usize, spec: &BlockSpec) -> Option<(String, Keyword)> {
    let mut tokens = TokenStream::new(text);
    tokens.advance_to(body_start);
    find_block_end(&mut tokens, spec).map(|end| {
        (
            text[body_start..end.start].to_string(),
            end.keyword().unwrap(),
        )
    })
}

#[test]
fn test_find_balanced_end_generic_marks() {
    let marks = ['a', '(', 'b', ')', ')', 'c'];
    let end = find_balanced_end(marks.iter().enumerate(), |(_, c)| match c {
        '(' => Mark::Opener,
        ')' => Mark::Closer,
        _ => Mark::Other,
    });
    assert_eq!(end.map(|(i, _)| i), Some(4));
}

#[test]
fn test_find_balanced_end_skips_nested_terminators() {
    // Opener, nested terminator, closer of the nested block, then our terminator
    let marks = [Mark::Opener, Mark::Terminator, Mark::Closer, Mark::Terminator];
    let end = find_balanced_end(marks.iter().enumerate(), |(_, m)| **m);
    assert_eq!(end.map(|(i, _)| i), Some(3));
}

#[test]
fn test_find_balanced_end_none_when_unclosed() {
    let marks = [Mark::Opener, Mark::Closer];
    assert!(find_balanced_end(marks.iter(), |m| **m).is_none());
}

#[test]
fn test_if_block_stops_at_else() {
    let text = "DTIG_IF(a) yes DTIG_ELSE no DTIG_END_IF";
    let (body, keyword) = block(text, 10, &BlockSpec::IF_BRANCH).unwrap();
    assert_eq!(body, " yes ");
    assert_eq!(keyword, Keyword::Else);
}

#[test]
fn test_if_block_skips_nested_else() {
    let text = "DTIG_IF(a) DTIG_IF(b) x DTIG_ELSE y DTIG_END_IF z DTIG_ELSE_IF(c) w DTIG_END_IF";
    let (body, keyword) = block(text, 10, &BlockSpec::IF_BRANCH).unwrap();
    assert_eq!(body, " DTIG_IF(b) x DTIG_ELSE y DTIG_END_IF z ");
    assert_eq!(keyword, Keyword::ElseIf);
}

#[test]
fn test_else_block_ignores_stray_else() {
    let text = "DTIG_ELSE a DTIG_ELSE b DTIG_END_IF";
    let (body, keyword) = block(text, 9, &BlockSpec::ELSE_BRANCH).unwrap();
    assert_eq!(body, " a DTIG_ELSE b ");
    assert_eq!(keyword, Keyword::EndIf);
}

#[test]
fn test_for_block_nested_and_formalism_is_not_for() {
    let text = "DTIG_FOR(x) DTIG_FORMALISM DTIG_FOR(y) DTIG_END_FOR DTIG_END_FOR tail";
    let (body, keyword) = block(text, 11, &BlockSpec::FOR).unwrap();
    assert_eq!(body, " DTIG_FORMALISM DTIG_FOR(y) DTIG_END_FOR ");
    assert_eq!(keyword, Keyword::EndFor);
}

#[test]
fn test_def_block_unterminated() {
    let text = "DTIG_DEF DTIG_M(A) body DTIG_END_FOR";
    assert!(block(text, 18, &BlockSpec::DEF).is_none());
}

#[test]
fn test_extract_arguments_nested_parens() {
    let text = "DTIG_IF((DTIG_A + 1) * (2)) rest";
    let (args, after) = extract_arguments(text, 7).unwrap();
    assert_eq!(args, "(DTIG_A + 1) * (2)");
    assert_eq!(&text[after..], " rest");
}

#[test]
fn test_extract_arguments_allows_spaces_before_paren() {
    let text = "DTIG_FOR \t(DTIG_INPUTS)";
    let (args, after) = extract_arguments(text, 8).unwrap();
    assert_eq!(args, "DTIG_INPUTS");
    assert_eq!(after, text.len());
}

#[test]
fn test_extract_arguments_errors() {
    assert_eq!(
        extract_arguments("DTIG_IF x", 7),
        Err(ArgumentError::MissingOpenParen)
    );
    assert_eq!(
        extract_arguments("DTIG_IF\n(x)", 7),
        Err(ArgumentError::MissingOpenParen)
    );
    assert_eq!(
        extract_arguments("DTIG_IF(a (b)", 7),
        Err(ArgumentError::Unbalanced)
    );
    assert_eq!(extract_arguments("DTIG_IF", 7), Err(ArgumentError::MissingOpenParen));
}

#[test]
fn test_split_arguments() {
    assert_eq!(split_arguments("A, B"), vec!["A", "B"]);
    assert_eq!(split_arguments(" x , f(y, z) "), vec!["x", "f(y, z)"]);
    assert!(split_arguments("").is_empty());
    assert!(split_arguments("  ").is_empty());
    assert_eq!(split_arguments("a,,b"), vec!["a", "", "b"]);
}

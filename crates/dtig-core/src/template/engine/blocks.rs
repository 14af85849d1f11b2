//! Block matching utilities (closing directives, argument lists)

use super::tokenize::{Keyword, Token, TokenStream};

/// Role of one mark in a balanced scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mark {
    /// Opens a nested block
    Opener,
    /// Ends the scan at depth 0, ignored when nested (`ELSE`, `ELSE_IF`)
    Terminator,
    /// Ends the scan at depth 0, closes one nested block otherwise
    Closer,
    Other,
}

/// Find the first terminator at nesting depth 0
///
/// Only closers decrement the depth, so intermediate terminators of nested
/// blocks (an inner `ELSE`) are skipped while the outer block's own
/// terminators still end the scan. The iterator is left positioned right
/// after the returned mark.
pub(crate) fn find_balanced_end<I, F>(marks: I, classify: F) -> Option<I::Item>
where
    I: Iterator,
    F: Fn(&I::Item) -> Mark,
{
    let mut depth = 0usize;

    for mark in marks {
        match classify(&mark) {
            Mark::Opener => depth += 1,
            Mark::Terminator | Mark::Closer if depth == 0 => return Some(mark),
            Mark::Closer => depth -= 1,
            Mark::Terminator | Mark::Other => {}
        }
    }

    None
}

/// Opener, terminator set and canonical closer of a block directive
#[derive(Debug, Clone, Copy)]
pub(crate) struct BlockSpec {
    pub opener: Keyword,
    pub terminators: &'static [Keyword],
    pub closer: Keyword,
}

impl BlockSpec {
    /// Body of an `IF` or `ELSE_IF` branch
    pub const IF_BRANCH: BlockSpec = BlockSpec {
        opener: Keyword::If,
        terminators: &[Keyword::ElseIf, Keyword::Else],
        closer: Keyword::EndIf,
    };

    /// Body of an `ELSE` branch
    pub const ELSE_BRANCH: BlockSpec = BlockSpec {
        opener: Keyword::If,
        terminators: &[],
        closer: Keyword::EndIf,
    };

    pub const FOR: BlockSpec = BlockSpec {
        opener: Keyword::For,
        terminators: &[],
        closer: Keyword::EndFor,
    };

    pub const DEF: BlockSpec = BlockSpec {
        opener: Keyword::Def,
        terminators: &[],
        closer: Keyword::EndDef,
    };

    fn classify(&self, token: &Token) -> Mark {
        match token.keyword() {
            Some(keyword) if keyword == self.opener => Mark::Opener,
            Some(keyword) if keyword == self.closer => Mark::Closer,
            Some(keyword) if self.terminators.contains(&keyword) => Mark::Terminator,
            _ => Mark::Other,
        }
    }
}

/// Find the directive that ends the block whose body starts at the stream's
/// current position
///
/// # Performance
///
/// Consumes tokens from the caller's stream, so a whole template is still
/// scanned in a single forward pass.
pub(crate) fn find_block_end(tokens: &mut TokenStream<'_>, spec: &BlockSpec) -> Option<Token> {
    find_balanced_end(tokens.by_ref(), |token| spec.classify(token))
}

/// Why an argument list could not be extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ArgumentError {
    /// Something other than `(` follows the directive
    MissingOpenParen,
    /// The `(` is never closed
    Unbalanced,
}

/// Extract a parenthesized argument list starting at `pos`
///
/// Spaces and tabs may separate the directive from `(`. Returns the text
/// between the parentheses and the position right after the closing `)`.
pub(crate) fn extract_arguments(text: &str, pos: usize) -> Result<(&str, usize), ArgumentError> {
    let rest = &text[pos..];
    let skipped = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let open = pos + skipped;

    if text.as_bytes().get(open) != Some(&b'(') {
        return Err(ArgumentError::MissingOpenParen);
    }

    let body_start = open + 1;
    let parens = text[body_start..]
        .char_indices()
        .filter(|(_, c)| *c == '(' || *c == ')');
    let (close, _) = find_balanced_end(parens, |(_, c)| {
        if *c == '(' {
            Mark::Opener
        } else {
            Mark::Closer
        }
    })
    .ok_or(ArgumentError::Unbalanced)?;

    let close = body_start + close;
    Ok((&text[body_start..close], close + 1))
}

/// Split an argument list at top-level commas, trimming each piece
///
/// `"a, f(b, c)"` yields `["a", "f(b, c)"]`. An empty or all-blank list
/// yields no arguments.
pub(crate) fn split_arguments(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut piece_start = 0;

    for (i, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(args[piece_start..i].trim());
                piece_start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(args[piece_start..].trim());

    pieces
}

//! Directive scanning for the template engine
//!
//! Provides O(n) discovery of `DTIG_*` directive tokens using a state machine.

/// Prefix every directive token starts with
pub(crate) const DIRECTIVE_PREFIX: &[u8] = b"DTIG_";

/// Block-structuring keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    If,
    ElseIf,
    Else,
    EndIf,
    For,
    EndFor,
    Def,
    EndDef,
}

impl Keyword {
    pub(crate) const ALL: [Keyword; 8] = [
        Self::If,
        Self::ElseIf,
        Self::Else,
        Self::EndIf,
        Self::For,
        Self::EndFor,
        Self::Def,
        Self::EndDef,
    ];

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "IF" => Some(Self::If),
            "ELSE_IF" => Some(Self::ElseIf),
            "ELSE" => Some(Self::Else),
            "END_IF" => Some(Self::EndIf),
            "FOR" => Some(Self::For),
            "END_FOR" => Some(Self::EndFor),
            "DEF" => Some(Self::Def),
            "END_DEF" => Some(Self::EndDef),
            _ => None,
        }
    }

    /// Full directive spelling, used in error messages
    pub(crate) fn directive(self) -> &'static str {
        match self {
            Self::If => "DTIG_IF",
            Self::ElseIf => "DTIG_ELSE_IF",
            Self::Else => "DTIG_ELSE",
            Self::EndIf => "DTIG_END_IF",
            Self::For => "DTIG_FOR",
            Self::EndFor => "DTIG_END_FOR",
            Self::Def => "DTIG_DEF",
            Self::EndDef => "DTIG_END_DEF",
        }
    }
}

/// Inline substitution functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InlineFunction {
    ToProtoMessage,
    TypeToFunction,
    Str,
}

impl InlineFunction {
    pub(crate) const ALL: [InlineFunction; 3] = [Self::ToProtoMessage, Self::TypeToFunction, Self::Str];

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "TO_PROTO_MESSAGE" => Some(Self::ToProtoMessage),
            "TYPE_TO_FUNCTION" => Some(Self::TypeToFunction),
            "STR" => Some(Self::Str),
            _ => None,
        }
    }

    /// Lookup by full directive spelling (`DTIG_STR`), as written in expressions
    pub(crate) fn from_directive(directive: &str) -> Option<Self> {
        directive
            .strip_prefix("DTIG_")
            .and_then(Self::from_name)
    }

    pub(crate) fn directive(self) -> &'static str {
        match self {
            Self::ToProtoMessage => "DTIG_TO_PROTO_MESSAGE",
            Self::TypeToFunction => "DTIG_TYPE_TO_FUNCTION",
            Self::Str => "DTIG_STR",
        }
    }
}

/// Token classification
///
/// Names that are neither keywords nor inline functions stay unclassified
/// here: whether they are a macro invocation or a variable reference depends
/// on the macro table at render time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// `DTIG_IF`, `DTIG_END_FOR`, ...
    Keyword(Keyword),

    /// `DTIG_TO_PROTO_MESSAGE`, `DTIG_TYPE_TO_FUNCTION`, `DTIG_STR`
    Inline(InlineFunction),

    /// Any other `DTIG_*` name, stored with its prefix
    Name(String),
}

/// A single directive token with position and classification
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    /// Token classification
    pub kind: TokenKind,
    /// Absolute byte position of the `D` of `DTIG_`
    pub start: usize,
    /// Total length in bytes including the prefix
    pub length: usize,
    /// Line number where token starts (for error messages)
    pub line: usize,
}

impl Token {
    /// Byte position right after the token
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }
}

/// Scanner state machine (explicit for testability)
///
/// # State Transitions
///
/// ```text
/// Normal ──D──> Prefix{1} ──T──> Prefix{2} ──I──> Prefix{3} ──G──> Prefix{4} ──_──> Prefix{5}
///   ^              │                                                                 │
///   │              │ (mismatch: reprocess byte in Normal)                            │ [A-Z_]
///   └──────────────┘                                                                 v
///   └────────────────── (non-name byte or EOF: yield token, reprocess) ─────────── InName
/// ```
///
/// `DTIG>` parameter markers fall out of `Prefix{4}` on the `>` and are never
/// reported as tokens.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ScanState {
    /// Scanning literal text
    Normal,

    /// Partway through `DTIG_`
    Prefix {
        /// Position of the `D`
        start: usize,
        /// Number of prefix bytes matched so far
        matched: usize,
    },

    /// Past `DTIG_`, accumulating `[A-Z_]` name bytes
    InName {
        /// Position of the `D`
        start: usize,
        /// Line of the token
        line: usize,
    },
}

/// Iterator over directive tokens in a template string
///
/// Forward-only: each byte is processed once, except a byte that ends a
/// prefix or name, which is looked at a second time in `Normal` state.
///
/// # Example
///
/// ```ignore
/// // Internal use only, not part of public API
/// let text = "value = DTIG_ITEM_NAME";
/// let mut stream = TokenStream::new(text);
///
/// while let Some(token) = stream.next() {
///     println!("Token at {}: {:?}", token.start, token.kind);
/// }
/// ```
pub(crate) struct TokenStream<'a> {
    /// Zero-copy byte slice of template text
    bytes: &'a [u8],
    /// Current byte position
    pos: usize,
    /// State machine state
    state: ScanState,
    /// Current line number (for error messages)
    line: usize,
    /// Step count for O(n) timeout protection
    step_count: usize,
}

impl<'a> TokenStream<'a> {
    /// Create a new TokenStream from template text
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            state: ScanState::Normal,
            line: 1,
            step_count: 0,
        }
    }

    /// Current line number
    pub fn line(&self) -> usize {
        self.line
    }

    /// Jump forward to `pos`, counting the newlines skipped over
    ///
    /// Used to step over argument lists and block bodies the renderer has
    /// already consumed. Never moves backward.
    pub fn advance_to(&mut self, pos: usize) {
        let target = pos.min(self.bytes.len());
        if target > self.pos {
            self.line += self.bytes[self.pos..target]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.pos = target;
        }
        self.state = ScanState::Normal;
    }

    /// Classify a token's name (the part after `DTIG_`)
    fn classify_name(&self, start: usize, end: usize) -> TokenKind {
        let full = std::str::from_utf8(&self.bytes[start..end]).unwrap_or("");
        let name = &full[DIRECTIVE_PREFIX.len().min(full.len())..];

        if let Some(keyword) = Keyword::from_name(name) {
            TokenKind::Keyword(keyword)
        } else if let Some(function) = InlineFunction::from_name(name) {
            TokenKind::Inline(function)
        } else {
            TokenKind::Name(full.to_string())
        }
    }

    /// Build the token ending at the current position
    fn finish_token(&mut self, start: usize, line: usize) -> Token {
        let token = Token {
            kind: self.classify_name(start, self.pos),
            start,
            length: self.pos - start,
            line,
        };
        self.state = ScanState::Normal;
        token
    }

    /// Check if we should continue iteration (step guard)
    #[inline]
    fn should_continue(&mut self, max_steps: usize) -> bool {
        self.step_count += 1;
        self.step_count <= max_steps
    }

    /// Record step for O(n) performance verification in tests
    #[cfg(test)]
    #[inline]
    fn record_test_step() {
        test_counter::inc();
    }

    /// Process Normal state: look for the start of the prefix
    fn process_normal(&mut self, byte: u8) {
        if byte == DIRECTIVE_PREFIX[0] {
            self.state = ScanState::Prefix {
                start: self.pos,
                matched: 1,
            };
        } else if byte == b'\n' {
            self.line += 1;
        }
        self.pos += 1;
    }

    /// Process Prefix state
    ///
    /// Returns false if the byte should be reprocessed in Normal state
    fn process_prefix(&mut self, byte: u8, start: usize, matched: usize) -> bool {
        if matched == DIRECTIVE_PREFIX.len() {
            if is_name_byte(byte) {
                self.state = ScanState::InName {
                    start,
                    line: self.line,
                };
                self.pos += 1;
                return true;
            }
            self.state = ScanState::Normal;
            return false;
        }

        if byte == DIRECTIVE_PREFIX[matched] {
            self.state = ScanState::Prefix {
                start,
                matched: matched + 1,
            };
            self.pos += 1;
            true
        } else {
            self.state = ScanState::Normal;
            false
        }
    }
}

/// Name bytes after the prefix: `[A-Z_]`
#[inline]
fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte == b'_'
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        const MAX_STEPS_MULTIPLIER: usize = 3;
        // +1 leaves room for the end-of-input check
        let max_steps = self
            .bytes
            .len()
            .saturating_mul(MAX_STEPS_MULTIPLIER)
            .saturating_add(1);

        loop {
            if !self.should_continue(max_steps) {
                return None;
            }

            if self.pos >= self.bytes.len() {
                // A name running into the end of input is still a token
                return match self.state {
                    ScanState::InName { start, line } => Some(self.finish_token(start, line)),
                    _ => {
                        self.state = ScanState::Normal;
                        None
                    }
                };
            }

            let byte = self.bytes[self.pos];
            #[cfg(test)]
            Self::record_test_step();

            match self.state {
                ScanState::Normal => self.process_normal(byte),
                ScanState::Prefix { start, matched } => {
                    if !self.process_prefix(byte, start, matched) {
                        continue;
                    }
                }
                ScanState::InName { start, line } => {
                    if is_name_byte(byte) {
                        self.pos += 1;
                    } else {
                        // Byte is reprocessed by the next call in Normal state
                        return Some(self.finish_token(start, line));
                    }
                }
            }
        }
    }
}

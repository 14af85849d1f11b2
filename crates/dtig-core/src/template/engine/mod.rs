//! Template engine implementation

mod blocks;
mod expr;
mod helpers;
mod resolve;
mod tokenize;
mod vocabulary;

use crate::config::ConfigReader;
use crate::template::error::TemplateError;
use crate::template::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use blocks::{extract_arguments, find_block_end, split_arguments, ArgumentError, BlockSpec};
use expr::{Environment, ExprError};
use helpers::{substitute_parameters, trim_directive_line};
use resolve::Resolver;
use tokenize::{InlineFunction, Keyword, Token, TokenKind, TokenStream};

pub use vocabulary::{vocabulary, NameEntry, Vocabulary};

/// Maximum duration for one render call (runaway expansion protection)
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Default limit on nested bodies and macro expansions
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A type-mapping or stringify callback supplied by the caller
pub type Callback = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Callbacks behind the inline functions
///
/// Built once per target language and shared by every render.
#[derive(Clone, Default)]
pub struct Callbacks {
    to_proto_message: Option<Callback>,
    type_to_function: Option<Callback>,
    to_string: Option<Callback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping used by `DTIG_TO_PROTO_MESSAGE`
    pub fn with_to_proto_message(
        mut self,
        f: impl Fn(&Value) -> String + Send + Sync + 'static,
    ) -> Self {
        self.to_proto_message = Some(Arc::new(f));
        self
    }

    /// Mapping used by `DTIG_TYPE_TO_FUNCTION`
    pub fn with_type_to_function(
        mut self,
        f: impl Fn(&Value) -> String + Send + Sync + 'static,
    ) -> Self {
        self.type_to_function = Some(Arc::new(f));
        self
    }

    /// Stringifier used by `DTIG_STR`; plain splicing when unset
    pub fn with_to_string(mut self, f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.to_string = Some(Arc::new(f));
        self
    }

    fn apply(&self, function: InlineFunction, value: &Value) -> Result<String, ExprError> {
        let callback = match function {
            InlineFunction::ToProtoMessage => &self.to_proto_message,
            InlineFunction::TypeToFunction => &self.type_to_function,
            InlineFunction::Str => {
                return Ok(match &self.to_string {
                    Some(to_string) => to_string(value),
                    None => value.to_string(),
                })
            }
        };
        callback
            .as_ref()
            .map(|f| f(value))
            .ok_or(ExprError::MissingCallback(function))
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("to_proto_message", &self.to_proto_message.is_some())
            .field("type_to_function", &self.type_to_function.is_some())
            .field("to_string", &self.to_string.is_some())
            .finish()
    }
}

/// Resource limits for one render call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum nesting of IF/FOR bodies and macro expansions
    pub max_depth: usize,
    /// Wall-clock limit
    pub timeout: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            timeout: RENDER_TIMEOUT,
        }
    }
}

/// Template engine, configured once per target language
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    callbacks: Callbacks,
    options: RenderOptions,
}

impl TemplateEngine {
    /// Create a new template engine with default limits
    pub fn new(callbacks: Callbacks) -> Self {
        Self::with_options(callbacks, RenderOptions::default())
    }

    pub fn with_options(callbacks: Callbacks, options: RenderOptions) -> Self {
        Self { callbacks, options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render a template against a model configuration
    ///
    /// Each call starts from fresh state: no loop item, index 0 and an empty
    /// macro table.
    pub fn render(
        &self,
        template: &str,
        config: &dyn ConfigReader,
    ) -> Result<String, TemplateError> {
        let renderer = Renderer {
            config,
            callbacks: &self.callbacks,
            options: self.options,
            start: Instant::now(),
        };
        let mut macros = MacroTable::new();
        renderer.render_block(template, Frame::root(), &mut macros)
    }
}

/// Convenience function to render a template
pub fn render(
    template: &str,
    config: &dyn ConfigReader,
    callbacks: &Callbacks,
) -> Result<String, TemplateError> {
    TemplateEngine::new(callbacks.clone()).render(template, config)
}

/// A user-defined macro
#[derive(Debug, Clone)]
struct Macro {
    params: Vec<String>,
    body: String,
    /// Lines before the body in the template that defined it
    line_offset: usize,
}

type MacroTable = HashMap<String, Macro>;

/// Per-body render state; copied, never shared, when a body is forked
#[derive(Debug, Clone, Copy)]
struct Frame<'v> {
    item: Option<&'v Value>,
    index: usize,
    depth: usize,
    /// Lines of the outer template preceding this body
    line_offset: usize,
}

impl<'v> Frame<'v> {
    fn root() -> Self {
        Self {
            item: None,
            index: 0,
            depth: 0,
            line_offset: 0,
        }
    }

    fn line(&self, token: &Token) -> usize {
        self.line_offset + token.line
    }
}

/// One render call: borrowed inputs plus limits
struct Renderer<'a> {
    config: &'a dyn ConfigReader,
    callbacks: &'a Callbacks,
    options: RenderOptions,
    start: Instant,
}

/// Expression environment for one frame
struct Scope<'a> {
    resolver: Resolver<'a>,
    callbacks: &'a Callbacks,
}

impl Environment for Scope<'_> {
    fn resolve(&self, name: &str) -> Value {
        self.resolver.resolve(name)
    }

    fn call(&self, function: InlineFunction, argument: &Value) -> Result<Value, ExprError> {
        self.callbacks.apply(function, argument).map(Value::Str)
    }
}

/// One `IF`/`ELSE_IF`/`ELSE` arm
struct Branch<'t> {
    /// `None` for `ELSE`
    condition: Option<&'t str>,
    body: &'t str,
    line_offset: usize,
}

impl<'a> Renderer<'a> {
    /// Check if rendering has exceeded the timeout
    fn check_timeout(&self) -> Result<(), TemplateError> {
        let elapsed = self.start.elapsed();
        if elapsed >= self.options.timeout {
            return Err(TemplateError::Timeout {
                max_duration: self.options.timeout,
                elapsed,
            });
        }
        Ok(())
    }

    /// Fork a frame for a nested body
    fn fork<'v>(
        &self,
        parent: Frame<'v>,
        directive: &str,
        line: usize,
        line_offset: usize,
    ) -> Result<Frame<'v>, TemplateError> {
        let depth = parent.depth + 1;
        if depth > self.options.max_depth {
            return Err(TemplateError::RecursionLimit {
                directive: directive.to_string(),
                limit: self.options.max_depth,
                line,
            });
        }
        Ok(Frame {
            depth,
            line_offset,
            ..parent
        })
    }

    fn resolver<'s>(&'s self, frame: Frame<'s>) -> Resolver<'s> {
        Resolver::new(self.config, frame.item, frame.index)
    }

    /// Parse and evaluate a condition in the frame's scope
    fn evaluate(&self, condition: &str, frame: Frame<'_>, line: usize) -> Result<Value, TemplateError> {
        let scope = Scope {
            resolver: Resolver::new(self.config, frame.item, frame.index),
            callbacks: self.callbacks,
        };
        expr::evaluate(condition, &scope).map_err(|e| match e {
            ExprError::Grammar(message) => TemplateError::Grammar {
                condition: condition.trim().to_string(),
                message,
                line,
            },
            ExprError::Evaluation(message) => TemplateError::Evaluation {
                condition: condition.trim().to_string(),
                message,
                line,
            },
            ExprError::MissingCallback(function) => TemplateError::MissingCallback {
                function: function.directive().to_string(),
                line,
            },
        })
    }

    /// Argument list following `token`
    fn arguments<'t>(
        &self,
        text: &'t str,
        token: &Token,
        directive: &str,
        line: usize,
    ) -> Result<(&'t str, usize), TemplateError> {
        extract_arguments(text, token.end()).map_err(|e| TemplateError::MalformedSyntax {
            message: match e {
                ArgumentError::MissingOpenParen => format!("{} must be followed by '('", directive),
                ArgumentError::Unbalanced => format!("Unclosed '(' after {}", directive),
            },
            line,
        })
    }

    /// Render one body: the whole template or a forked sub-body
    ///
    /// A body starts right after its opening directive's `)`, so when that
    /// directive sits on its own line the body keeps the newline ending it.
    /// Only the trailing newline of the rendered body is trimmed.
    fn render_block(
        &self,
        text: &str,
        frame: Frame<'_>,
        macros: &mut MacroTable,
    ) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(text.len());
        let mut tokens = TokenStream::new(text);
        let mut cursor = 0;

        while let Some(token) = tokens.next() {
            self.check_timeout()?;
            let line = frame.line(&token);
            let literal = &text[cursor..token.start];

            match &token.kind {
                TokenKind::Keyword(Keyword::If) => {
                    trace!(directive = "DTIG_IF", line, "dispatching directive");
                    output.push_str(trim_directive_line(literal));
                    cursor = self.render_if(text, &token, &mut tokens, frame, macros, &mut output)?;
                }
                TokenKind::Keyword(Keyword::For) => {
                    trace!(directive = "DTIG_FOR", line, "dispatching directive");
                    output.push_str(trim_directive_line(literal));
                    cursor =
                        self.render_for(text, &token, &mut tokens, frame, macros, &mut output)?;
                }
                TokenKind::Keyword(Keyword::Def) => {
                    trace!(directive = "DTIG_DEF", line, "dispatching directive");
                    output.push_str(trim_directive_line(literal));
                    cursor = self.define_macro(text, &token, &mut tokens, frame, macros)?;
                }
                TokenKind::Keyword(stray) => {
                    return Err(TemplateError::UnexpectedTerminator {
                        directive: stray.directive().to_string(),
                        line,
                    });
                }
                TokenKind::Inline(function) => {
                    trace!(directive = function.directive(), line, "dispatching directive");
                    output.push_str(literal);
                    let (args, after) = self.arguments(text, &token, function.directive(), line)?;
                    tokens.advance_to(after);
                    output.push_str(&self.render_inline(*function, args, frame, line)?);
                    cursor = after;
                }
                TokenKind::Name(name) if macros.contains_key(name) => {
                    trace!(directive = name.as_str(), line, "expanding macro");
                    output.push_str(trim_directive_line(literal));
                    cursor = self.expand_macro(
                        text,
                        &token,
                        name,
                        &mut tokens,
                        frame,
                        macros,
                        &mut output,
                    )?;
                }
                TokenKind::Name(name) => {
                    trace!(directive = name.as_str(), line, "resolving variable");
                    output.push_str(literal);
                    output.push_str(&self.resolver(frame).resolve(name).to_string());
                    cursor = token.end();
                }
            }
        }

        output.push_str(&text[cursor..]);
        Ok(trim_directive_line(&output).to_string())
    }

    /// `DTIG_IF(c) ... [DTIG_ELSE_IF(c) ...]* [DTIG_ELSE ...] DTIG_END_IF`
    ///
    /// Collects every arm first, then renders only the first arm whose
    /// condition holds. Returns the position after `DTIG_END_IF`.
    fn render_if(
        &self,
        text: &str,
        token: &Token,
        tokens: &mut TokenStream<'_>,
        frame: Frame<'_>,
        macros: &mut MacroTable,
        output: &mut String,
    ) -> Result<usize, TemplateError> {
        let line = frame.line(token);
        let (condition, after) = self.arguments(text, token, "DTIG_IF", line)?;
        tokens.advance_to(after);

        let mut branches = Vec::new();
        let mut arm_condition = Some(condition);
        let mut body_start = after;
        let mut spec = BlockSpec::IF_BRANCH;

        let end = loop {
            let body_offset = frame.line_offset + tokens.line() - 1;
            let end = find_block_end(tokens, &spec).ok_or_else(|| TemplateError::UnterminatedBlock {
                directive: "DTIG_IF".to_string(),
                condition: condition.trim().to_string(),
                line,
            })?;
            branches.push(Branch {
                condition: arm_condition,
                body: &text[body_start..end.start],
                line_offset: body_offset,
            });

            match end.keyword() {
                Some(Keyword::ElseIf) => {
                    let (else_condition, after) =
                        self.arguments(text, &end, "DTIG_ELSE_IF", frame.line(&end))?;
                    tokens.advance_to(after);
                    arm_condition = Some(else_condition);
                    body_start = after;
                }
                Some(Keyword::Else) => {
                    arm_condition = None;
                    body_start = end.end();
                    spec = BlockSpec::ELSE_BRANCH;
                }
                _ => break end,
            }
        };
        debug!(line, arms = branches.len(), "extracted DTIG_IF block");

        for branch in &branches {
            let taken = match branch.condition {
                Some(condition) => self.evaluate(condition, frame, line)?.is_truthy(),
                None => true,
            };
            if taken {
                let child = self.fork(frame, "DTIG_IF", line, branch.line_offset)?;
                output.push_str(&self.render_block(branch.body, child, macros)?);
                break;
            }
        }

        Ok(end.end())
    }

    /// `DTIG_FOR(collection) ... DTIG_END_FOR`
    ///
    /// A sentinel collection still renders the body once, with the
    /// placeholder record bound, but its text is dropped.
    fn render_for(
        &self,
        text: &str,
        token: &Token,
        tokens: &mut TokenStream<'_>,
        frame: Frame<'_>,
        macros: &mut MacroTable,
        output: &mut String,
    ) -> Result<usize, TemplateError> {
        let line = frame.line(token);
        let (condition, after) = self.arguments(text, token, "DTIG_FOR", line)?;
        tokens.advance_to(after);

        let body_offset = frame.line_offset + tokens.line() - 1;
        let end = find_block_end(tokens, &BlockSpec::FOR).ok_or_else(|| {
            TemplateError::UnterminatedBlock {
                directive: "DTIG_FOR".to_string(),
                condition: condition.trim().to_string(),
                line,
            }
        })?;
        let body = &text[after..end.start];

        match self.evaluate(condition, frame, line)? {
            Value::List(items) => {
                debug!(line, iterations = items.len(), "rendering DTIG_FOR block");
                for (index, item) in items.iter().enumerate() {
                    self.check_timeout()?;
                    let child = Frame {
                        item: Some(item),
                        index,
                        ..self.fork(frame, "DTIG_FOR", line, body_offset)?
                    };
                    output.push_str(&self.render_block(body, child, macros)?);
                }
            }
            Value::Sentinel => {
                debug!(line, "DTIG_FOR over a missing collection, output discarded");
                let placeholder = Value::placeholder_record();
                let child = Frame {
                    item: Some(&placeholder),
                    index: 0,
                    ..self.fork(frame, "DTIG_FOR", line, body_offset)?
                };
                self.render_block(body, child, macros)?;
            }
            value if !value.is_truthy() => {
                debug!(line, "DTIG_FOR over an empty value, skipped");
            }
            _ => {
                return Err(TemplateError::NotIterable {
                    condition: condition.trim().to_string(),
                    line,
                })
            }
        }

        Ok(end.end())
    }

    /// `DTIG_DEF DTIG_NAME(params) ... DTIG_END_DEF`
    ///
    /// Records the macro and emits nothing.
    fn define_macro(
        &self,
        text: &str,
        token: &Token,
        tokens: &mut TokenStream<'_>,
        frame: Frame<'_>,
        macros: &mut MacroTable,
    ) -> Result<usize, TemplateError> {
        let line = frame.line(token);
        let missing_name = || TemplateError::MalformedSyntax {
            message: "DTIG_DEF must be followed by a macro name".to_string(),
            line,
        };

        let name_token = tokens.next().ok_or_else(missing_name)?;
        let name = match &name_token.kind {
            TokenKind::Name(name) if text[token.end()..name_token.start].trim().is_empty() => {
                name.clone()
            }
            _ => return Err(missing_name()),
        };

        let (params, after) = self.arguments(text, &name_token, &name, line)?;
        tokens.advance_to(after);

        let body_offset = frame.line_offset + tokens.line() - 1;
        let end = find_block_end(tokens, &BlockSpec::DEF).ok_or_else(|| {
            TemplateError::UnterminatedBlock {
                directive: "DTIG_DEF".to_string(),
                condition: format!("{}({})", name, params.trim()),
                line,
            }
        })?;

        let params: Vec<String> = split_arguments(params)
            .into_iter()
            .map(str::to_string)
            .collect();
        debug!(line, name = name.as_str(), params = params.len(), "defined macro");

        macros.insert(
            name,
            Macro {
                params,
                body: text[after..end.start].to_string(),
                line_offset: body_offset,
            },
        );

        Ok(end.end())
    }

    /// Substitute arguments into a macro body and render it
    #[allow(clippy::too_many_arguments)]
    fn expand_macro(
        &self,
        text: &str,
        token: &Token,
        name: &str,
        tokens: &mut TokenStream<'_>,
        frame: Frame<'_>,
        macros: &mut MacroTable,
        output: &mut String,
    ) -> Result<usize, TemplateError> {
        let line = frame.line(token);
        let Some(definition) = macros.get(name).cloned() else {
            return Ok(token.start);
        };

        // Parameterless macros may be invoked without parentheses
        let (args, after) = match self.arguments(text, token, name, line) {
            Ok(found) => found,
            Err(_) if definition.params.is_empty() && !followed_by_paren(text, token.end()) => {
                ("", token.end())
            }
            Err(e) => return Err(e),
        };
        tokens.advance_to(after);

        let args = split_arguments(args);
        if args.len() != definition.params.len() {
            return Err(TemplateError::MacroArgumentMismatch {
                name: name.to_string(),
                expected: definition.params.len(),
                found: args.len(),
                line,
            });
        }

        let expanded = substitute_parameters(&definition.body, &definition.params, &args);
        let child = self.fork(frame, name, line, definition.line_offset)?;
        output.push_str(&self.render_block(&expanded, child, macros)?);

        Ok(after)
    }

    /// `DTIG_TO_PROTO_MESSAGE(x)`, `DTIG_TYPE_TO_FUNCTION(x)`, `DTIG_STR(expr)`
    ///
    /// The two type mappings resolve their argument as a name; `DTIG_STR`
    /// evaluates a full expression.
    fn render_inline(
        &self,
        function: InlineFunction,
        args: &str,
        frame: Frame<'_>,
        line: usize,
    ) -> Result<String, TemplateError> {
        let value = match function {
            InlineFunction::Str => self.evaluate(args, frame, line)?,
            InlineFunction::ToProtoMessage | InlineFunction::TypeToFunction => {
                self.resolver(frame).resolve(args.trim())
            }
        };

        self.callbacks
            .apply(function, &value)
            .map_err(|_| TemplateError::MissingCallback {
                function: function.directive().to_string(),
                line,
            })
    }
}

/// Whether an opening parenthesis follows `pos`, after spaces and tabs
fn followed_by_paren(text: &str, pos: usize) -> bool {
    text[pos..].trim_start_matches([' ', '\t']).starts_with('(')
}

#[cfg(test)]
mod tests;

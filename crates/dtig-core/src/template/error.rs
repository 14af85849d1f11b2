//! Template error types

use std::fmt;

/// Template rendering errors
///
/// Every variant is fatal to the render call that raised it.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// An `IF`/`FOR`/`DEF` block has no matching closer
    UnterminatedBlock {
        /// Opening directive, e.g. `DTIG_IF`
        directive: String,
        /// Raw condition or macro signature text
        condition: String,
        /// Line number of the opening directive
        line: usize,
    },

    /// A closer or branch keyword with no block open
    UnexpectedTerminator {
        /// The stray directive
        directive: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Condition text is not a valid expression
    Grammar {
        /// Raw condition text
        condition: String,
        /// Parser message
        message: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Macro invoked with the wrong number of arguments
    MacroArgumentMismatch {
        /// Macro directive name
        name: String,
        /// Number of declared parameters
        expected: usize,
        /// Number of arguments supplied
        found: usize,
        /// Line number of the invocation
        line: usize,
    },

    /// An inline function needs a callback that was not supplied
    MissingCallback {
        /// Inline function directive
        function: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Malformed directive syntax (missing or unbalanced parentheses, ...)
    MalformedSyntax {
        /// Error message
        message: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// A well-formed condition failed while being evaluated
    Evaluation {
        /// Raw condition text
        condition: String,
        /// What went wrong
        message: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// `FOR` over something that is not a list
    NotIterable {
        /// Raw collection expression
        condition: String,
        /// Line number where the error occurred
        line: usize,
    },

    /// Nested bodies and macro expansions went deeper than allowed
    RecursionLimit {
        /// Directive that would have exceeded the limit
        directive: String,
        /// Configured maximum depth
        limit: usize,
        /// Line number where the error occurred
        line: usize,
    },

    /// Template rendering timed out (runaway macro expansion protection)
    Timeout {
        /// Maximum allowed duration
        max_duration: std::time::Duration,
        /// Actual elapsed time
        elapsed: std::time::Duration,
    },
}

impl TemplateError {
    /// Line the error points at, when it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            TemplateError::UnterminatedBlock { line, .. }
            | TemplateError::UnexpectedTerminator { line, .. }
            | TemplateError::Grammar { line, .. }
            | TemplateError::MacroArgumentMismatch { line, .. }
            | TemplateError::MissingCallback { line, .. }
            | TemplateError::MalformedSyntax { line, .. }
            | TemplateError::Evaluation { line, .. }
            | TemplateError::NotIterable { line, .. }
            | TemplateError::RecursionLimit { line, .. } => Some(*line),
            TemplateError::Timeout { .. } => None,
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UnterminatedBlock {
                directive,
                condition,
                line,
            } => {
                write!(
                    f,
                    "End of {} not found at line {}: {}({})",
                    directive, line, directive, condition
                )
            }
            TemplateError::UnexpectedTerminator { directive, line } => {
                write!(
                    f,
                    "Unexpected {} at line {} with no open block",
                    directive, line
                )
            }
            TemplateError::Grammar {
                condition,
                message,
                line,
            } => {
                write!(
                    f,
                    "Invalid expression '{}' at line {}: {}",
                    condition, line, message
                )
            }
            TemplateError::MacroArgumentMismatch {
                name,
                expected,
                found,
                line,
            } => {
                write!(
                    f,
                    "Macro {} at line {} expects {} argument(s), got {}",
                    name, line, expected, found
                )
            }
            TemplateError::MissingCallback { function, line } => {
                write!(
                    f,
                    "{} used at line {} but no callback was provided",
                    function, line
                )
            }
            TemplateError::MalformedSyntax { message, line } => {
                write!(f, "Malformed syntax at line {}: {}", line, message)
            }
            TemplateError::Evaluation {
                condition,
                message,
                line,
            } => {
                write!(
                    f,
                    "Failed to evaluate '{}' at line {}: {}",
                    condition, line, message
                )
            }
            TemplateError::NotIterable { condition, line } => {
                write!(
                    f,
                    "DTIG_FOR({}) at line {} does not evaluate to a list",
                    condition, line
                )
            }
            TemplateError::RecursionLimit {
                directive,
                limit,
                line,
            } => {
                write!(
                    f,
                    "{} at line {} exceeds the maximum nesting depth of {}",
                    directive, line, limit
                )
            }
            TemplateError::Timeout {
                max_duration,
                elapsed,
            } => {
                write!(
                    f,
                    "Template rendering timed out after {:.2}s (max: {:.2}s). Check for self-invoking macros.",
                    elapsed.as_secs_f64(),
                    max_duration.as_secs_f64()
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}

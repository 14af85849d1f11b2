//! Template module - the DTIG directive language
//!
//! Renders hand-written target-language templates (Python, C++, MATLAB)
//! against a model configuration describing inputs, outputs and parameters.
//!
//! ## Philosophy
//!
//! - **Text in, text out**: the engine never validates the generated code
//! - **Directives are plain identifiers**: `DTIG_*` tokens sit inside otherwise
//!   ordinary source, so templates stay readable in the target language's editor
//! - **Per-language behaviour is injected**: type mappings come in through
//!   [`Callbacks`], the engine itself knows no target language
//!
//! ## Syntax
//!
//! - Conditionals: `DTIG_IF(cond) ... DTIG_ELSE_IF(cond) ... DTIG_ELSE ... DTIG_END_IF`
//! - Loops: `DTIG_FOR(DTIG_INPUTS) ... DTIG_END_FOR`, binding `DTIG_INDEX` and `DTIG_ITEM_*`
//! - Macros: `DTIG_DEF DTIG_NAME(A, B) ... DTIG>A ... DTIG_END_DEF`, invoked as `DTIG_NAME(x, y)`
//! - Inline functions: `DTIG_TO_PROTO_MESSAGE(x)`, `DTIG_TYPE_TO_FUNCTION(x)`, `DTIG_STR(expr)`
//! - Anything else matching `DTIG_[A-Z_]+` is a variable reference
//!
//! A block directive on a line of its own disappears together with its line.

pub mod engine;
pub mod error;
pub mod value;

pub use engine::{
    render, vocabulary, Callback, Callbacks, NameEntry, RenderOptions, TemplateEngine, Vocabulary,
};
pub use error::TemplateError;
pub use value::Value;

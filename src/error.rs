//! Central error types for statelift.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic
//! `Display` and `From` implementations.
//!
//! Only session construction is fallible: a tree-sitter grammar mismatch or a
//! parser that produced no tree. Everything downstream of a successfully
//! built session degrades to absence and diagnostics instead of erroring,
//! so extraction itself never returns `Err` for weird user code.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Tree-sitter rejected the grammar (version mismatch between the
    /// `tree-sitter` runtime and the `tree-sitter-typescript` grammar).
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// The parser returned no tree for the source text.
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },
}

/// Convenience result type using [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;

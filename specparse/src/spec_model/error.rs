//! Error types for spec file parsing

use thiserror::Error;

/// Conditional blocks that do not nest properly
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// `%else` outside of any `%if` block
    #[error("line {line}: %else without a matching %if")]
    ElseWithoutIf {
        /// Line number of the `%else`
        line: usize,
    },

    /// `%endif` outside of any `%if` block
    #[error("line {line}: %endif without a matching %if")]
    EndifWithoutIf {
        /// Line number of the `%endif`
        line: usize,
    },

    /// Input ended while a `%if` block was still open
    #[error("line {line}: %if is never closed by %endif")]
    UnterminatedConditional {
        /// Line number of the unclosed `%if`
        line: usize,
    },
}

/// A header line whose key is not a known package field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: unknown header field '{key}'")]
pub struct UnknownFieldError {
    /// Line number of the header
    pub line: usize,
    /// Key exactly as written in the spec file
    pub key: String,
}

/// Any error that stops a single spec file from being parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    UnknownField(#[from] UnknownFieldError),
}

//! Error types for the Breadboard circuit solver.
//!
//! This module provides a unified error type [`BoardError`] that covers
//! every error condition that can occur while parsing board descriptions,
//! editing a board and validating it before a topology rebuild.
//!
//! The solver itself never fails: non-convergence and floating nodes are
//! reported through [`crate::solver::SolverResult`] instead.

use thiserror::Error;

/// Result type alias using [`BoardError`].
pub type Result<T> = std::result::Result<T, BoardError>;

/// Unified error type for all Breadboard operations.
#[derive(Error, Debug)]
pub enum BoardError {
    // ============ Board Description Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Unknown component kind
    #[error("Unknown component kind '{kind}' at line {line}")]
    UnknownComponentKind { kind: String, line: usize },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    // ============ Board Editing Errors ============
    /// Duplicate component identity
    #[error("Duplicate component '{id}'")]
    DuplicateComponent { id: String },

    /// Component not present on the board
    #[error("Component '{id}' not found on the board")]
    ComponentNotFound { id: String },

    /// Operation does not apply to this component kind
    #[error("Component '{id}' is a {kind}, expected a {expected}")]
    WrongComponentKind {
        id: String,
        kind: String,
        expected: String,
    },

    /// Wire drawn between two identical grid points
    #[error("Wire '{id}' has zero length")]
    ZeroLengthWire { id: String },

    // ============ Validation Errors ============
    /// Non-finite anchor coordinate or length
    #[error("Component '{id}' has a non-finite {field} ({value})")]
    NonFiniteCoordinate {
        id: String,
        field: &'static str,
        value: f64,
    },

    // ============ I/O Errors ============
    /// Error reading a board file
    #[error("Failed to read board file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl BoardError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        component: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            component: component.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a component-not-found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::ComponentNotFound { id: id.into() }
    }
}

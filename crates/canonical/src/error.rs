use thiserror::Error;

/// Errors that can occur during canonicalization.
///
/// A source file that does not parse is deliberately *not* an error here: it is
/// recovered inside [`crate::normalize`] and reported through
/// [`crate::CanonicalSource::parse_failed`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("canonical source requires a non-empty name")]
    MissingName,
}

/// Why identifier discovery could not produce a syntax tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("grammar could not be loaded: {0}")]
    Grammar(String),
    #[error("parser produced no tree")]
    NoTree,
    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
}

//! Error types for dialect translation.

use crate::dialect::Dialect;
use thiserror::Error;

/// Errors raised while translating a statement.
///
/// Structural errors are never recovered from: a statement that fails to
/// parse produces no output at all.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// Dialect name or alias not recognized
    #[error("Unsupported dialect: {0:?} (expected mysql, postgresql, sqlite or sqlserver)")]
    UnsupportedDialect(String),

    /// Input does not have the `CREATE TABLE name (...)` shape
    #[error("Malformed statement: {0}")]
    MalformedStatement(String),

    /// No translator registered for the pair and no route through MySQL
    #[error("No translation route from {from} to {to}")]
    UnsupportedTranslationPair { from: Dialect, to: Dialect },

    /// Reading a streamed value failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranslateError {
    pub fn malformed(message: impl Into<String>) -> Self {
        TranslateError::MalformedStatement(message.into())
    }
}

/// Result type alias for translation operations.
pub type Result<T> = std::result::Result<T, TranslateError>;

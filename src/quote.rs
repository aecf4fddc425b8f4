//! Identifier quoting per dialect.

use crate::dialect::{Dialect, QuoteStyle};

/// Remove backtick, double-quote or bracket quoting wrapped around an
/// identifier.
///
/// Only the wrapping characters are removed; a doubled quote character
/// inside the name collapses back to a single one. A name that is not
/// wrapped comes back trimmed but otherwise untouched.
pub fn strip_quotes(name: &str) -> String {
    let trimmed = name.trim();
    let inner = || &trimmed[1..trimmed.len() - 1];
    match (trimmed.chars().next(), trimmed.chars().last()) {
        _ if trimmed.len() < 2 => trimmed.to_string(),
        (Some('`'), Some('`')) => inner().replace("``", "`"),
        (Some('"'), Some('"')) => inner().replace("\"\"", "\""),
        (Some('['), Some(']')) => inner().replace("]]", "]"),
        _ => trimmed.to_string(),
    }
}

/// Quote a bare identifier for the given dialect, doubling the closing
/// quote character when it appears in the name.
///
/// Names taken from a parsed statement are already unquoted and go
/// through here unchanged.
pub fn escape_identifier(name: &str, dialect: Dialect) -> String {
    match dialect.quote_style() {
        QuoteStyle::Backtick => format!("`{}`", name.replace('`', "``")),
        QuoteStyle::DoubleQuote => format!("\"{}\"", name.replace('"', "\"\"")),
        QuoteStyle::Bracket => format!("[{}]", name.replace(']', "]]")),
    }
}

/// Quote an identifier for the given dialect.
///
/// Quoting already wrapped around the input is removed first, so quoting
/// is idempotent:
///
/// ```
/// use sql_translator::{quote::quote_identifier, Dialect};
/// assert_eq!(quote_identifier("`users`", Dialect::Postgres), "\"users\"");
/// assert_eq!(quote_identifier("a]b", Dialect::SqlServer), "[a]]b]");
/// ```
pub fn quote_identifier(name: &str, dialect: Dialect) -> String {
    escape_identifier(&strip_quotes(name), dialect)
}

/// Quote each bare identifier and join with `", "`.
pub fn quote_list(names: &[String], dialect: Dialect) -> String {
    names
        .iter()
        .map(|n| escape_identifier(n, dialect))
        .collect::<Vec<_>>()
        .join(", ")
}

//! Translate `CREATE TABLE` statements between MySQL, PostgreSQL, SQLite
//! and SQL Server, and convert row values to SQL literals.
//!
//! ```
//! let pg = sql_translator::translate_create_table(
//!     "CREATE TABLE `t` (`id` INT AUTO_INCREMENT PRIMARY KEY)",
//!     "mysql",
//!     "postgresql",
//! )
//! .unwrap();
//! assert!(pg.contains("\"id\" SERIAL"));
//! ```

pub mod dialect;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod quote;
pub mod translate;
pub mod types;
pub mod value;

pub use dialect::{normalize_dialect, Dialect};
pub use error::{Result, TranslateError};
pub use parser::{parse_create_table, ParsedStatement};
pub use translate::{TranslateOptions, TranslateWarning, Translator};
pub use value::{
    convert_native_to_dialect_literal, convert_native_to_sql_literal, convert_to_native_type,
    convert_value_to_dialect_literal, convert_value_to_sql_literal, NativeValue, RawValue,
};

/// Translate one `CREATE TABLE` statement; dialects are given by name or alias.
pub fn translate_create_table(sql: &str, source: &str, target: &str) -> Result<String> {
    translate::translate_statement(sql, source.parse()?, target.parse()?)
}

/// Translate a bare column type such as `varchar(255)` or `int unsigned`.
pub fn translate_field_type(field_type: &str, source: &str, target: &str) -> Result<String> {
    Ok(types::translate_field_type(
        field_type,
        source.parse()?,
        target.parse()?,
    ))
}

/// Quote an identifier for the named dialect.
pub fn quote_identifier(identifier: &str, dialect: &str) -> Result<String> {
    Ok(quote::quote_identifier(identifier, dialect.parse()?))
}

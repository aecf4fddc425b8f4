//! SQL dialects and their per-dialect conventions.
//!
//! A [`Dialect`] carries everything the translation pipeline needs to know
//! about a target: how identifiers are quoted, how auto-increment columns
//! are spelled, how boolean defaults are written and which table options
//! trail a `CREATE TABLE`.

use crate::error::{Result, TranslateError};
use std::fmt;
use std::str::FromStr;

/// SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// MySQL / MariaDB
    MySql,
    /// PostgreSQL
    Postgres,
    /// SQLite
    Sqlite,
    /// Microsoft SQL Server
    SqlServer,
}

/// Alias table, lowercase input -> canonical dialect
const ALIASES: &[(&str, Dialect)] = &[
    ("mysql", Dialect::MySql),
    ("mariadb", Dialect::MySql),
    ("postgresql", Dialect::Postgres),
    ("postgres", Dialect::Postgres),
    ("pgsql", Dialect::Postgres),
    ("pg", Dialect::Postgres),
    ("sqlite", Dialect::Sqlite),
    ("sqlite3", Dialect::Sqlite),
    ("sqlserver", Dialect::SqlServer),
    ("mssql", Dialect::SqlServer),
    ("sqlsrv", Dialect::SqlServer),
];

/// How a dialect quotes identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `` `name` ``
    Backtick,
    /// `"name"`
    DoubleQuote,
    /// `[name]`
    Bracket,
}

/// How a dialect spells an auto-incrementing column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoIncrementStyle {
    /// `INT AUTO_INCREMENT`
    Modifier,
    /// `SERIAL` / `BIGSERIAL` pseudo-types
    SerialType,
    /// `INTEGER PRIMARY KEY AUTOINCREMENT` (one rowid alias per table)
    RowidAlias,
    /// `INT IDENTITY(1,1)`
    Identity,
}

/// How boolean column defaults are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanLiteralStyle {
    /// `'1'` / `'0'`
    QuotedDigits,
    /// `TRUE` / `FALSE`
    Keywords,
    /// `1` / `0`
    Digits,
}

impl BooleanLiteralStyle {
    pub fn render(self, value: bool) -> &'static str {
        match (self, value) {
            (BooleanLiteralStyle::QuotedDigits, true) => "'1'",
            (BooleanLiteralStyle::QuotedDigits, false) => "'0'",
            (BooleanLiteralStyle::Keywords, true) => "TRUE",
            (BooleanLiteralStyle::Keywords, false) => "FALSE",
            (BooleanLiteralStyle::Digits, true) => "1",
            (BooleanLiteralStyle::Digits, false) => "0",
        }
    }
}

impl Dialect {
    /// All supported dialects
    pub const ALL: [Dialect; 4] = [
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::Sqlite,
        Dialect::SqlServer,
    ];

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgresql",
            Dialect::Sqlite => "sqlite",
            Dialect::SqlServer => "sqlserver",
        }
    }

    pub fn quote_style(self) -> QuoteStyle {
        match self {
            Dialect::MySql => QuoteStyle::Backtick,
            Dialect::Postgres | Dialect::Sqlite => QuoteStyle::DoubleQuote,
            Dialect::SqlServer => QuoteStyle::Bracket,
        }
    }

    pub fn auto_increment(self) -> AutoIncrementStyle {
        match self {
            Dialect::MySql => AutoIncrementStyle::Modifier,
            Dialect::Postgres => AutoIncrementStyle::SerialType,
            Dialect::Sqlite => AutoIncrementStyle::RowidAlias,
            Dialect::SqlServer => AutoIncrementStyle::Identity,
        }
    }

    pub fn boolean_literals(self) -> BooleanLiteralStyle {
        match self {
            Dialect::MySql => BooleanLiteralStyle::QuotedDigits,
            Dialect::Postgres => BooleanLiteralStyle::Keywords,
            Dialect::Sqlite | Dialect::SqlServer => BooleanLiteralStyle::Digits,
        }
    }

    /// Options appended after the closing paren of `CREATE TABLE`
    pub fn table_options(self) -> Option<&'static str> {
        match self {
            Dialect::MySql => Some("ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"),
            _ => None,
        }
    }

    /// SQL Server has no `CREATE TABLE IF NOT EXISTS`
    pub fn supports_if_not_exists(self) -> bool {
        !matches!(self, Dialect::SqlServer)
    }

    /// Whether string literals treat backslash as an escape character
    pub fn backslash_escapes(self) -> bool {
        matches!(self, Dialect::MySql)
    }
}

impl FromStr for Dialect {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, d)| *d)
            .ok_or_else(|| TranslateError::UnsupportedDialect(s.to_string()))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalize a dialect name or alias to its canonical name.
pub fn normalize_dialect(input: &str) -> Result<&'static str> {
    input.parse::<Dialect>().map(Dialect::name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!("mariadb".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("Postgres".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("pgsql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!(" sqlite3 ".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        assert_eq!("MSSQL".parse::<Dialect>().unwrap(), Dialect::SqlServer);
        assert_eq!("sqlsrv".parse::<Dialect>().unwrap(), Dialect::SqlServer);
    }

    #[test]
    fn test_unknown_dialect() {
        let err = "oracle".parse::<Dialect>().unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedDialect(ref s) if s == "oracle"));
        assert!(normalize_dialect("").is_err());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for (alias, _) in ALIASES {
            let once = normalize_dialect(alias).unwrap();
            assert_eq!(normalize_dialect(once).unwrap(), once);
        }
    }

    #[test]
    fn test_boolean_literals() {
        assert_eq!(Dialect::Postgres.boolean_literals().render(true), "TRUE");
        assert_eq!(Dialect::MySql.boolean_literals().render(false), "'0'");
        assert_eq!(Dialect::SqlServer.boolean_literals().render(true), "1");
    }
}

//! Column type translation between dialects.
//!
//! Handles conversion of data types including:
//! - Integer types and their auto-increment pseudo-types (`SERIAL`)
//! - Float and exact numeric types (`DOUBLE`, `DECIMAL(p,s)`)
//! - String types, keeping lengths (`VARCHAR(n)`, `NVARCHAR(MAX)`)
//! - Binary types (`BLOB`, `BYTEA`, `VARBINARY`)
//! - Date/time types, with and without time zone
//! - Special types (`ENUM`, `SET`, `JSON`, arrays, booleans)

pub mod mapping;

pub use mapping::{native_type_for, target_mapping, NativeType, TypeMapping};

use crate::dialect::Dialect;
use crate::normalize::trim_column_type;
use crate::parser::ColumnClause;

/// A column type split into its parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldType {
    /// Lowercase base, e.g. `varchar` or `timestamp with time zone`
    pub base: String,
    /// Parameter text without parens, e.g. `10,2`
    pub params: Option<String>,
    /// `unsigned`, `signed`, `zerofill`
    pub modifiers: Vec<String>,
    pub is_array: bool,
}

impl FieldType {
    /// Parse a type as written in a column definition.
    pub fn parse(raw: &str) -> Self {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut s = trim_column_type(&collapsed);

        let mut is_array = false;
        while s.ends_with(']') {
            match s.rfind('[') {
                Some(open) if !s[..open].trim_end().is_empty() => {
                    s.truncate(open);
                    s = s.trim_end().to_string();
                    is_array = true;
                }
                _ => break,
            }
        }

        let (head, params, tail) = match (s.find('('), s.rfind(')')) {
            (Some(open), Some(close)) if close > open => (
                s[..open].to_string(),
                Some(compact(&s[open + 1..close])),
                s[close + 1..].to_string(),
            ),
            _ => (s.clone(), None, String::new()),
        };

        let head = head.replace(['[', ']', '`', '"'], " ");
        let (modifiers, base): (Vec<String>, Vec<String>) = head
            .split_whitespace()
            .chain(tail.split_whitespace())
            .map(str::to_lowercase)
            .partition(|w| matches!(w.as_str(), "unsigned" | "signed" | "zerofill"));

        FieldType {
            base: base.join(" "),
            params: params.filter(|p| !p.is_empty()),
            modifiers,
            is_array,
        }
    }

    pub fn from_column(column: &ColumnClause) -> Self {
        FieldType {
            base: column.base_type.clone(),
            params: column.type_params.clone(),
            modifiers: column.type_modifiers.clone(),
            is_array: column.is_array,
        }
    }

    fn params_are(&self, value: &str) -> bool {
        self.params
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case(value))
    }

    /// Whether the source dialect uses this type for booleans
    pub fn is_boolean(&self, source: Dialect) -> bool {
        match self.base.as_str() {
            "bool" | "boolean" => true,
            "tinyint" => self.params_are("1"),
            "bit" => source == Dialect::SqlServer,
            _ => false,
        }
    }

    /// Uppercased rendering, used when nothing maps the type
    fn passthrough(&self, target: Dialect) -> String {
        let mut out = self.base.to_uppercase();
        if let Some(p) = &self.params {
            out = format!("{}({})", out, p);
        }
        if target == Dialect::MySql {
            for m in &self.modifiers {
                out.push(' ');
                out.push_str(&m.to_uppercase());
            }
        }
        if target == Dialect::Postgres && self.is_array {
            out.push_str("[]");
        }
        out
    }
}

/// Remove whitespace in a parameter list outside quoted values
fn compact(params: &str) -> String {
    let mut out = String::with_capacity(params.len());
    let mut in_quote = false;
    for c in params.trim().chars() {
        if c == '\'' {
            in_quote = !in_quote;
        }
        if in_quote || !c.is_whitespace() {
            out.push(c);
        }
    }
    out
}

/// Result of translating one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTranslation {
    pub sql: String,
    /// Values or constraints may not survive the conversion
    pub lossy: bool,
    /// False when the type fell through to the uppercase passthrough
    pub mapped: bool,
    /// MySQL-only modifiers that were dropped
    pub dropped_modifiers: Vec<String>,
}

/// Translates column types from one dialect to another
#[derive(Debug, Clone, Copy)]
pub struct TypeTranslator<'a> {
    from: Dialect,
    to: Dialect,
    overrides: Option<&'a TypeMapping>,
}

impl<'a> TypeTranslator<'a> {
    pub fn new(from: Dialect, to: Dialect) -> Self {
        Self {
            from,
            to,
            overrides: None,
        }
    }

    /// Consult caller-supplied mappings before the built-in tables
    pub fn with_overrides(mut self, overrides: &'a TypeMapping) -> Self {
        self.overrides = Some(overrides).filter(|o| !o.is_empty());
        self
    }

    pub fn translate(&self, ft: &FieldType) -> TypeTranslation {
        let dropped_modifiers = if self.to == Dialect::MySql {
            Vec::new()
        } else {
            ft.modifiers
                .iter()
                .filter(|m| m.as_str() != "signed")
                .map(|m| m.to_uppercase())
                .collect()
        };

        let mut result = TypeTranslation {
            sql: String::new(),
            lossy: self.is_lossy(ft),
            mapped: true,
            dropped_modifiers,
        };

        if ft.base.is_empty() {
            return result;
        }

        let params = ft.params.as_deref();
        result.sql = if let Some(sql) = self.source_override(ft) {
            sql.to_string()
        } else if let Some(sql) = self.overrides.and_then(|o| o.lookup(&ft.base, params)) {
            self.with_params(sql, ft)
        } else if let Some(sql) = target_mapping(self.to).lookup(&ft.base, params) {
            self.with_params(sql, ft)
        } else {
            result.mapped = false;
            ft.passthrough(self.to)
        };

        if self.to == Dialect::MySql && result.mapped {
            for m in &ft.modifiers {
                result.sql.push(' ');
                result.sql.push_str(&m.to_uppercase());
            }
        }

        result
    }

    fn is_lossy(&self, ft: &FieldType) -> bool {
        match ft.base.as_str() {
            "enum" | "set" => self.to != Dialect::MySql,
            "decimal" | "numeric" | "dec" | "fixed" | "money" => self.to == Dialect::Sqlite,
            _ => ft.is_array && self.to != Dialect::Postgres,
        }
    }

    /// Rules tied to the source dialect, applied before any table lookup
    fn source_override(&self, ft: &FieldType) -> Option<&'static str> {
        let base = ft.base.as_str();
        let pick = |mysql, postgres, sqlite, sqlserver| match self.to {
            Dialect::MySql => mysql,
            Dialect::Postgres => postgres,
            Dialect::Sqlite => sqlite,
            Dialect::SqlServer => sqlserver,
        };

        match self.from {
            Dialect::MySql => match base {
                "enum" | "set" => pick(None, Some("TEXT"), Some("TEXT"), Some("NVARCHAR(255)")),
                "tinyint" if ft.params_are("1") => {
                    pick(None, Some("BOOLEAN"), Some("INTEGER"), Some("BIT"))
                }
                _ => None,
            },
            Dialect::Postgres => {
                if ft.is_array {
                    return pick(Some("JSON"), None, Some("TEXT"), Some("NVARCHAR(MAX)"));
                }
                match base {
                    "serial" | "serial4" => pick(Some("INT"), None, Some("INTEGER"), Some("INT")),
                    "bigserial" | "serial8" => {
                        pick(Some("BIGINT"), None, Some("INTEGER"), Some("BIGINT"))
                    }
                    "smallserial" | "serial2" => {
                        pick(Some("SMALLINT"), None, Some("INTEGER"), Some("SMALLINT"))
                    }
                    "boolean" | "bool" => {
                        pick(Some("TINYINT(1)"), None, Some("INTEGER"), Some("BIT"))
                    }
                    "jsonb" => pick(Some("JSON"), None, Some("TEXT"), Some("NVARCHAR(MAX)")),
                    "timestamptz" | "timestamp with time zone" => pick(
                        Some("TIMESTAMP"),
                        None,
                        Some("DATETIME"),
                        Some("DATETIMEOFFSET"),
                    ),
                    "timestamp" | "timestamp without time zone" => {
                        pick(Some("DATETIME"), None, Some("DATETIME"), Some("DATETIME2"))
                    }
                    _ => None,
                }
            }
            Dialect::Sqlite => match base {
                "datetime" => pick(
                    Some("DATETIME"),
                    Some("TIMESTAMP WITHOUT TIME ZONE"),
                    None,
                    Some("DATETIME2"),
                ),
                // SQLite REAL is an 8-byte float
                "real" => pick(Some("DOUBLE"), Some("DOUBLE PRECISION"), None, Some("FLOAT")),
                _ => None,
            },
            Dialect::SqlServer => match base {
                "bit" => pick(Some("TINYINT(1)"), Some("BOOLEAN"), Some("INTEGER"), None),
                "varchar" | "nvarchar" if ft.params_are("max") => {
                    pick(Some("LONGTEXT"), Some("TEXT"), Some("TEXT"), None)
                }
                "varbinary" if ft.params_are("max") => {
                    pick(Some("LONGBLOB"), Some("BYTEA"), Some("BLOB"), None)
                }
                "datetimeoffset" => pick(
                    Some("TIMESTAMP"),
                    Some("TIMESTAMP WITH TIME ZONE"),
                    Some("DATETIME"),
                    None,
                ),
                "timestamp" | "rowversion" => {
                    pick(Some("BINARY(8)"), Some("BYTEA"), Some("BLOB"), None)
                }
                _ => None,
            },
        }
    }

    /// Re-append length/precision for types that carry it
    fn with_params(&self, mapped: &str, ft: &FieldType) -> String {
        if mapped.contains('(') || !keeps_params(self.to, mapped) {
            return mapped.to_string();
        }

        let params = ft
            .params
            .as_deref()
            .filter(|p| !p.eq_ignore_ascii_case("max") || self.to == Dialect::SqlServer);

        match (self.to, mapped, params) {
            (Dialect::SqlServer, "NVARCHAR" | "NCHAR", Some(p)) if exceeds(p, 4000) => {
                "NVARCHAR(MAX)".to_string()
            }
            (Dialect::SqlServer, "VARBINARY" | "BINARY", Some(p)) if exceeds(p, 8000) => {
                "VARBINARY(MAX)".to_string()
            }
            (Dialect::SqlServer, _, Some(p)) if p.eq_ignore_ascii_case("max") => {
                format!("{}(MAX)", mapped)
            }
            (_, _, Some(p)) => format!("{}({})", mapped, p),
            (Dialect::MySql, "VARCHAR" | "VARBINARY", None) => format!("{}(255)", mapped),
            (Dialect::SqlServer, "NVARCHAR" | "VARCHAR", None) => format!("{}(255)", mapped),
            (Dialect::SqlServer, "VARBINARY", None) => "VARBINARY(MAX)".to_string(),
            _ => mapped.to_string(),
        }
    }
}

/// Whether a target keyword takes the source's length or precision
fn keeps_params(target: Dialect, keyword: &str) -> bool {
    match target {
        Dialect::MySql => matches!(
            keyword,
            "CHAR" | "VARCHAR" | "BINARY" | "VARBINARY" | "DECIMAL" | "BIT" | "ENUM" | "SET"
        ),
        Dialect::Postgres => matches!(
            keyword,
            "CHARACTER" | "CHARACTER VARYING" | "NUMERIC" | "BIT"
        ),
        Dialect::Sqlite => false,
        Dialect::SqlServer => matches!(
            keyword,
            "NCHAR" | "NVARCHAR" | "CHAR" | "VARCHAR" | "BINARY" | "VARBINARY" | "DECIMAL"
        ),
    }
}

fn exceeds(param: &str, limit: u64) -> bool {
    param.parse::<u64>().is_ok_and(|n| n > limit)
}

/// Translate a single column type.
///
/// Never fails: an unknown type comes back uppercased.
pub fn translate_field_type(field_type: &str, from: Dialect, to: Dialect) -> String {
    if from == to {
        return field_type.trim().to_string();
    }
    TypeTranslator::new(from, to)
        .translate(&FieldType::parse(field_type))
        .sql
}

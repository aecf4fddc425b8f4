//! Row-value conversion between SQL types, native values and SQL literals.
//!
//! Reading is lenient: a cell that does not fit its column type degrades to
//! [`NativeValue::Null`] instead of failing the whole row. The only error is
//! an I/O failure while draining a [`RawValue::Stream`].

use crate::dialect::Dialect;
use crate::error::Result;
use crate::types::{native_type_for, NativeType};
use std::fmt;
use std::io::Read;

/// A cell as handed over by a database driver or dump reader
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// Large object read lazily; always drained to the end
    Stream(Box<dyn Read>),
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "Null"),
            RawValue::Bool(b) => write!(f, "Bool({})", b),
            RawValue::Int(n) => write!(f, "Int({})", n),
            RawValue::Float(x) => write!(f, "Float({})", x),
            RawValue::Text(s) => write!(f, "Text({:?})", s),
            RawValue::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            RawValue::Stream(_) => write!(f, "Stream"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Int(n)
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        RawValue::Float(x)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(b: Vec<u8>) -> Self {
        RawValue::Bytes(b)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(RawValue::Null, Into::into)
    }
}

impl RawValue {
    /// Replace a stream by its bytes
    fn drain(self) -> Result<RawValue> {
        match self {
            RawValue::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                Ok(RawValue::Bytes(buf))
            }
            other => Ok(other),
        }
    }
}

/// A value in its native representation
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

impl NativeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }

    /// Textual form used when a value is reinterpreted as another type
    fn as_text(&self) -> Option<String> {
        match self {
            NativeValue::Null => None,
            NativeValue::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            NativeValue::Int(n) => Some(n.to_string()),
            NativeValue::Float(x) => Some(x.to_string()),
            NativeValue::String(s) => Some(s.clone()),
            NativeValue::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
            NativeValue::Json(serde_json::Value::String(s)) => Some(s.clone()),
            NativeValue::Json(v) => Some(v.to_string()),
        }
    }
}

impl From<&str> for NativeValue {
    fn from(s: &str) -> Self {
        NativeValue::String(s.to_string())
    }
}

impl From<String> for NativeValue {
    fn from(s: String) -> Self {
        NativeValue::String(s)
    }
}

impl From<i64> for NativeValue {
    fn from(n: i64) -> Self {
        NativeValue::Int(n)
    }
}

impl From<f64> for NativeValue {
    fn from(x: f64) -> Self {
        NativeValue::Float(x)
    }
}

impl From<bool> for NativeValue {
    fn from(b: bool) -> Self {
        NativeValue::Bool(b)
    }
}

impl<T: Into<NativeValue>> From<Option<T>> for NativeValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(NativeValue::Null, Into::into)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Integer,
    Boolean,
    Float,
    Json,
    Binary,
    Text,
}

const BINARY_TYPES: &[&str] = &[
    "binary",
    "varbinary",
    "blob",
    "tinyblob",
    "mediumblob",
    "longblob",
    "bytea",
    "image",
];

fn category(sql_type: &str) -> Category {
    let lowered = sql_type.trim().to_lowercase();
    let base = lowered
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or("");
    if BINARY_TYPES.contains(&base) {
        return Category::Binary;
    }
    if matches!(base, "json" | "jsonb") {
        return Category::Json;
    }
    match native_type_for(&lowered) {
        NativeType::Int => Category::Integer,
        NativeType::Float => Category::Float,
        NativeType::Bool => Category::Boolean,
        NativeType::Array => Category::Json,
        NativeType::String => Category::Text,
    }
}

/// Tri-state boolean parse; `None` when the value is not boolean-like
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// Truncate toward zero; `None` when the result does not fit an `i64`
fn float_to_int(x: f64) -> Option<i64> {
    let t = x.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(float_to_int))
}

/// Plain decimal integer text such as `-123`, any magnitude
fn is_integer_numeral(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Integer cell: out-of-range numbers keep their decimal text
fn text_to_int(text: &str) -> NativeValue {
    let trimmed = text.trim();
    if let Some(n) = parse_int(trimmed) {
        return NativeValue::Int(n);
    }
    if is_integer_numeral(trimmed) {
        return NativeValue::String(trimmed.to_string());
    }
    match parse_float(trimmed) {
        Some(x) => NativeValue::String(format!("{}", x.trunc())),
        None => NativeValue::Null,
    }
}

fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

fn raw_to_bool(raw: &RawValue) -> Option<bool> {
    match raw {
        RawValue::Bool(b) => Some(*b),
        RawValue::Int(0) => Some(false),
        RawValue::Int(1) => Some(true),
        RawValue::Float(x) if *x == 0.0 => Some(false),
        RawValue::Float(x) if *x == 1.0 => Some(true),
        RawValue::Text(s) => parse_bool(s),
        RawValue::Bytes(b) => std::str::from_utf8(b).ok().and_then(parse_bool),
        _ => None,
    }
}

fn raw_to_text(raw: RawValue) -> Option<String> {
    match raw {
        RawValue::Null | RawValue::Stream(_) => None,
        RawValue::Bool(b) => Some(if b { "1" } else { "0" }.to_string()),
        RawValue::Int(n) => Some(n.to_string()),
        RawValue::Float(x) => Some(x.to_string()),
        RawValue::Text(s) => Some(s),
        RawValue::Bytes(b) => Some(String::from_utf8_lossy(&b).into_owned()),
    }
}

/// Convert a raw cell into its native value for `sql_type`.
///
/// Streams are drained before dispatch, so they are consumed on every path.
pub fn convert_to_native_type(
    value: impl Into<RawValue>,
    sql_type: &str,
    dialect: Dialect,
) -> Result<NativeValue> {
    let raw = value.into().drain()?;
    if matches!(raw, RawValue::Null) {
        return Ok(NativeValue::Null);
    }

    let native = match category(sql_type) {
        Category::Integer => match raw {
            RawValue::Int(n) => NativeValue::Int(n),
            RawValue::Bool(b) => NativeValue::Int(b as i64),
            RawValue::Float(x) if x.is_finite() => match float_to_int(x) {
                Some(n) => NativeValue::Int(n),
                None => NativeValue::String(format!("{}", x.trunc())),
            },
            other => raw_to_text(other).map_or(NativeValue::Null, |s| text_to_int(&s)),
        },
        Category::Boolean => match (raw_to_bool(&raw), dialect) {
            (None, _) => NativeValue::Null,
            (Some(b), Dialect::Sqlite) => NativeValue::Int(b as i64),
            (Some(b), _) => NativeValue::Bool(b),
        },
        Category::Float => match raw {
            RawValue::Float(x) if x.is_finite() => NativeValue::Float(x),
            RawValue::Int(n) => NativeValue::Float(n as f64),
            other => raw_to_text(other)
                .and_then(|s| parse_float(&s))
                .map_or(NativeValue::Null, NativeValue::Float),
        },
        Category::Json => match raw {
            RawValue::Int(n) => NativeValue::Json(n.into()),
            RawValue::Bool(b) => NativeValue::Json(b.into()),
            other => match raw_to_text(other) {
                Some(text) => match serde_json::from_str(&text) {
                    Ok(v) => NativeValue::Json(v),
                    Err(_) => NativeValue::String(text),
                },
                None => NativeValue::Null,
            },
        },
        Category::Binary => match raw {
            RawValue::Bytes(b) => NativeValue::Bytes(b),
            RawValue::Text(s) => NativeValue::Bytes(s.into_bytes()),
            other => raw_to_text(other)
                .map_or(NativeValue::Null, |s| NativeValue::Bytes(s.into_bytes())),
        },
        Category::Text => raw_to_text(raw).map_or(NativeValue::Null, NativeValue::String),
    };
    Ok(native)
}

/// Quote a string literal, doubling embedded single quotes
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Binary literal for `dialect`; `None` gives the `0x...` form
pub fn binary_literal(bytes: &[u8], dialect: Option<Dialect>) -> String {
    let hex = hex::encode(bytes);
    match dialect {
        Some(Dialect::Postgres) => format!("'\\x{}'::bytea", hex),
        Some(Dialect::Sqlite) => format!("X'{}'", hex),
        Some(Dialect::MySql | Dialect::SqlServer) | None => format!("0x{}", hex),
    }
}

/// Render a native value as an SQL literal of the given native category.
///
/// Binary data that is not valid UTF-8 is written as `0x...`; use
/// [`convert_native_to_dialect_literal`] for a dialect's own binary form.
pub fn convert_native_to_sql_literal(value: &NativeValue, native_type: NativeType) -> String {
    render_literal(value, native_type, None)
}

/// Like [`convert_native_to_sql_literal`], with binary data written the
/// way `dialect` reads it.
pub fn convert_native_to_dialect_literal(
    value: &NativeValue,
    native_type: NativeType,
    dialect: Dialect,
) -> String {
    render_literal(value, native_type, Some(dialect))
}

fn render_literal(value: &NativeValue, native_type: NativeType, dialect: Option<Dialect>) -> String {
    if value.is_null() {
        return "NULL".to_string();
    }

    match native_type {
        NativeType::Int => match value {
            NativeValue::Int(n) => n.to_string(),
            other => match other.as_text().map(|s| text_to_int(&s)) {
                Some(NativeValue::Int(n)) => n.to_string(),
                Some(NativeValue::String(digits)) => digits,
                _ => "NULL".to_string(),
            },
        },
        NativeType::Float => match value {
            NativeValue::Float(x) if x.is_finite() => x.to_string(),
            NativeValue::Int(n) => n.to_string(),
            other => match other.as_text() {
                // keep the caller's precision
                Some(s) if parse_float(&s).is_some() => s.trim().to_string(),
                _ => "NULL".to_string(),
            },
        },
        NativeType::Bool => {
            let parsed = match value {
                NativeValue::Bool(b) => Some(*b),
                NativeValue::Json(serde_json::Value::Bool(b)) => Some(*b),
                other => other.as_text().and_then(|s| parse_bool(&s)),
            };
            match parsed {
                Some(true) => "1".to_string(),
                Some(false) => "0".to_string(),
                None => "NULL".to_string(),
            }
        }
        NativeType::Array => match value {
            NativeValue::Json(v) => quote_string(&v.to_string()),
            // already JSON text
            NativeValue::String(s) if serde_json::from_str::<serde_json::Value>(s).is_ok() => {
                quote_string(s)
            }
            NativeValue::String(s) => {
                quote_string(&serde_json::Value::String(s.clone()).to_string())
            }
            NativeValue::Int(n) => quote_string(&n.to_string()),
            NativeValue::Bool(b) => quote_string(&b.to_string()),
            other => match other.as_text() {
                Some(s) => quote_string(&serde_json::Value::String(s).to_string()),
                None => "NULL".to_string(),
            },
        },
        NativeType::String => match value {
            NativeValue::Bytes(b) if std::str::from_utf8(b).is_err() => {
                binary_literal(b, dialect)
            }
            other => other
                .as_text()
                .map_or_else(|| "NULL".to_string(), |s| quote_string(&s)),
        },
    }
}

/// Render `value` as a literal for a column of `sql_type`.
///
/// Unmapped types are treated as strings; null always yields `NULL`.
pub fn convert_value_to_sql_literal(value: &NativeValue, sql_type: &str) -> String {
    convert_native_to_sql_literal(value, native_type_for(sql_type))
}

/// Render `value` as a literal for a `sql_type` column in `dialect`.
pub fn convert_value_to_dialect_literal(
    value: &NativeValue,
    sql_type: &str,
    dialect: Dialect,
) -> String {
    convert_native_to_dialect_literal(value, native_type_for(sql_type), dialect)
}

//! Per-target type mapping tables.
//!
//! Each target dialect has one table keyed by the canonical lowercase
//! type name of any source dialect. Keys carrying parameters
//! (`tinyint(1)`) take precedence over their bare base type.

use crate::dialect::Dialect;
use ahash::AHashMap;
use once_cell::sync::Lazy;

/// Immutable lookup from lowercase type key to a target type keyword
#[derive(Debug, Clone, Default)]
pub struct TypeMapping {
    entries: AHashMap<String, String>,
}

impl TypeMapping {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Build a mapping from caller-supplied entries
    pub fn from_overrides<'a>(overrides: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        Self {
            entries: overrides
                .into_iter()
                .map(|(k, v)| (canonical_key(k), v.trim().to_string()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup of a single key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&canonical_key(key)).map(String::as_str)
    }

    /// Look up `base(params)` first, then `base`
    pub fn lookup(&self, base: &str, params: Option<&str>) -> Option<&str> {
        if let Some(p) = params {
            if let Some(hit) = self.get(&format!("{}({})", base, p)) {
                return Some(hit);
            }
        }
        self.get(base)
    }
}

/// Lowercase, single spaces, no spaces inside parens
fn canonical_key(key: &str) -> String {
    let lowered = key.trim().to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .replace(" (", "(")
        .replace("( ", "(")
        .replace(" )", ")")
        .replace(", ", ",")
}

/// Table for the given target dialect
pub fn target_mapping(target: Dialect) -> &'static TypeMapping {
    match target {
        Dialect::MySql => &MYSQL_TYPES,
        Dialect::Postgres => &POSTGRES_TYPES,
        Dialect::Sqlite => &SQLITE_TYPES,
        Dialect::SqlServer => &SQLSERVER_TYPES,
    }
}

static MYSQL_TYPES: Lazy<TypeMapping> = Lazy::new(|| {
    TypeMapping::new(&[
        // Integers
        ("tinyint(1)", "TINYINT(1)"),
        ("tinyint", "TINYINT"),
        ("smallint", "SMALLINT"),
        ("mediumint", "MEDIUMINT"),
        ("int", "INT"),
        ("integer", "INT"),
        ("bigint", "BIGINT"),
        ("int2", "SMALLINT"),
        ("int4", "INT"),
        ("int8", "BIGINT"),
        ("smallserial", "SMALLINT"),
        ("serial", "INT"),
        ("bigserial", "BIGINT"),
        ("bool", "TINYINT(1)"),
        ("boolean", "TINYINT(1)"),
        ("bit", "BIT"),
        ("year", "YEAR"),
        // Floating point and exact numerics
        ("float", "FLOAT"),
        ("real", "FLOAT"),
        ("float4", "FLOAT"),
        ("double", "DOUBLE"),
        ("double precision", "DOUBLE"),
        ("float8", "DOUBLE"),
        ("decimal", "DECIMAL"),
        ("numeric", "DECIMAL"),
        ("dec", "DECIMAL"),
        ("fixed", "DECIMAL"),
        ("money", "DECIMAL(19,4)"),
        ("smallmoney", "DECIMAL(10,4)"),
        // Strings
        ("char", "CHAR"),
        ("character", "CHAR"),
        ("nchar", "CHAR"),
        ("national character", "CHAR"),
        ("varchar", "VARCHAR"),
        ("character varying", "VARCHAR"),
        ("char varying", "VARCHAR"),
        ("nvarchar", "VARCHAR"),
        ("national character varying", "VARCHAR"),
        ("tinytext", "TINYTEXT"),
        ("text", "TEXT"),
        ("mediumtext", "MEDIUMTEXT"),
        ("longtext", "LONGTEXT"),
        ("ntext", "LONGTEXT"),
        ("clob", "LONGTEXT"),
        ("citext", "TEXT"),
        ("xml", "LONGTEXT"),
        // Binary
        ("binary", "BINARY"),
        ("varbinary", "VARBINARY"),
        ("tinyblob", "TINYBLOB"),
        ("blob", "BLOB"),
        ("mediumblob", "MEDIUMBLOB"),
        ("longblob", "LONGBLOB"),
        ("bytea", "LONGBLOB"),
        ("image", "LONGBLOB"),
        ("rowversion", "BINARY(8)"),
        // Date and time
        ("date", "DATE"),
        ("time", "TIME"),
        ("time with time zone", "TIME"),
        ("time without time zone", "TIME"),
        ("timetz", "TIME"),
        ("datetime", "DATETIME"),
        ("datetime2", "DATETIME"),
        ("smalldatetime", "DATETIME"),
        ("timestamp", "TIMESTAMP"),
        ("timestamptz", "TIMESTAMP"),
        ("timestamp with time zone", "TIMESTAMP"),
        ("timestamp without time zone", "DATETIME"),
        ("datetimeoffset", "TIMESTAMP"),
        ("interval", "VARCHAR(255)"),
        // Other
        ("json", "JSON"),
        ("jsonb", "JSON"),
        ("uuid", "CHAR(36)"),
        ("uniqueidentifier", "CHAR(36)"),
        ("enum", "ENUM"),
        ("set", "SET"),
        ("inet", "VARCHAR(45)"),
        ("cidr", "VARCHAR(45)"),
        ("macaddr", "VARCHAR(17)"),
        ("geometry", "GEOMETRY"),
        ("point", "POINT"),
    ])
});

static POSTGRES_TYPES: Lazy<TypeMapping> = Lazy::new(|| {
    TypeMapping::new(&[
        ("tinyint(1)", "BOOLEAN"),
        ("tinyint", "SMALLINT"),
        ("smallint", "SMALLINT"),
        ("mediumint", "INTEGER"),
        ("int", "INTEGER"),
        ("integer", "INTEGER"),
        ("bigint", "BIGINT"),
        ("int2", "SMALLINT"),
        ("int4", "INTEGER"),
        ("int8", "BIGINT"),
        ("smallserial", "SMALLSERIAL"),
        ("serial", "SERIAL"),
        ("bigserial", "BIGSERIAL"),
        ("bool", "BOOLEAN"),
        ("boolean", "BOOLEAN"),
        ("bit", "BIT"),
        ("year", "SMALLINT"),
        ("float", "REAL"),
        ("real", "REAL"),
        ("float4", "REAL"),
        ("double", "DOUBLE PRECISION"),
        ("double precision", "DOUBLE PRECISION"),
        ("float8", "DOUBLE PRECISION"),
        ("decimal", "NUMERIC"),
        ("numeric", "NUMERIC"),
        ("dec", "NUMERIC"),
        ("fixed", "NUMERIC"),
        ("money", "NUMERIC(19,4)"),
        ("smallmoney", "NUMERIC(10,4)"),
        ("char", "CHARACTER"),
        ("character", "CHARACTER"),
        ("nchar", "CHARACTER"),
        ("national character", "CHARACTER"),
        ("varchar", "CHARACTER VARYING"),
        ("character varying", "CHARACTER VARYING"),
        ("char varying", "CHARACTER VARYING"),
        ("nvarchar", "CHARACTER VARYING"),
        ("national character varying", "CHARACTER VARYING"),
        ("tinytext", "TEXT"),
        ("text", "TEXT"),
        ("mediumtext", "TEXT"),
        ("longtext", "TEXT"),
        ("ntext", "TEXT"),
        ("clob", "TEXT"),
        ("citext", "CITEXT"),
        ("xml", "XML"),
        ("binary", "BYTEA"),
        ("varbinary", "BYTEA"),
        ("tinyblob", "BYTEA"),
        ("blob", "BYTEA"),
        ("mediumblob", "BYTEA"),
        ("longblob", "BYTEA"),
        ("bytea", "BYTEA"),
        ("image", "BYTEA"),
        ("rowversion", "BYTEA"),
        ("date", "DATE"),
        ("time", "TIME"),
        ("time with time zone", "TIME WITH TIME ZONE"),
        ("time without time zone", "TIME WITHOUT TIME ZONE"),
        ("timetz", "TIME WITH TIME ZONE"),
        ("datetime", "TIMESTAMP"),
        ("datetime2", "TIMESTAMP"),
        ("smalldatetime", "TIMESTAMP"),
        ("timestamp", "TIMESTAMP"),
        ("timestamptz", "TIMESTAMP WITH TIME ZONE"),
        ("timestamp with time zone", "TIMESTAMP WITH TIME ZONE"),
        ("timestamp without time zone", "TIMESTAMP WITHOUT TIME ZONE"),
        ("datetimeoffset", "TIMESTAMP WITH TIME ZONE"),
        ("interval", "INTERVAL"),
        ("json", "JSONB"),
        ("jsonb", "JSONB"),
        ("uuid", "UUID"),
        ("uniqueidentifier", "UUID"),
        ("enum", "TEXT"),
        ("set", "TEXT"),
        ("inet", "INET"),
        ("cidr", "CIDR"),
        ("macaddr", "MACADDR"),
        ("geometry", "GEOMETRY"),
        ("point", "POINT"),
    ])
});

static SQLITE_TYPES: Lazy<TypeMapping> = Lazy::new(|| {
    TypeMapping::new(&[
        ("tinyint(1)", "INTEGER"),
        ("tinyint", "INTEGER"),
        ("smallint", "INTEGER"),
        ("mediumint", "INTEGER"),
        ("int", "INTEGER"),
        ("integer", "INTEGER"),
        ("bigint", "INTEGER"),
        ("int2", "INTEGER"),
        ("int4", "INTEGER"),
        ("int8", "INTEGER"),
        ("smallserial", "INTEGER"),
        ("serial", "INTEGER"),
        ("bigserial", "INTEGER"),
        ("bool", "INTEGER"),
        ("boolean", "INTEGER"),
        ("bit", "INTEGER"),
        ("year", "INTEGER"),
        ("float", "REAL"),
        ("real", "REAL"),
        ("float4", "REAL"),
        ("double", "REAL"),
        ("double precision", "REAL"),
        ("float8", "REAL"),
        ("decimal", "REAL"),
        ("numeric", "REAL"),
        ("dec", "REAL"),
        ("fixed", "REAL"),
        ("money", "REAL"),
        ("smallmoney", "REAL"),
        ("char", "TEXT"),
        ("character", "TEXT"),
        ("nchar", "TEXT"),
        ("national character", "TEXT"),
        ("varchar", "TEXT"),
        ("character varying", "TEXT"),
        ("char varying", "TEXT"),
        ("nvarchar", "TEXT"),
        ("national character varying", "TEXT"),
        ("tinytext", "TEXT"),
        ("text", "TEXT"),
        ("mediumtext", "TEXT"),
        ("longtext", "TEXT"),
        ("ntext", "TEXT"),
        ("clob", "TEXT"),
        ("citext", "TEXT"),
        ("xml", "TEXT"),
        ("binary", "BLOB"),
        ("varbinary", "BLOB"),
        ("tinyblob", "BLOB"),
        ("blob", "BLOB"),
        ("mediumblob", "BLOB"),
        ("longblob", "BLOB"),
        ("bytea", "BLOB"),
        ("image", "BLOB"),
        ("rowversion", "BLOB"),
        ("date", "DATE"),
        ("time", "TIME"),
        ("time with time zone", "TIME"),
        ("time without time zone", "TIME"),
        ("timetz", "TIME"),
        ("datetime", "DATETIME"),
        ("datetime2", "DATETIME"),
        ("smalldatetime", "DATETIME"),
        ("timestamp", "DATETIME"),
        ("timestamptz", "DATETIME"),
        ("timestamp with time zone", "DATETIME"),
        ("timestamp without time zone", "DATETIME"),
        ("datetimeoffset", "DATETIME"),
        ("interval", "TEXT"),
        ("json", "TEXT"),
        ("jsonb", "TEXT"),
        ("uuid", "TEXT"),
        ("uniqueidentifier", "TEXT"),
        ("enum", "TEXT"),
        ("set", "TEXT"),
        ("inet", "TEXT"),
        ("cidr", "TEXT"),
        ("macaddr", "TEXT"),
        ("geometry", "BLOB"),
        ("point", "TEXT"),
    ])
});

static SQLSERVER_TYPES: Lazy<TypeMapping> = Lazy::new(|| {
    TypeMapping::new(&[
        ("tinyint(1)", "BIT"),
        // SQL Server TINYINT is unsigned 0..255
        ("tinyint", "SMALLINT"),
        ("smallint", "SMALLINT"),
        ("mediumint", "INT"),
        ("int", "INT"),
        ("integer", "INT"),
        ("bigint", "BIGINT"),
        ("int2", "SMALLINT"),
        ("int4", "INT"),
        ("int8", "BIGINT"),
        ("smallserial", "SMALLINT"),
        ("serial", "INT"),
        ("bigserial", "BIGINT"),
        ("bool", "BIT"),
        ("boolean", "BIT"),
        ("bit", "BIT"),
        ("year", "SMALLINT"),
        ("float", "REAL"),
        ("real", "REAL"),
        ("float4", "REAL"),
        ("double", "FLOAT"),
        ("double precision", "FLOAT"),
        ("float8", "FLOAT"),
        ("decimal", "DECIMAL"),
        ("numeric", "DECIMAL"),
        ("dec", "DECIMAL"),
        ("fixed", "DECIMAL"),
        ("money", "MONEY"),
        ("smallmoney", "SMALLMONEY"),
        ("char", "NCHAR"),
        ("character", "NCHAR"),
        ("nchar", "NCHAR"),
        ("national character", "NCHAR"),
        ("varchar", "NVARCHAR"),
        ("character varying", "NVARCHAR"),
        ("char varying", "NVARCHAR"),
        ("nvarchar", "NVARCHAR"),
        ("national character varying", "NVARCHAR"),
        ("tinytext", "NVARCHAR(255)"),
        ("text", "NVARCHAR(MAX)"),
        ("mediumtext", "NVARCHAR(MAX)"),
        ("longtext", "NVARCHAR(MAX)"),
        ("ntext", "NVARCHAR(MAX)"),
        ("clob", "NVARCHAR(MAX)"),
        ("citext", "NVARCHAR(MAX)"),
        ("xml", "XML"),
        ("binary", "BINARY"),
        ("varbinary", "VARBINARY"),
        ("tinyblob", "VARBINARY(255)"),
        ("blob", "VARBINARY(MAX)"),
        ("mediumblob", "VARBINARY(MAX)"),
        ("longblob", "VARBINARY(MAX)"),
        ("bytea", "VARBINARY(MAX)"),
        ("image", "VARBINARY(MAX)"),
        ("rowversion", "ROWVERSION"),
        ("date", "DATE"),
        ("time", "TIME"),
        ("time with time zone", "TIME"),
        ("time without time zone", "TIME"),
        ("timetz", "TIME"),
        ("datetime", "DATETIME2"),
        ("datetime2", "DATETIME2"),
        ("smalldatetime", "SMALLDATETIME"),
        ("timestamp", "DATETIME2"),
        ("timestamptz", "DATETIMEOFFSET"),
        ("timestamp with time zone", "DATETIMEOFFSET"),
        ("timestamp without time zone", "DATETIME2"),
        ("datetimeoffset", "DATETIMEOFFSET"),
        ("interval", "NVARCHAR(255)"),
        ("json", "NVARCHAR(MAX)"),
        ("jsonb", "NVARCHAR(MAX)"),
        ("uuid", "UNIQUEIDENTIFIER"),
        ("uniqueidentifier", "UNIQUEIDENTIFIER"),
        ("enum", "NVARCHAR(255)"),
        ("set", "NVARCHAR(255)"),
        ("inet", "NVARCHAR(45)"),
        ("cidr", "NVARCHAR(45)"),
        ("macaddr", "NVARCHAR(17)"),
        ("geometry", "GEOMETRY"),
        ("point", "GEOMETRY"),
    ])
});

/// Native value category for a SQL type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeType {
    Int,
    Float,
    Bool,
    String,
    Array,
}

static NATIVE_TYPES: Lazy<AHashMap<&'static str, NativeType>> = Lazy::new(|| {
    use NativeType::*;
    [
        ("tinyint(1)", Bool),
        ("bool", Bool),
        ("boolean", Bool),
        ("bit", Bool),
        ("tinyint", Int),
        ("smallint", Int),
        ("mediumint", Int),
        ("int", Int),
        ("integer", Int),
        ("bigint", Int),
        ("int2", Int),
        ("int4", Int),
        ("int8", Int),
        ("smallserial", Int),
        ("serial", Int),
        ("bigserial", Int),
        ("year", Int),
        ("float", Float),
        ("real", Float),
        ("float4", Float),
        ("double", Float),
        ("double precision", Float),
        ("float8", Float),
        ("decimal", Float),
        ("numeric", Float),
        ("dec", Float),
        ("money", Float),
        ("smallmoney", Float),
        ("json", Array),
        ("jsonb", Array),
    ]
    .into_iter()
    .collect()
});

/// Native category of `sql_type`; unmapped types are strings.
///
/// Parameters are ignored except for the `tinyint(1)` boolean marker.
pub fn native_type_for(sql_type: &str) -> NativeType {
    let key = canonical_key(sql_type);
    if key.ends_with("[]") {
        return NativeType::Array;
    }
    if let Some(t) = NATIVE_TYPES.get(key.as_str()) {
        return *t;
    }
    let base = match key.find('(') {
        Some(open) => {
            // `timestamp(3) with time zone` keeps its suffix
            let close = key.rfind(')').unwrap_or(key.len() - 1);
            format!("{} {}", &key[..open], key[close + 1..].trim())
        }
        None => key.clone(),
    };
    let base = base
        .split_whitespace()
        .filter(|w| !matches!(*w, "unsigned" | "signed" | "zerofill"))
        .collect::<Vec<_>>()
        .join(" ");
    NATIVE_TYPES
        .get(base.as_str())
        .copied()
        .unwrap_or(NativeType::String)
}

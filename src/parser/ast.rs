//! Parsed form of a `CREATE TABLE` statement.
//!
//! Names are stored unquoted; quoting is applied again when a statement is
//! rendered for its target dialect.

use super::lexer::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    pub if_not_exists: bool,
    pub table_name: String,
    pub columns: Vec<ColumnClause>,
    pub constraints: Vec<ConstraintClause>,
    /// MySQL `COMMENT='...'` table option
    pub table_comment: Option<String>,
}

impl ParsedStatement {
    pub fn column(&self, name: &str) -> Option<&ColumnClause> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Columns that already belong to a key, inline or table-level.
    /// Only the leading column of a plain index counts.
    pub fn key_columns(&self) -> Vec<String> {
        let mut keyed: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.has_option(|o| matches!(o, ColumnOption::PrimaryKey | ColumnOption::Unique)))
            .map(|c| c.name.clone())
            .collect();
        for constraint in &self.constraints {
            match &constraint.kind {
                ConstraintKind::PrimaryKey(cols) | ConstraintKind::Unique(cols) => {
                    keyed.extend(cols.iter().map(|c| c.name.clone()))
                }
                ConstraintKind::Index { columns, .. } => {
                    keyed.extend(columns.first().map(|c| c.name.clone()))
                }
                _ => {}
            }
        }
        keyed
    }

    /// Columns of the table-level PRIMARY KEY constraint, if any
    pub fn table_primary_key(&self) -> Option<Vec<String>> {
        self.constraints.iter().find_map(|c| match &c.kind {
            ConstraintKind::PrimaryKey(cols) => Some(cols.iter().map(|c| c.name.clone()).collect()),
            _ => None,
        })
    }
}

/// One comma-separated entry of the column section
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Column(ColumnClause),
    Constraint(ConstraintClause),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnClause {
    pub name: String,
    /// Type as written, whitespace collapsed, e.g. `int(11) unsigned`
    pub raw_type: String,
    /// Lowercased base type without parameters, e.g. `character varying`
    pub base_type: String,
    /// Text inside the type's parentheses, e.g. `10,2`
    pub type_params: Option<String>,
    /// `unsigned`, `signed`, `zerofill`
    pub type_modifiers: Vec<String>,
    /// PostgreSQL `type[]`
    pub is_array: bool,
    pub options: Vec<ColumnOption>,
}

impl ColumnClause {
    pub fn has_option(&self, pred: impl Fn(&ColumnOption) -> bool) -> bool {
        self.options.iter().any(pred)
    }

    pub fn is_inline_primary_key(&self) -> bool {
        self.has_option(|o| matches!(o, ColumnOption::PrimaryKey))
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.options.iter().find_map(|o| match o {
            ColumnOption::Default(v) => Some(v),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnOption {
    NotNull,
    Null,
    Default(DefaultValue),
    /// MySQL `AUTO_INCREMENT`, SQLite `AUTOINCREMENT`, PostgreSQL identity
    AutoIncrement,
    /// SQL Server `IDENTITY(seed, increment)`
    Identity { seed: String, increment: String },
    PrimaryKey,
    Unique,
    OnUpdateCurrentTimestamp,
    Comment(String),
    References(Reference),
    Check(Vec<Token>),
    Collate(String),
    CharacterSet(String),
    /// Anything unrecognized, carried through as tokens
    Other(Vec<Token>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Null,
    Str { value: String, prefix: Option<char> },
    Number(String),
    /// Bare keyword such as `TRUE` or `CURRENT_TIMESTAMP`, uppercased
    Keyword(String),
    /// Function call or parenthesized expression
    Expr(Vec<Token>),
    /// Already rendered for the target dialect
    Raw(String),
}

impl DefaultValue {
    /// Lowercased function name when the default is a call, e.g. `now`
    pub fn function_name(&self) -> Option<String> {
        match self {
            DefaultValue::Expr(tokens) => match (tokens.first().and_then(|t| t.keyword()), tokens.get(1)) {
                (Some(name), Some(open)) if open.kind == TokenKind::LParen => {
                    Some(name.to_ascii_lowercase())
                }
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub table: String,
    pub columns: Vec<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexColumn {
    pub name: String,
    /// MySQL prefix length, `name(10)`
    pub length: Option<String>,
    /// `ASC` or `DESC`
    pub order: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Plain,
    Fulltext,
    Spatial,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintClause {
    pub name: Option<String>,
    pub kind: ConstraintKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    PrimaryKey(Vec<IndexColumn>),
    Unique(Vec<IndexColumn>),
    ForeignKey {
        columns: Vec<String>,
        reference: Reference,
    },
    Index {
        kind: IndexKind,
        columns: Vec<IndexColumn>,
    },
    Check(Vec<Token>),
}

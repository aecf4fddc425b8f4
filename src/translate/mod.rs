//! `CREATE TABLE` translation between dialects.
//!
//! One pipeline serves every dialect pair:
//! - parse the statement into a [`ParsedStatement`]
//! - rewrite each column (type, auto-increment, defaults, MySQL-only options)
//! - rewrite table constraints and de-duplicate the primary key
//! - render from the AST with target quoting, then normalize the output
//!
//! Pairs without a direct rule set (PostgreSQL or SQLite to and from SQL
//! Server) are translated in two legs through MySQL.

pub mod batch;
mod column;
pub mod config;
pub mod pairs;
mod primary_key;
mod render;
pub mod warnings;

pub use batch::{run, BatchConfig, TranslateStats};
pub use config::TranslateConfig;
pub use pairs::*;
pub use warnings::{TranslateWarning, WarningCollector};

use crate::dialect::Dialect;
use crate::error::{Result, TranslateError};
use crate::parser::{parse_create_table, ConstraintKind, IndexKind, ParsedStatement};
use crate::types::TypeMapping;
use ahash::AHashMap;
use column::ColumnRewriter;
use primary_key::PrimaryKeyModel;

/// Dialect used as the intermediate for synthesized pairs
pub const HUB: Dialect = Dialect::MySql;

/// Pairs with their own rule set
const DIRECT_PAIRS: &[(Dialect, Dialect)] = &[
    (Dialect::MySql, Dialect::Postgres),
    (Dialect::Postgres, Dialect::MySql),
    (Dialect::MySql, Dialect::Sqlite),
    (Dialect::Sqlite, Dialect::MySql),
    (Dialect::MySql, Dialect::SqlServer),
    (Dialect::SqlServer, Dialect::MySql),
    (Dialect::Postgres, Dialect::Sqlite),
    (Dialect::Sqlite, Dialect::Postgres),
];

/// Pairs translated as `source -> MySQL -> target`
const HUB_PAIRS: &[(Dialect, Dialect)] = &[
    (Dialect::Postgres, Dialect::SqlServer),
    (Dialect::SqlServer, Dialect::Postgres),
    (Dialect::Sqlite, Dialect::SqlServer),
    (Dialect::SqlServer, Dialect::Sqlite),
];

/// How a statement gets from one dialect to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Same dialect: input returned as-is
    Passthrough,
    Direct,
    /// Two legs through [`HUB`]
    ViaHub,
}

/// Resolve the route for a dialect pair.
pub fn route(from: Dialect, to: Dialect) -> Result<Route> {
    if from == to {
        Ok(Route::Passthrough)
    } else if DIRECT_PAIRS.contains(&(from, to)) {
        Ok(Route::Direct)
    } else if HUB_PAIRS.contains(&(from, to)) {
        Ok(Route::ViaHub)
    } else {
        Err(TranslateError::UnsupportedTranslationPair { from, to })
    }
}

/// Options for a [`Translator`]
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Fail a statement on its first warning
    pub strict: bool,
    /// Source type -> target type, consulted before the built-in tables
    pub type_overrides: AHashMap<String, String>,
    /// Replaces `ENGINE=InnoDB DEFAULT CHARSET=utf8mb4` on MySQL output;
    /// an empty string drops table options entirely
    pub mysql_table_options: Option<String>,
}

impl TranslateOptions {
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_type_overrides(mut self, overrides: AHashMap<String, String>) -> Self {
        self.type_overrides = overrides;
        self
    }

    pub fn with_mysql_table_options(mut self, options: impl Into<String>) -> Self {
        self.mysql_table_options = Some(options.into());
        self
    }
}

/// Translates `CREATE TABLE` statements for one dialect pair
#[derive(Debug)]
pub struct Translator {
    from: Dialect,
    to: Dialect,
    options: TranslateOptions,
    overrides: TypeMapping,
    warnings: WarningCollector,
}

impl Translator {
    pub fn new(from: Dialect, to: Dialect) -> Self {
        Self {
            from,
            to,
            options: TranslateOptions::default(),
            overrides: TypeMapping::default(),
            warnings: WarningCollector::new(),
        }
    }

    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.overrides = TypeMapping::from_overrides(&options.type_overrides);
        self.options = options;
        self
    }

    pub fn from_dialect(&self) -> Dialect {
        self.from
    }

    pub fn to_dialect(&self) -> Dialect {
        self.to
    }

    /// Translate one `CREATE TABLE` statement.
    ///
    /// Nothing is returned for a statement that fails to parse. In strict
    /// mode the first warning raised by the statement is an error.
    pub fn translate(&mut self, sql: &str) -> Result<String> {
        let mut local = WarningCollector::new();
        let out = match route(self.from, self.to)? {
            Route::Passthrough => return Ok(sql.to_string()),
            Route::Direct => self.translate_leg(sql, self.from, self.to, true, &mut local)?,
            Route::ViaHub => {
                let mid = self.translate_leg(sql, self.from, HUB, true, &mut local)?;
                self.translate_leg(&mid, HUB, self.to, false, &mut local)?
            }
        };

        if self.options.strict {
            if let Some(first) = local.warnings().first() {
                return Err(TranslateError::malformed(format!(
                    "strict mode: {}",
                    first
                )));
            }
        }
        self.warnings.extend(local.take());
        Ok(out)
    }

    /// Parse and rewrite without rendering
    pub fn rewrite(&mut self, sql: &str) -> Result<ParsedStatement> {
        let stmt = parse_create_table(sql, self.from)?;
        let mut local = WarningCollector::new();
        let stmt = self.rewrite_statement(stmt, self.from, self.to, true, &mut local);
        self.warnings.extend(local.take());
        Ok(stmt)
    }

    fn translate_leg(
        &self,
        sql: &str,
        from: Dialect,
        to: Dialect,
        first_leg: bool,
        warnings: &mut WarningCollector,
    ) -> Result<String> {
        let stmt = parse_create_table(sql, from)?;
        let stmt = self.rewrite_statement(stmt, from, to, first_leg, warnings);
        let table_options = match to {
            Dialect::MySql => self
                .options
                .mysql_table_options
                .as_deref()
                .or(to.table_options()),
            _ => to.table_options(),
        };
        Ok(render::render_statement(&stmt, to, table_options))
    }

    fn rewrite_statement(
        &self,
        mut stmt: ParsedStatement,
        from: Dialect,
        to: Dialect,
        first_leg: bool,
        warnings: &mut WarningCollector,
    ) -> ParsedStatement {
        // Overrides are keyed on source types, so only the first leg sees them
        let overrides = first_leg.then_some(&self.overrides);
        let mut pk = PrimaryKeyModel::from_statement(&stmt);
        let mut rewriter = ColumnRewriter::new(from, to, stmt.table_name.clone(), overrides);

        let keyed = stmt.key_columns();
        for column in &mut stmt.columns {
            let in_key = keyed.iter().any(|k| k.eq_ignore_ascii_case(&column.name));
            rewriter.rewrite(column, &mut pk, in_key, warnings);
        }

        rewrite_constraints(&mut stmt, to, warnings);
        pk.dedupe(&mut stmt);

        if stmt.if_not_exists && !to.supports_if_not_exists() {
            stmt.if_not_exists = false;
            warnings.add(TranslateWarning::unsupported(
                format!("CREATE TABLE IF NOT EXISTS on {}", to),
                Some("wrap the statement in IF OBJECT_ID(...) IS NULL"),
            ));
        }

        if stmt.table_comment.is_some() && to != Dialect::MySql {
            stmt.table_comment = None;
            warnings.add(TranslateWarning::unsupported(
                format!("table COMMENT on {}", stmt.table_name),
                None,
            ));
        }

        stmt
    }

    pub fn warnings(&self) -> &[TranslateWarning] {
        self.warnings.warnings()
    }

    pub fn take_warnings(&mut self) -> Vec<TranslateWarning> {
        self.warnings.take()
    }
}

fn rewrite_constraints(stmt: &mut ParsedStatement, to: Dialect, warnings: &mut WarningCollector) {
    let table = stmt.table_name.clone();
    stmt.constraints.retain_mut(|constraint| match &mut constraint.kind {
        ConstraintKind::Index { kind, .. } if to != Dialect::MySql => {
            let label = match kind {
                IndexKind::Plain => "INDEX",
                IndexKind::Fulltext => "FULLTEXT INDEX",
                IndexKind::Spatial => "SPATIAL INDEX",
            };
            warnings.add(TranslateWarning::unsupported(
                format!("{} inside CREATE TABLE {}", label, table),
                Some("create it with CREATE INDEX"),
            ));
            false
        }
        ConstraintKind::ForeignKey { reference, .. } => {
            column::rewrite_reference(reference, to);
            true
        }
        _ => true,
    });
}

/// Translate one `CREATE TABLE` statement between typed dialects.
pub fn translate_statement(sql: &str, from: Dialect, to: Dialect) -> Result<String> {
    Translator::new(from, to).translate(sql)
}

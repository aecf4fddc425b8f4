//! Per-column rewriting.
//!
//! Each column is rewritten exactly once: its type is translated, its
//! options are filtered for the target, and an auto-increment marker is
//! re-expressed in the target's own syntax.

use super::primary_key::PrimaryKeyModel;
use super::warnings::{TranslateWarning, WarningCollector};
use crate::dialect::{AutoIncrementStyle, Dialect};
use crate::parser::lexer::TokenKind;
use crate::parser::{ColumnClause, ColumnOption, DefaultValue, Reference};
use crate::types::{FieldType, TypeMapping, TypeTranslation, TypeTranslator};

/// Functions returning the current date and time
const NOW_FUNCTIONS: &[&str] = &[
    "now",
    "current_timestamp",
    "localtimestamp",
    "getdate",
    "getutcdate",
    "sysdatetime",
    "sysutcdatetime",
];

const UUID_FUNCTIONS: &[&str] = &["uuid", "gen_random_uuid", "uuid_generate_v4", "newid"];

const SERIAL_TYPES: &[&str] = &[
    "serial",
    "serial4",
    "bigserial",
    "serial8",
    "smallserial",
    "serial2",
];

/// Seed and step of an auto-increment column
#[derive(Debug, Clone, PartialEq, Eq)]
struct Identity {
    seed: String,
    increment: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            seed: "1".to_string(),
            increment: "1".to_string(),
        }
    }
}

pub(crate) struct ColumnRewriter<'a> {
    from: Dialect,
    to: Dialect,
    table: String,
    types: TypeTranslator<'a>,
    /// SQLite allows a single `INTEGER PRIMARY KEY AUTOINCREMENT`
    rowid_used: bool,
}

impl<'a> ColumnRewriter<'a> {
    pub fn new(
        from: Dialect,
        to: Dialect,
        table: String,
        overrides: Option<&'a TypeMapping>,
    ) -> Self {
        let mut types = TypeTranslator::new(from, to);
        if let Some(overrides) = overrides {
            types = types.with_overrides(overrides);
        }
        Self {
            from,
            to,
            table,
            types,
            rowid_used: false,
        }
    }

    /// Rewrite `column` in place for the target dialect.
    ///
    /// `in_key` tells whether the column already belongs to some key, which
    /// MySQL requires of an `AUTO_INCREMENT` column.
    pub fn rewrite(
        &mut self,
        column: &mut ColumnClause,
        pk: &mut PrimaryKeyModel,
        in_key: bool,
        warnings: &mut WarningCollector,
    ) {
        let field_type = FieldType::from_column(column);
        let is_bool = field_type.is_boolean(self.from);
        let identity = self.auto_increment_source(column, &field_type);

        let translated = self.types.translate(&field_type);
        self.report_type(column, &translated, warnings);
        column.raw_type = if translated.sql.is_empty() && self.to != Dialect::Sqlite {
            "TEXT".to_string()
        } else {
            translated.sql
        };

        let options = std::mem::take(&mut column.options);
        column.options = options
            .into_iter()
            .filter_map(|o| {
                self.rewrite_option(o, &column.name, is_bool, identity.is_some(), warnings)
            })
            .collect();

        if let Some(identity) = identity {
            self.apply_auto_increment(column, identity, pk, in_key, warnings);
        }
    }

    fn qualified(&self, column: &str) -> String {
        format!("{}.{}", self.table, column)
    }

    fn report_type(
        &self,
        column: &ColumnClause,
        translated: &TypeTranslation,
        warnings: &mut WarningCollector,
    ) {
        if translated.lossy {
            warnings.add(TranslateWarning::LossyConversion {
                from_type: column.raw_type.clone(),
                to_type: translated.sql.clone(),
                table: Some(self.table.clone()),
                column: Some(column.name.clone()),
            });
        }
        for modifier in &translated.dropped_modifiers {
            warnings.add(TranslateWarning::unsupported(
                format!("{} on {}", modifier, self.qualified(&column.name)),
                Some("add a CHECK constraint if the range matters"),
            ));
        }
        if !translated.mapped {
            warnings.add(TranslateWarning::unsupported(
                format!(
                    "type {} on {}",
                    column.raw_type,
                    self.qualified(&column.name)
                ),
                Some("passed through unchanged"),
            ));
        }
    }

    fn auto_increment_source(
        &self,
        column: &ColumnClause,
        field_type: &FieldType,
    ) -> Option<Identity> {
        for option in &column.options {
            match option {
                ColumnOption::AutoIncrement => return Some(Identity::default()),
                ColumnOption::Identity { seed, increment } => {
                    return Some(Identity {
                        seed: seed.clone(),
                        increment: increment.clone(),
                    })
                }
                _ => {}
            }
        }
        let serial =
            self.from == Dialect::Postgres && SERIAL_TYPES.contains(&field_type.base.as_str());
        let nextval = column
            .default_value()
            .and_then(DefaultValue::function_name)
            .is_some_and(|f| f == "nextval");
        (serial || nextval).then(Identity::default)
    }

    fn rewrite_option(
        &self,
        option: ColumnOption,
        column: &str,
        is_bool: bool,
        is_auto: bool,
        warnings: &mut WarningCollector,
    ) -> Option<ColumnOption> {
        match option {
            ColumnOption::AutoIncrement | ColumnOption::Identity { .. } => None,
            ColumnOption::Default(value) => {
                if is_auto && value.function_name().is_some_and(|f| f == "nextval") {
                    return None;
                }
                self.rewrite_default(value, column, is_bool, warnings)
                    .map(ColumnOption::Default)
            }
            ColumnOption::OnUpdateCurrentTimestamp if self.to != Dialect::MySql => {
                warnings.add(TranslateWarning::unsupported(
                    format!("ON UPDATE CURRENT_TIMESTAMP on {}", self.qualified(column)),
                    Some("use a trigger"),
                ));
                None
            }
            ColumnOption::Comment(_) if self.to != Dialect::MySql => {
                warnings.add(TranslateWarning::unsupported(
                    format!("column COMMENT on {}", self.qualified(column)),
                    None,
                ));
                None
            }
            ColumnOption::Collate(name) | ColumnOption::CharacterSet(name) => {
                warnings.add(TranslateWarning::unsupported(
                    format!("collation/charset {} on {}", name, self.qualified(column)),
                    None,
                ));
                None
            }
            ColumnOption::References(mut reference) => {
                rewrite_reference(&mut reference, self.to);
                Some(ColumnOption::References(reference))
            }
            other => Some(other),
        }
    }

    fn rewrite_default(
        &self,
        value: DefaultValue,
        column: &str,
        is_bool: bool,
        warnings: &mut WarningCollector,
    ) -> Option<DefaultValue> {
        if is_bool {
            if let Some(b) = boolean_literal(&value) {
                let literal = self.to.boolean_literals().render(b);
                return Some(DefaultValue::Raw(literal.to_string()));
            }
        }

        if is_current_timestamp(&value) {
            return Some(DefaultValue::Keyword("CURRENT_TIMESTAMP".to_string()));
        }

        let is_uuid = value
            .function_name()
            .is_some_and(|f| UUID_FUNCTIONS.contains(&f.as_str()));
        if is_uuid {
            let generator = match self.to {
                Dialect::MySql => "(UUID())",
                Dialect::Postgres => "gen_random_uuid()",
                Dialect::SqlServer => "NEWID()",
                Dialect::Sqlite => {
                    warnings.add(TranslateWarning::unsupported(
                        format!("UUID default on {}", self.qualified(column)),
                        Some("generate the value in the application"),
                    ));
                    return None;
                }
            };
            return Some(DefaultValue::Raw(generator.to_string()));
        }

        Some(value)
    }

    fn apply_auto_increment(
        &mut self,
        column: &mut ColumnClause,
        identity: Identity,
        pk: &mut PrimaryKeyModel,
        in_key: bool,
        warnings: &mut WarningCollector,
    ) {
        let pos = leading_nullability(&column.options);
        match self.to.auto_increment() {
            AutoIncrementStyle::Modifier => {
                column.options.insert(pos, ColumnOption::AutoIncrement);
                if !in_key {
                    // MySQL wants the column in some key
                    let key = if pk.is_empty() {
                        pk.mark_inline(&column.name);
                        ColumnOption::PrimaryKey
                    } else {
                        ColumnOption::Unique
                    };
                    column.options.insert(pos + 1, key);
                }
            }
            AutoIncrementStyle::SerialType => {
                column.raw_type = serial_type(&column.raw_type).to_string();
                column
                    .options
                    .retain(|o| !matches!(o, ColumnOption::Default(_)));
                if pk.is_empty() {
                    let pos = leading_nullability(&column.options);
                    column.options.insert(pos, ColumnOption::PrimaryKey);
                    pk.mark_inline(&column.name);
                }
            }
            AutoIncrementStyle::RowidAlias => {
                if self.rowid_used || !pk.allows_inline(&column.name) {
                    warnings.add(TranslateWarning::unsupported(
                        format!("AUTOINCREMENT on {}", self.qualified(&column.name)),
                        Some("SQLite allows it only on the single INTEGER PRIMARY KEY column"),
                    ));
                    return;
                }
                self.rowid_used = true;
                column.raw_type = "INTEGER".to_string();
                column.options.retain(|o| {
                    !matches!(
                        o,
                        ColumnOption::PrimaryKey
                            | ColumnOption::NotNull
                            | ColumnOption::Null
                            | ColumnOption::Default(_)
                    )
                });
                let mut options = vec![ColumnOption::PrimaryKey, ColumnOption::AutoIncrement];
                options.append(&mut column.options);
                column.options = options;
                pk.mark_inline(&column.name);
            }
            AutoIncrementStyle::Identity => {
                column.options.retain(|o| !matches!(o, ColumnOption::Default(_)));
                column.options.insert(
                    0,
                    ColumnOption::Identity {
                        seed: identity.seed,
                        increment: identity.increment,
                    },
                );
            }
        }
    }
}

/// Number of leading `NOT NULL` / `NULL` options
fn leading_nullability(options: &[ColumnOption]) -> usize {
    options
        .iter()
        .take_while(|o| matches!(o, ColumnOption::NotNull | ColumnOption::Null))
        .count()
}

/// PostgreSQL pseudo-type sized after the translated integer type
fn serial_type(translated: &str) -> &'static str {
    match translated {
        "BIGINT" => "BIGSERIAL",
        "SMALLINT" => "SMALLSERIAL",
        _ => "SERIAL",
    }
}

fn boolean_literal(value: &DefaultValue) -> Option<bool> {
    let text = match value {
        DefaultValue::Str { value, .. } => value.as_str(),
        DefaultValue::Number(n) => n.as_str(),
        DefaultValue::Keyword(k) => k.as_str(),
        _ => return None,
    };
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn is_current_timestamp(value: &DefaultValue) -> bool {
    if let DefaultValue::Keyword(k) = value {
        return k == "CURRENT_TIMESTAMP" || k == "LOCALTIMESTAMP";
    }
    match value.function_name().as_deref() {
        Some(name) if NOW_FUNCTIONS.contains(&name) => true,
        // SQLite: datetime('now')
        Some("datetime") => match value {
            DefaultValue::Expr(tokens) => tokens.iter().any(|t| {
                matches!(&t.kind, TokenKind::Str { value, .. } if value.eq_ignore_ascii_case("now"))
            }),
            _ => false,
        },
        _ => false,
    }
}

/// SQL Server has no `RESTRICT`; its default `NO ACTION` behaves the same.
pub(crate) fn rewrite_reference(reference: &mut Reference, to: Dialect) {
    if to != Dialect::SqlServer {
        return;
    }
    for action in [&mut reference.on_delete, &mut reference.on_update] {
        if action.as_deref() == Some("RESTRICT") {
            *action = Some("NO ACTION".to_string());
        }
    }
}

//! Render a rewritten statement as SQL for the target dialect.
//!
//! Identifiers are always quoted from the AST and keywords never are, so
//! no keyword de-quoting is needed afterwards.

use crate::dialect::Dialect;
use crate::normalize::fix_lines;
use crate::parser::lexer::{render_string_literal, render_tokens};
use crate::parser::{
    ColumnClause, ColumnOption, ConstraintClause, ConstraintKind, DefaultValue, IndexColumn,
    IndexKind, ParsedStatement, Reference,
};
use crate::quote::{escape_identifier, quote_list};

/// Full `CREATE TABLE` statement, normalized and terminated with `;`
pub(crate) fn render_statement(
    stmt: &ParsedStatement,
    target: Dialect,
    table_options: Option<&str>,
) -> String {
    let clauses: Vec<String> = stmt
        .columns
        .iter()
        .map(|c| render_column(c, target))
        .chain(stmt.constraints.iter().map(|c| render_constraint(c, target)))
        .map(|clause| format!("    {}", clause))
        .collect();

    let mut sql = String::from("CREATE TABLE ");
    if stmt.if_not_exists {
        sql.push_str("IF NOT EXISTS ");
    }
    sql.push_str(&escape_identifier(&stmt.table_name, target));
    sql.push_str(" (\n");
    sql.push_str(&clauses.join(",\n"));
    sql.push_str("\n)");

    if let Some(options) = table_options.map(str::trim).filter(|o| !o.is_empty()) {
        sql.push(' ');
        sql.push_str(options);
    }
    if target == Dialect::MySql {
        if let Some(comment) = &stmt.table_comment {
            sql.push_str(" COMMENT=");
            sql.push_str(&render_string_literal(comment, None, target));
        }
    }

    let mut out = fix_lines(&sql);
    out.push(';');
    out
}

fn render_column(column: &ColumnClause, target: Dialect) -> String {
    let mut parts = vec![escape_identifier(&column.name, target)];
    if !column.raw_type.is_empty() {
        parts.push(column.raw_type.clone());
    }
    parts.extend(column.options.iter().map(|o| render_option(o, target)));
    parts.join(" ")
}

fn render_option(option: &ColumnOption, target: Dialect) -> String {
    match option {
        ColumnOption::NotNull => "NOT NULL".to_string(),
        ColumnOption::Null => "NULL".to_string(),
        ColumnOption::Default(value) => format!("DEFAULT {}", render_default(value, target)),
        ColumnOption::AutoIncrement => match target {
            Dialect::Sqlite => "AUTOINCREMENT".to_string(),
            _ => "AUTO_INCREMENT".to_string(),
        },
        ColumnOption::Identity { seed, increment } => format!("IDENTITY({},{})", seed, increment),
        ColumnOption::PrimaryKey => "PRIMARY KEY".to_string(),
        ColumnOption::Unique => "UNIQUE".to_string(),
        ColumnOption::OnUpdateCurrentTimestamp => "ON UPDATE CURRENT_TIMESTAMP".to_string(),
        ColumnOption::Comment(text) => {
            format!("COMMENT {}", render_string_literal(text, None, target))
        }
        ColumnOption::References(reference) => render_reference(reference, target),
        ColumnOption::Check(tokens) => format!("CHECK ({})", render_tokens(tokens, target)),
        ColumnOption::Collate(name) => format!("COLLATE {}", name),
        ColumnOption::CharacterSet(name) => format!("CHARACTER SET {}", name),
        ColumnOption::Other(tokens) => render_tokens(tokens, target),
    }
}

fn render_default(value: &DefaultValue, target: Dialect) -> String {
    match value {
        DefaultValue::Null => "NULL".to_string(),
        DefaultValue::Str { value, prefix } => render_string_literal(value, *prefix, target),
        DefaultValue::Number(n) => n.clone(),
        DefaultValue::Keyword(k) => k.clone(),
        DefaultValue::Raw(raw) => raw.clone(),
        DefaultValue::Expr(tokens) => {
            let body = render_tokens(tokens, target);
            // MySQL only accepts expression defaults in parens
            if target == Dialect::MySql && !body.starts_with('(') {
                format!("({})", body)
            } else {
                body
            }
        }
    }
}

fn render_reference(reference: &Reference, target: Dialect) -> String {
    let mut out = format!("REFERENCES {}", escape_identifier(&reference.table, target));
    if !reference.columns.is_empty() {
        out.push_str(&format!(" ({})", quote_list(&reference.columns, target)));
    }
    if let Some(action) = &reference.on_delete {
        out.push_str(" ON DELETE ");
        out.push_str(action);
    }
    if let Some(action) = &reference.on_update {
        out.push_str(" ON UPDATE ");
        out.push_str(action);
    }
    out
}

fn render_index_columns(columns: &[IndexColumn], target: Dialect) -> String {
    columns
        .iter()
        .map(|c| {
            let mut out = escape_identifier(&c.name, target);
            if let (Some(len), Dialect::MySql) = (&c.length, target) {
                out.push_str(&format!("({})", len));
            }
            // PostgreSQL constraints take no sort order
            if let (Some(order), false) = (&c.order, target == Dialect::Postgres) {
                out.push(' ');
                out.push_str(order);
            }
            out
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_constraint(constraint: &ConstraintClause, target: Dialect) -> String {
    let named = |body: String| match &constraint.name {
        Some(name) => format!("CONSTRAINT {} {}", escape_identifier(name, target), body),
        None => body,
    };

    match &constraint.kind {
        ConstraintKind::PrimaryKey(columns) => {
            let body = format!("PRIMARY KEY ({})", render_index_columns(columns, target));
            // MySQL names every primary key PRIMARY
            if target == Dialect::MySql {
                body
            } else {
                named(body)
            }
        }
        ConstraintKind::Unique(columns) => {
            let cols = render_index_columns(columns, target);
            match (target, &constraint.name) {
                (Dialect::MySql, Some(name)) => {
                    format!("UNIQUE KEY {} ({})", escape_identifier(name, target), cols)
                }
                (Dialect::MySql, None) => format!("UNIQUE KEY ({})", cols),
                (Dialect::Sqlite, _) => format!("UNIQUE ({})", cols),
                _ => named(format!("UNIQUE ({})", cols)),
            }
        }
        ConstraintKind::ForeignKey { columns, reference } => named(format!(
            "FOREIGN KEY ({}) {}",
            quote_list(columns, target),
            render_reference(reference, target)
        )),
        ConstraintKind::Index { kind, columns } => {
            let keyword = match kind {
                IndexKind::Plain => "KEY",
                IndexKind::Fulltext => "FULLTEXT KEY",
                IndexKind::Spatial => "SPATIAL KEY",
            };
            let cols = render_index_columns(columns, target);
            match &constraint.name {
                Some(name) => format!("{} {} ({})", keyword, escape_identifier(name, target), cols),
                None => format!("{} ({})", keyword, cols),
            }
        }
        ConstraintKind::Check(tokens) => {
            named(format!("CHECK ({})", render_tokens(tokens, target)))
        }
    }
}

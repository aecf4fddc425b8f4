//! Primary key bookkeeping for one statement.

use crate::parser::{ColumnOption, ConstraintKind, ParsedStatement};

/// Where the primary key of a table is declared
#[derive(Debug, Default)]
pub(crate) struct PrimaryKeyModel {
    /// `PRIMARY KEY (...)` constraint columns
    table: Option<Vec<String>>,
    /// Columns carrying an inline `PRIMARY KEY`
    inline: Vec<String>,
}

impl PrimaryKeyModel {
    pub fn from_statement(stmt: &ParsedStatement) -> Self {
        Self {
            table: stmt.table_primary_key(),
            inline: stmt
                .columns
                .iter()
                .filter(|c| c.is_inline_primary_key())
                .map(|c| c.name.clone())
                .collect(),
        }
    }

    fn columns(&self) -> Vec<&str> {
        let mut cols: Vec<&str> = self.inline.iter().map(String::as_str).collect();
        for col in self.table.iter().flatten() {
            if !cols.iter().any(|c| c.eq_ignore_ascii_case(col)) {
                cols.push(col);
            }
        }
        cols
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_none() && self.inline.is_empty()
    }

    /// True when the key is absent or exactly `column`
    pub fn allows_inline(&self, column: &str) -> bool {
        match self.columns().as_slice() {
            [] => true,
            [only] => only.eq_ignore_ascii_case(column),
            _ => false,
        }
    }

    pub fn mark_inline(&mut self, column: &str) {
        if !self.inline.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            self.inline.push(column.to_string());
        }
    }

    /// Drop a single-column table-level key that repeats an inline key.
    pub fn dedupe(&self, stmt: &mut ParsedStatement) {
        let Some([table_col]) = self.table.as_deref() else {
            return;
        };
        let inline = stmt.columns.iter().any(|c| {
            c.name.eq_ignore_ascii_case(table_col)
                && c.has_option(|o| matches!(o, ColumnOption::PrimaryKey))
        });
        if inline {
            stmt.constraints
                .retain(|c| !matches!(c.kind, ConstraintKind::PrimaryKey(_)));
        }
    }
}

//! Edge case tests for statement reading and `CREATE TABLE` parsing.
//!
//! These tests cover:
//! - Truncated and malformed statements
//! - Quotes, escapes and comments around delimiters
//! - Buffer boundaries in the streaming reader
//! - Unusual but valid column and constraint syntax

use crate::dialect::Dialect;
use crate::error::TranslateError;
use crate::parser::{
    parse_create_table, split_clauses, ColumnOption, ConstraintKind, DefaultValue, Parser,
    StatementType,
};

// =========================================================================
// A. Statement splitting (read_statement)
// =========================================================================

mod read_statement_tests {
    use super::*;

    fn read_all(sql: &[u8], buffer_size: usize, dialect: Dialect) -> Vec<Vec<u8>> {
        let mut parser = Parser::with_dialect(sql, buffer_size, dialect);
        let mut out = Vec::new();
        while let Some(stmt) = parser.read_statement().unwrap() {
            out.push(stmt);
        }
        out
    }

    #[test]
    fn test_statement_without_trailing_semicolon() {
        let stmts = read_all(b"CREATE TABLE t1 (id INT)", 1024, Dialect::MySql);
        assert_eq!(stmts, vec![b"CREATE TABLE t1 (id INT)".to_vec()]);
    }

    #[test]
    fn test_empty_input() {
        assert!(read_all(b"", 1024, Dialect::MySql).is_empty());
    }

    #[test]
    fn test_tiny_buffer_splits_across_refills() {
        let sql = b"CREATE TABLE a (x TEXT DEFAULT ';'); CREATE TABLE b (y INT);";
        let stmts = read_all(sql, 4, Dialect::MySql);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], b"CREATE TABLE a (x TEXT DEFAULT ';');");
    }

    #[test]
    fn test_comment_marker_split_across_refill() {
        // `-` `-` land in different buffer fills
        let sql = b"CREATE TABLE a (x INT) --; not a split\n;CREATE TABLE b (y INT);";
        let stmts = read_all(sql, 24, Dialect::Postgres);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].ends_with(b"split\n;"));
    }

    #[test]
    fn test_double_quoted_identifier_with_semicolon() {
        let sql = b"CREATE TABLE \"a;b\" (id INT); SELECT 1;";
        let stmts = read_all(sql, 1024, Dialect::Postgres);
        assert_eq!(stmts[0], b"CREATE TABLE \"a;b\" (id INT);");
    }

    #[test]
    fn test_bracket_identifier_with_semicolon() {
        let sql = b"CREATE TABLE [a;b] ([id] INT); SELECT 1;";
        let stmts = read_all(sql, 1024, Dialect::SqlServer);
        assert_eq!(stmts[0], b"CREATE TABLE [a;b] ([id] INT);");
    }

    #[test]
    fn test_mysql_hash_comment() {
        let sql = b"# header; with semicolon\nCREATE TABLE t (id INT);";
        let stmts = read_all(sql, 1024, Dialect::MySql);
        assert_eq!(stmts.len(), 1);
        let (typ, name) = Parser::<&[u8]>::parse_statement(&stmts[0][24..]);
        assert_eq!(typ, StatementType::CreateTable);
        assert_eq!(name, "t");
    }

    #[test]
    fn test_doubled_quote_stays_in_string() {
        let sql = b"CREATE TABLE t (a TEXT DEFAULT 'x'';y');";
        let stmts = read_all(sql, 1024, Dialect::Sqlite);
        assert_eq!(stmts.len(), 1);
    }
}

// =========================================================================
// B. CREATE TABLE parsing
// =========================================================================

mod create_table_tests {
    use super::*;

    #[test]
    fn test_truncated_statement_is_malformed() {
        for sql in [
            "CREATE TABLE",
            "CREATE TABLE t",
            "CREATE TABLE t (id INT",
            "CREATE TABLE t (id INT(",
            "CREATE TABLE t (a TEXT DEFAULT 'unterminated)",
        ] {
            for dialect in Dialect::ALL {
                let err = parse_create_table(sql, dialect).unwrap_err();
                assert!(
                    matches!(err, TranslateError::MalformedStatement(_)),
                    "{sql:?} as {dialect}: {err}"
                );
            }
        }
    }

    #[test]
    fn test_trailing_comma_tolerated() {
        let stmt = parse_create_table("CREATE TABLE t (a INT, b INT,)", Dialect::Sqlite).unwrap();
        assert_eq!(stmt.columns.len(), 2);
    }

    #[test]
    fn test_parens_inside_string_default() {
        let stmt =
            parse_create_table("CREATE TABLE t (a TEXT DEFAULT '(', b INT)", Dialect::Postgres)
                .unwrap();
        assert_eq!(stmt.columns.len(), 2);
        assert_eq!(
            stmt.columns[0].default_value(),
            Some(&DefaultValue::Str {
                value: "(".into(),
                prefix: None
            })
        );
    }

    #[test]
    fn test_quoted_column_named_like_keyword() {
        let stmt = parse_create_table(
            "CREATE TABLE t (`key` VARCHAR(10), `primary` INT, `index` INT)",
            Dialect::MySql,
        )
        .unwrap();
        let names: Vec<&str> = stmt.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["key", "primary", "index"]);
        assert!(stmt.constraints.is_empty());
    }

    #[test]
    fn test_embedded_quote_in_identifier() {
        let stmt =
            parse_create_table("CREATE TABLE [we]]ird] ([a]]b] INT)", Dialect::SqlServer).unwrap();
        assert_eq!(stmt.table_name, "we]ird");
        assert_eq!(stmt.columns[0].name, "a]b");
    }

    #[test]
    fn test_enum_values_with_commas() {
        let stmt = parse_create_table(
            "CREATE TABLE t (s ENUM('a,b','c''d') NOT NULL)",
            Dialect::MySql,
        )
        .unwrap();
        assert_eq!(stmt.columns[0].type_params.as_deref(), Some("'a,b','c''d'"));
    }

    #[test]
    fn test_check_constraint_kept_as_tokens() {
        let stmt = parse_create_table(
            "CREATE TABLE t (qty INT CHECK (qty > 0), CONSTRAINT ck CHECK (qty < 100))",
            Dialect::Postgres,
        )
        .unwrap();
        assert!(stmt.columns[0]
            .options
            .iter()
            .any(|o| matches!(o, ColumnOption::Check(t) if t.len() == 3)));
        assert_eq!(stmt.constraints[0].name.as_deref(), Some("ck"));
        assert!(matches!(stmt.constraints[0].kind, ConstraintKind::Check(_)));
    }

    #[test]
    fn test_unicode_names() {
        let stmt =
            parse_create_table("CREATE TABLE café (naïve TEXT, 名前 TEXT)", Dialect::Sqlite).unwrap();
        assert_eq!(stmt.table_name, "café");
        assert_eq!(stmt.columns[1].name, "名前");
    }

    #[test]
    fn test_split_clauses_with_comments() {
        let clauses = split_clauses(
            "a INT, -- first, really\n b INT /* , */, c INT",
            Dialect::MySql,
        )
        .unwrap();
        assert_eq!(clauses.len(), 3);
    }
}

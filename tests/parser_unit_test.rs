//! Parser tests through the public API: statement streaming, clause
//! splitting and CREATE TABLE parsing.

use sql_translator::normalize::fix_lines;
use sql_translator::parser::{
    classify_clause, locate_column_section, parse_create_table, split_clauses, Clause,
    ColumnOption, ConstraintKind, DefaultValue, Parser, StatementType,
};
use sql_translator::Dialect;

fn read_all(input: &str, dialect: Dialect) -> Vec<String> {
    let mut parser = Parser::with_dialect(input.as_bytes(), 1024, dialect);
    let mut out = Vec::new();
    while let Some(stmt) = parser.read_statement().unwrap() {
        out.push(String::from_utf8(stmt).unwrap());
    }
    out
}

#[test]
fn test_streaming_respects_quotes_and_comments() {
    let input = "CREATE TABLE a (x TEXT DEFAULT ';');\n-- a; comment\nCREATE TABLE `b;c` (y INT);";
    let stmts = read_all(input, Dialect::MySql);
    assert_eq!(stmts.len(), 2);
    assert!(stmts[0].ends_with("DEFAULT ';');"));
    assert!(stmts[1].contains("`b;c`"));
}

#[test]
fn test_streaming_sqlserver_brackets() {
    let stmts = read_all("CREATE TABLE [a;b] (x INT);", Dialect::SqlServer);
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_backslash_only_escapes_for_mysql() {
    // In PostgreSQL a backslash is an ordinary character
    let stmts = read_all("SELECT 'a\\';SELECT 1;", Dialect::Postgres);
    assert_eq!(stmts.len(), 2);
    let stmts = read_all("SELECT 'a\\';SELECT 1;", Dialect::MySql);
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_statement_classification() {
    let cases = [
        (&b"CREATE TABLE IF NOT EXISTS `shop`.`users` (id INT);"[..], StatementType::CreateTable, "users"),
        (b"-- header\nINSERT INTO users VALUES (1);", StatementType::Insert, "users"),
        (b"CREATE UNIQUE INDEX idx ON users (email);", StatementType::CreateIndex, "users"),
        (b"DROP TABLE IF EXISTS users;", StatementType::DropTable, "users"),
        (b"SET NAMES utf8mb4;", StatementType::Unknown, ""),
    ];
    for (sql, typ, table) in cases {
        let (got_type, got_table) = Parser::<&[u8]>::parse_statement(sql);
        assert_eq!(got_type, typ);
        assert_eq!(got_table, table);
    }
}

#[test]
fn test_locate_column_section() {
    let sql = "CREATE TABLE IF NOT EXISTS \"t\" (a INT, b TEXT) WITHOUT ROWID";
    let section = locate_column_section(sql, Dialect::Sqlite).unwrap();
    assert_eq!(section.table_name, "t");
    assert!(section.if_not_exists);
    assert_eq!(&sql[section.start..section.end], "a INT, b TEXT");
}

#[test]
fn test_split_clauses_balance() {
    let section = "id INT, price DECIMAL(10, 2), kind ENUM('a,b', 'c'), CHECK (price > (0)), x INT";
    let clauses = split_clauses(section, Dialect::MySql).unwrap();
    assert_eq!(clauses.len(), 5);
    for clause in &clauses {
        let depth: i32 = clause
            .chars()
            .map(|c| match c {
                '(' => 1,
                ')' => -1,
                _ => 0,
            })
            .sum();
        assert_eq!(depth, 0, "{clause}");
    }
}

#[test]
fn test_classify_clause() {
    match classify_clause("`total` DECIMAL(10,2) UNSIGNED NOT NULL DEFAULT '0.00'", Dialect::MySql)
        .unwrap()
    {
        Clause::Column(col) => {
            assert_eq!(col.name, "total");
            assert_eq!(col.base_type, "decimal");
            assert_eq!(col.type_params.as_deref(), Some("10,2"));
            assert_eq!(col.type_modifiers, vec!["unsigned"]);
            assert_eq!(col.options[0], ColumnOption::NotNull);
        }
        other => panic!("expected column, got {other:?}"),
    }

    match classify_clause("CONSTRAINT pk PRIMARY KEY (a, b)", Dialect::Postgres).unwrap() {
        Clause::Constraint(c) => {
            assert_eq!(c.name.as_deref(), Some("pk"));
            assert!(matches!(c.kind, ConstraintKind::PrimaryKey(ref cols) if cols.len() == 2));
        }
        other => panic!("expected constraint, got {other:?}"),
    }
}

#[test]
fn test_parse_postgres_table() {
    let stmt = parse_create_table(
        "CREATE TABLE public.events (\n  id bigint DEFAULT nextval('events_id_seq'::regclass) NOT NULL,\n  tags text[],\n  payload jsonb DEFAULT '{}'::jsonb\n);",
        Dialect::Postgres,
    )
    .unwrap();
    assert_eq!(stmt.table_name, "events");
    assert_eq!(stmt.columns.len(), 3);
    assert_eq!(
        stmt.columns[0]
            .default_value()
            .and_then(DefaultValue::function_name)
            .as_deref(),
        Some("nextval")
    );
    assert!(stmt.columns[1].is_array);
}

#[test]
fn test_parse_rejects_empty_column_list() {
    assert!(parse_create_table("CREATE TABLE t ()", Dialect::MySql).is_err());
    assert!(parse_create_table("CREATE TABLE t (PRIMARY KEY (id))", Dialect::MySql).is_err());
}

#[test]
fn test_fix_lines_idempotent() {
    let inputs = [
        "CREATE TABLE t (\n  a INT , -- note\n\n  b TEXT /* x */\n);",
        "",
        "  \r\n  \n",
        "SELECT '--not a comment' , 1",
        "/* only */",
    ];
    for input in inputs {
        let once = fix_lines(input);
        assert_eq!(fix_lines(&once), once, "{input:?}");
    }
}

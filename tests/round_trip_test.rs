//! A -> B -> A translation keeps column names, column count and the
//! primary key. Types may lose precision and are not compared.

use sql_translator::translate::translate_statement;
use sql_translator::parser::DefaultValue;
use sql_translator::{parse_create_table, Dialect, ParsedStatement};

fn source_for(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::MySql => {
            "CREATE TABLE `orders` (\n  `id` INT NOT NULL AUTO_INCREMENT,\n  `customer` VARCHAR(100) NOT NULL,\n  `status` ENUM('new','paid') DEFAULT 'new',\n  `total` DECIMAL(10,2),\n  `created_at` DATETIME DEFAULT CURRENT_TIMESTAMP,\n  PRIMARY KEY (`id`)\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;"
        }
        Dialect::Postgres => {
            "CREATE TABLE public.orders (\n  id serial PRIMARY KEY,\n  customer character varying(100) NOT NULL,\n  total numeric(10,2),\n  paid boolean DEFAULT false,\n  created_at timestamp DEFAULT now()\n);"
        }
        Dialect::Sqlite => {
            "CREATE TABLE orders (\n  id INTEGER PRIMARY KEY AUTOINCREMENT,\n  customer TEXT NOT NULL,\n  total REAL,\n  created_at TEXT DEFAULT CURRENT_TIMESTAMP\n);"
        }
        Dialect::SqlServer => {
            "CREATE TABLE [dbo].[orders] (\n  [id] INT IDENTITY(1,1) NOT NULL,\n  [customer] NVARCHAR(100) NOT NULL,\n  [total] DECIMAL(10,2) NULL,\n  [created_at] DATETIME2 DEFAULT GETDATE(),\n  CONSTRAINT [PK_orders] PRIMARY KEY ([id])\n)"
        }
    }
}

fn column_names(stmt: &ParsedStatement) -> Vec<String> {
    stmt.columns.iter().map(|c| c.name.to_lowercase()).collect()
}

fn primary_key(stmt: &ParsedStatement) -> Vec<String> {
    let mut pk: Vec<String> = stmt
        .columns
        .iter()
        .filter(|c| c.is_inline_primary_key())
        .map(|c| c.name.to_lowercase())
        .collect();
    for col in stmt.table_primary_key().unwrap_or_default() {
        let col = col.to_lowercase();
        if !pk.contains(&col) {
            pk.push(col);
        }
    }
    pk
}

#[test]
fn test_round_trip_preserves_shape() {
    for a in Dialect::ALL {
        let sql = source_for(a);
        let original = parse_create_table(sql, a).unwrap();

        for b in Dialect::ALL.into_iter().filter(|b| *b != a) {
            let there = translate_statement(sql, a, b)
                .unwrap_or_else(|e| panic!("{a} -> {b}: {e}"));
            let back = translate_statement(&there, b, a)
                .unwrap_or_else(|e| panic!("{a} -> {b} -> {a}: {e}\n{there}"));
            let result = parse_create_table(&back, a)
                .unwrap_or_else(|e| panic!("reparse {a} -> {b} -> {a}: {e}\n{back}"));

            assert_eq!(result.table_name, "orders", "{a} -> {b}");
            assert_eq!(
                column_names(&result),
                column_names(&original),
                "{a} -> {b} -> {a}:\n{back}"
            );
            assert_eq!(
                primary_key(&result),
                vec!["id".to_string()],
                "{a} -> {b} -> {a}:\n{back}"
            );
        }
    }
}

#[test]
fn test_translated_output_reparses_in_target() {
    for a in Dialect::ALL {
        for b in Dialect::ALL.into_iter().filter(|b| *b != a) {
            let out = translate_statement(source_for(a), a, b).unwrap();
            let stmt = parse_create_table(&out, b).unwrap_or_else(|e| panic!("{a} -> {b}: {e}"));
            assert_eq!(stmt.columns.len(), parse_create_table(source_for(a), a).unwrap().columns.len());
        }
    }
}

/// Column names carrying every dialect's quote characters, plus a default
/// whose text spans lines and contains comment markers
const AWKWARD_MYSQL: &str = "CREATE TABLE `we\"ird` (\n  `a]b` INT NOT NULL,\n  `[c]` INT,\n  `d\"e` INT,\n  `f``g` INT,\n  `note` VARCHAR(50) DEFAULT 'x\\n-- y\\n\\n  z /* w */ it''s',\n  PRIMARY KEY (`a]b`)\n) ENGINE=InnoDB;";

const AWKWARD_NAMES: [&str; 5] = ["a]b", "[c]", "d\"e", "f`g", "note"];
const AWKWARD_DEFAULT: &str = "x\n-- y\n\n  z /* w */ it's";

fn string_default(stmt: &ParsedStatement, column: &str) -> Option<String> {
    let col = stmt.columns.iter().find(|c| c.name == column)?;
    match col.default_value()? {
        DefaultValue::Str { value, .. } => Some(value.clone()),
        _ => None,
    }
}

fn awkward_source(dialect: Dialect) -> String {
    translate_statement(AWKWARD_MYSQL, Dialect::MySql, dialect).unwrap()
}

#[test]
fn test_awkward_identifiers_and_literals_survive_every_pair() {
    for a in Dialect::ALL {
        let sql = awkward_source(a);
        let original = parse_create_table(&sql, a).unwrap_or_else(|e| panic!("{a}: {e}\n{sql}"));
        assert_eq!(original.table_name, "we\"ird", "{a}:\n{sql}");
        let names: Vec<&str> = original.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, AWKWARD_NAMES, "{a}:\n{sql}");
        assert_eq!(string_default(&original, "note").as_deref(), Some(AWKWARD_DEFAULT), "{a}:\n{sql}");

        for b in Dialect::ALL.into_iter().filter(|b| *b != a) {
            let there = translate_statement(&sql, a, b)
                .unwrap_or_else(|e| panic!("{a} -> {b}: {e}\n{sql}"));
            let mid = parse_create_table(&there, b)
                .unwrap_or_else(|e| panic!("reparse {a} -> {b}: {e}\n{there}"));
            let mid_names: Vec<&str> = mid.columns.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(mid_names, AWKWARD_NAMES, "{a} -> {b}:\n{there}");
            assert_eq!(
                string_default(&mid, "note").as_deref(),
                Some(AWKWARD_DEFAULT),
                "{a} -> {b}:\n{there}"
            );

            let back = translate_statement(&there, b, a)
                .unwrap_or_else(|e| panic!("{a} -> {b} -> {a}: {e}\n{there}"));
            let result = parse_create_table(&back, a)
                .unwrap_or_else(|e| panic!("reparse {a} -> {b} -> {a}: {e}\n{back}"));
            assert_eq!(result.table_name, "we\"ird", "{a} -> {b} -> {a}:\n{back}");
            let back_names: Vec<&str> = result.columns.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(back_names, AWKWARD_NAMES, "{a} -> {b} -> {a}:\n{back}");
            assert_eq!(
                string_default(&result, "note").as_deref(),
                Some(AWKWARD_DEFAULT),
                "{a} -> {b} -> {a}:\n{back}"
            );
            assert_eq!(primary_key(&result), vec!["a]b".to_string()], "{a} -> {b} -> {a}:\n{back}");
        }
    }
}

#[test]
fn test_awkward_identifiers_are_escaped_per_target() {
    let sqlserver = awkward_source(Dialect::SqlServer);
    assert!(sqlserver.contains("[a]]b] INT NOT NULL"), "{sqlserver}");
    assert!(sqlserver.contains("[[c]]] INT"), "{sqlserver}");
    assert!(sqlserver.contains("[d\"e] INT"), "{sqlserver}");

    let postgres = awkward_source(Dialect::Postgres);
    assert!(postgres.contains("CREATE TABLE \"we\"\"ird\""), "{postgres}");
    assert!(postgres.contains("\"[c]\" INTEGER"), "{postgres}");
    assert!(postgres.contains("\"d\"\"e\" INTEGER"), "{postgres}");
    assert!(postgres.contains("E'x\\n-- y\\n\\n  z /* w */ it''s'"), "{postgres}");

    let sqlite = awkward_source(Dialect::Sqlite);
    assert!(sqlite.contains("DEFAULT 'x\n-- y\n\n  z /* w */ it''s'"), "{sqlite}");
}

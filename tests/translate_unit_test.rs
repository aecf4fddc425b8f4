//! Scenario tests for CREATE TABLE translation through the public API.

use sql_translator::translate::{route, Route, TranslateWarning};
use sql_translator::{
    translate_create_table, Dialect, TranslateError, TranslateOptions, Translator,
};

#[test]
fn test_boolean_column_mysql_to_postgres() {
    let out = translate_create_table(
        "CREATE TABLE t (active TINYINT(1) NOT NULL DEFAULT '1')",
        "mysql",
        "postgresql",
    )
    .unwrap();
    assert!(
        out.contains("\"active\" BOOLEAN NOT NULL DEFAULT TRUE"),
        "{out}"
    );
    assert!(!out.contains("DEFAULT '1'"));
}

#[test]
fn test_varchar_length_survives() {
    let out = translate_create_table(
        "CREATE TABLE t (name VARCHAR(100) NOT NULL)",
        "mysql",
        "pgsql",
    )
    .unwrap();
    assert!(
        out.contains("\"name\" CHARACTER VARYING(100) NOT NULL"),
        "{out}"
    );
}

#[test]
fn test_enum_flattens_to_text() {
    let out = translate_create_table(
        "CREATE TABLE t (status ENUM('A','B','C') NOT NULL)",
        "mysql",
        "postgres",
    )
    .unwrap();
    assert!(out.contains("\"status\" TEXT NOT NULL"), "{out}");
    assert!(!out.contains("'A'"));
}

#[test]
fn test_single_primary_key_mysql_to_sqlite() {
    let out = translate_create_table(
        "CREATE TABLE t (id INT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(50))",
        "mysql",
        "sqlite",
    )
    .unwrap();
    assert_eq!(out.matches("PRIMARY KEY").count(), 1, "{out}");
    assert_eq!(out.matches("AUTOINCREMENT").count(), 1, "{out}");
    assert!(out.contains("\"id\" INTEGER PRIMARY KEY AUTOINCREMENT"), "{out}");
}

#[test]
fn test_unbalanced_parens_fail_for_every_target() {
    let sql = "CREATE TABLE t (id INT(";
    for target in ["postgresql", "sqlite", "sqlserver"] {
        let err = translate_create_table(sql, "mysql", target).unwrap_err();
        assert!(
            matches!(err, TranslateError::MalformedStatement(_)),
            "{target}: {err}"
        );
    }
    for source in ["postgresql", "sqlite", "sqlserver"] {
        let err = translate_create_table(sql, source, "mysql").unwrap_err();
        assert!(matches!(err, TranslateError::MalformedStatement(_)), "{source}");
    }
}

#[test]
fn test_missing_column_section_is_malformed() {
    let err = translate_create_table("CREATE TABLE t", "mysql", "sqlite").unwrap_err();
    assert!(matches!(err, TranslateError::MalformedStatement(_)));

    let err = translate_create_table("DROP TABLE t", "mysql", "sqlite").unwrap_err();
    assert!(matches!(err, TranslateError::MalformedStatement(_)));
}

#[test]
fn test_same_dialect_passthrough() {
    let sql = "CREATE TABLE `t` (`id` int) ENGINE=MyISAM";
    assert_eq!(translate_create_table(sql, "mariadb", "mysql").unwrap(), sql);
}

#[test]
fn test_unknown_dialect() {
    let err = translate_create_table("CREATE TABLE t (id INT)", "db2", "mysql").unwrap_err();
    assert!(matches!(err, TranslateError::UnsupportedDialect(ref d) if d == "db2"));
}

#[test]
fn test_output_is_terminated_once() {
    let out = translate_create_table("CREATE TABLE t (id INT);", "mysql", "sqlite").unwrap();
    assert!(out.ends_with(");"));
    assert!(!out.ends_with(";;"));
}

#[test]
fn test_hub_route_for_sqlite_to_sqlserver() {
    assert_eq!(route(Dialect::Sqlite, Dialect::SqlServer).unwrap(), Route::ViaHub);
    let out = translate_create_table(
        "CREATE TABLE notes (id INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT NOT NULL)",
        "sqlite",
        "mssql",
    )
    .unwrap();
    assert!(out.starts_with("CREATE TABLE [notes] ("), "{out}");
    assert!(out.contains("[id] INT IDENTITY(1,1)"), "{out}");
    assert!(out.contains("[body] NVARCHAR(MAX) NOT NULL"), "{out}");
    assert!(!out.contains("ENGINE"), "{out}");
}

#[test]
fn test_foreign_keys_and_indexes() {
    let sql = "CREATE TABLE `posts` (\n  `id` INT NOT NULL AUTO_INCREMENT,\n  `user_id` INT NOT NULL,\n  PRIMARY KEY (`id`),\n  KEY `idx_user` (`user_id`),\n  CONSTRAINT `fk_user` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`) ON DELETE RESTRICT\n) ENGINE=InnoDB;";
    let mut translator = Translator::new(Dialect::MySql, Dialect::SqlServer);
    let out = translator.translate(sql).unwrap();
    assert!(!out.contains("idx_user"), "{out}");
    assert!(
        out.contains("CONSTRAINT [fk_user] FOREIGN KEY ([user_id]) REFERENCES [users] ([id]) ON DELETE NO ACTION"),
        "{out}"
    );
    assert!(translator
        .warnings()
        .iter()
        .any(|w| matches!(w, TranslateWarning::UnsupportedFeature { feature, .. } if feature.contains("INDEX"))));
}

#[test]
fn test_lossy_conversion_is_reported() {
    let mut translator = Translator::new(Dialect::MySql, Dialect::Sqlite);
    translator
        .translate("CREATE TABLE t (kind SET('a','b'))")
        .unwrap();
    assert!(translator.warnings().iter().any(|w| matches!(
        w,
        TranslateWarning::LossyConversion { column: Some(c), .. } if c == "kind"
    )));
}

#[test]
fn test_strict_translator_rejects_lossy_statement() {
    let mut translator = Translator::new(Dialect::MySql, Dialect::Postgres)
        .with_options(TranslateOptions::default().with_strict(true));
    let err = translator
        .translate("CREATE TABLE t (kind ENUM('a'))")
        .unwrap_err();
    assert!(matches!(err, TranslateError::MalformedStatement(_)));
}

#[test]
fn test_type_totality() {
    for ty in ["int", "geometry", "x_custom_type", "varchar(10)", "money", "interval"] {
        for from in Dialect::ALL {
            for to in Dialect::ALL {
                let out = sql_translator::types::translate_field_type(ty, from, to);
                assert!(!out.is_empty(), "{ty}: {from} -> {to}");
            }
        }
    }
}

#[test]
fn test_multiline_default_stays_one_literal() {
    let out = translate_create_table(
        "CREATE TABLE t (note VARCHAR(50) DEFAULT 'x\\n-- y', n INT)",
        "mysql",
        "postgresql",
    )
    .unwrap();
    assert!(
        out.contains("\"note\" CHARACTER VARYING(50) DEFAULT E'x\\n-- y',"),
        "{out}"
    );
    assert!(out.contains("\"n\" INTEGER"), "{out}");

    // A blank line inside the literal is kept
    let out = translate_create_table(
        "CREATE TABLE t (note text DEFAULT E'a\\n\\nb')",
        "postgresql",
        "mysql",
    )
    .unwrap();
    assert!(out.contains("DEFAULT 'a\\n\\nb'"), "{out}");

    let out = translate_create_table(
        "CREATE TABLE t (note text DEFAULT E'a\\n\\n-- b ')",
        "postgresql",
        "sqlserver",
    )
    .unwrap();
    assert!(out.contains("DEFAULT 'a\n\n-- b '\n)"), "{out}");
}

#[test]
fn test_identifiers_keep_quote_characters() {
    let sql = "CREATE TABLE `x` (`a]b` INT, `[c]` INT, `d\"e` INT)";
    let out = translate_create_table(sql, "mysql", "sqlserver").unwrap();
    assert!(out.contains("[a]]b] INT,"), "{out}");
    assert!(out.contains("[[c]]] INT,"), "{out}");
    assert!(out.contains("[d\"e] INT"), "{out}");

    let out = translate_create_table(sql, "mysql", "postgresql").unwrap();
    assert!(out.contains("\"a]b\" INTEGER,"), "{out}");
    assert!(out.contains("\"[c]\" INTEGER,"), "{out}");
    assert!(out.contains("\"d\"\"e\" INTEGER"), "{out}");
}

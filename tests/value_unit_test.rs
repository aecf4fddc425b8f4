//! Value and literal conversion through the public API.

use serde_json::json;
use sql_translator::types::NativeType;
use sql_translator::value::parse_bool;
use sql_translator::{
    convert_native_to_sql_literal, convert_to_native_type, convert_value_to_sql_literal, Dialect,
    NativeValue, RawValue,
};
use std::io::{self, Read};

#[test]
fn test_null_literal_for_any_type() {
    for ty in [
        "int",
        "varchar(255)",
        "tinyint(1)",
        "json",
        "blob",
        "decimal(10,2)",
        "made_up",
        "",
    ] {
        assert_eq!(convert_value_to_sql_literal(&NativeValue::Null, ty), "NULL", "{ty}");
    }
}

#[test]
fn test_read_path_dispatch() {
    let cases: Vec<(RawValue, &str, NativeValue)> = vec![
        ("17".into(), "smallint", NativeValue::Int(17)),
        ("1.25".into(), "double precision", NativeValue::Float(1.25)),
        ("on".into(), "bool", NativeValue::Bool(true)),
        ("2024-05-01".into(), "date", NativeValue::String("2024-05-01".into())),
        (Some("x").into(), "text", NativeValue::String("x".into())),
        (None::<&str>.into(), "text", NativeValue::Null),
        (r#"[1,"a"]"#.into(), "json", NativeValue::Json(json!([1, "a"]))),
    ];
    for (raw, ty, expected) in cases {
        assert_eq!(
            convert_to_native_type(raw, ty, Dialect::Postgres).unwrap(),
            expected,
            "{ty}"
        );
    }
}

#[test]
fn test_sqlite_booleans_are_integers() {
    let v = convert_to_native_type("no", "boolean", Dialect::Sqlite).unwrap();
    assert_eq!(v, NativeValue::Int(0));
    let v = convert_to_native_type("no", "boolean", Dialect::MySql).unwrap();
    assert_eq!(v, NativeValue::Bool(false));
}

#[test]
fn test_unparseable_values_degrade_to_null() {
    assert_eq!(
        convert_to_native_type("perhaps", "tinyint(1)", Dialect::MySql).unwrap(),
        NativeValue::Null
    );
    assert_eq!(
        convert_to_native_type("12abc", "integer", Dialect::Postgres).unwrap(),
        NativeValue::Null
    );
    assert_eq!(
        convert_to_native_type("inf", "float", Dialect::Postgres).unwrap(),
        NativeValue::Null
    );
    assert_eq!(parse_bool(" YES "), Some(true));
    assert_eq!(parse_bool("2"), None);
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk gone"))
    }
}

#[test]
fn test_stream_errors_surface() {
    let err = convert_to_native_type(RawValue::Stream(Box::new(FailingReader)), "blob", Dialect::MySql)
        .unwrap_err();
    assert!(err.to_string().contains("disk gone"));
}

#[test]
fn test_stream_drained_even_for_text_types() {
    let raw = RawValue::Stream(Box::new(io::Cursor::new(b"hello".to_vec())));
    let v = convert_to_native_type(raw, "varchar(10)", Dialect::MySql).unwrap();
    assert_eq!(v, NativeValue::String("hello".into()));
}

#[test]
fn test_write_path_literals() {
    assert_eq!(convert_value_to_sql_literal(&42_i64.into(), "bigint"), "42");
    assert_eq!(convert_value_to_sql_literal(&2.5_f64.into(), "real"), "2.5");
    assert_eq!(convert_value_to_sql_literal(&true.into(), "tinyint(1)"), "1");
    assert_eq!(convert_value_to_sql_literal(&false.into(), "boolean"), "0");
    assert_eq!(
        convert_value_to_sql_literal(&"it's".into(), "char(4)"),
        "'it''s'"
    );
    assert_eq!(
        convert_value_to_sql_literal(&NativeValue::Json(json!({"a": 1})), "jsonb"),
        r#"'{"a":1}'"#
    );
    assert_eq!(
        convert_native_to_sql_literal(&"3".into(), NativeType::Int),
        "3"
    );
}

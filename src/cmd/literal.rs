//! Literal command CLI handler.

use sql_translator::{
    convert_to_native_type, convert_value_to_dialect_literal, convert_value_to_sql_literal,
    Dialect, NativeValue,
};

pub fn run(
    value: Option<String>,
    sql_type: &str,
    dialect: Option<&str>,
    null: bool,
) -> anyhow::Result<()> {
    let dialect = dialect.map(str::parse::<Dialect>).transpose()?;
    let native = match (value, null, dialect) {
        (None, _, _) | (_, true, _) => NativeValue::Null,
        (Some(v), false, Some(d)) => convert_to_native_type(v, sql_type, d)?,
        (Some(v), false, None) => NativeValue::String(v),
    };
    let literal = match dialect {
        Some(d) => convert_value_to_dialect_literal(&native, sql_type, d),
        None => convert_value_to_sql_literal(&native, sql_type),
    };
    println!("{}", literal);
    Ok(())
}

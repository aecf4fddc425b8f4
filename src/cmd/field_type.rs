//! Type command CLI handler.

pub fn run(field_type: &str, from: &str, to: &str) -> anyhow::Result<()> {
    let translated = sql_translator::translate_field_type(field_type, from, to)?;
    println!("{}", translated);
    Ok(())
}

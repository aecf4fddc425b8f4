//! Named entry points, one per dialect pair.
//!
//! Each is a thin wrapper over [`Translator`] with default options; the
//! pairs involving SQL Server on one side and PostgreSQL or SQLite on the
//! other go through MySQL.

use super::Translator;
use crate::dialect::Dialect;
use crate::error::Result;

fn translate_pair(sql: &str, from: Dialect, to: Dialect) -> Result<String> {
    Translator::new(from, to).translate(sql)
}

pub fn mysql_to_postgresql(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::MySql, Dialect::Postgres)
}

pub fn postgresql_to_mysql(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::Postgres, Dialect::MySql)
}

pub fn mysql_to_sqlite(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::MySql, Dialect::Sqlite)
}

pub fn sqlite_to_mysql(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::Sqlite, Dialect::MySql)
}

pub fn mysql_to_sqlserver(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::MySql, Dialect::SqlServer)
}

pub fn sqlserver_to_mysql(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::SqlServer, Dialect::MySql)
}

pub fn postgresql_to_sqlite(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::Postgres, Dialect::Sqlite)
}

pub fn sqlite_to_postgresql(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::Sqlite, Dialect::Postgres)
}

pub fn postgresql_to_sqlserver(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::Postgres, Dialect::SqlServer)
}

pub fn sqlserver_to_postgresql(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::SqlServer, Dialect::Postgres)
}

pub fn sqlite_to_sqlserver(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::Sqlite, Dialect::SqlServer)
}

pub fn sqlserver_to_sqlite(sql: &str) -> Result<String> {
    translate_pair(sql, Dialect::SqlServer, Dialect::Sqlite)
}

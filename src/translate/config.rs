//! YAML configuration for batch translation.
//!
//! ```yaml
//! from: mysql
//! to: postgres
//! strict: false
//! mysql_table_options: "ENGINE=InnoDB"
//! type_overrides:
//!   MEDIUMTEXT: "VARCHAR(4000)"
//! ```

use super::TranslateOptions;
use crate::dialect::Dialect;
use ahash::AHashMap;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Settings loaded from a `--config` file; CLI flags take precedence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Source dialect name (any alias accepted by `normalize_dialect`)
    pub from: Option<String>,
    /// Target dialect name
    pub to: Option<String>,
    pub strict: bool,
    pub mysql_table_options: Option<String>,
    /// Source type name -> target type
    pub type_overrides: HashMap<String, String>,
}

impl TranslateConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: TranslateConfig = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn from_dialect(&self) -> anyhow::Result<Option<Dialect>> {
        Ok(self.from.as_deref().map(str::parse::<Dialect>).transpose()?)
    }

    pub fn to_dialect(&self) -> anyhow::Result<Option<Dialect>> {
        Ok(self.to.as_deref().map(str::parse::<Dialect>).transpose()?)
    }

    pub fn to_options(&self) -> TranslateOptions {
        let overrides: AHashMap<String, String> = self
            .type_overrides
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut options = TranslateOptions::default()
            .with_strict(self.strict)
            .with_type_overrides(overrides);
        if let Some(table_options) = &self.mysql_table_options {
            options = options.with_mysql_table_options(table_options.as_str());
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
from: mysql
to: pg
strict: true
mysql_table_options: ""
type_overrides:
  MEDIUMTEXT: "VARCHAR(4000)"
"#;
        let config: TranslateConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.from_dialect().unwrap(), Some(Dialect::MySql));
        assert_eq!(config.to_dialect().unwrap(), Some(Dialect::Postgres));

        let options = config.to_options();
        assert!(options.strict);
        assert_eq!(options.mysql_table_options.as_deref(), Some(""));
        assert_eq!(
            options.type_overrides.get("MEDIUMTEXT").map(String::as_str),
            Some("VARCHAR(4000)")
        );
    }

    #[test]
    fn test_defaults_when_empty() {
        let config: TranslateConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert!(config.from_dialect().unwrap().is_none());
        assert!(!config.strict);
        assert!(config.to_options().mysql_table_options.is_none());
    }

    #[test]
    fn test_unknown_dialect_is_error() {
        let config: TranslateConfig = serde_yaml_ng::from_str("to: oracle").unwrap();
        let err = config.to_dialect().unwrap_err();
        assert!(err.to_string().contains("oracle"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "from: sqlite\nto: mssql").unwrap();
        let config = TranslateConfig::load(file.path()).unwrap();
        assert_eq!(config.to_dialect().unwrap(), Some(Dialect::SqlServer));
    }
}

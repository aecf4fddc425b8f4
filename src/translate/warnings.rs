//! Warnings raised while translating.
//!
//! Tracks features the target dialect cannot express, lossy type
//! conversions and statements that were skipped.

/// Warning types that can occur during translation
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateWarning {
    /// Feature not expressible in the target dialect
    UnsupportedFeature {
        feature: String,
        suggestion: Option<String>,
    },
    /// Type conversion may lose precision or constraints
    LossyConversion {
        from_type: String,
        to_type: String,
        table: Option<String>,
        column: Option<String>,
    },
    /// Statement was skipped
    SkippedStatement {
        reason: String,
        statement_preview: String,
    },
}

impl TranslateWarning {
    pub fn unsupported(feature: impl Into<String>, suggestion: Option<&str>) -> Self {
        TranslateWarning::UnsupportedFeature {
            feature: feature.into(),
            suggestion: suggestion.map(str::to_string),
        }
    }

    pub fn skipped(reason: impl Into<String>, statement: &str) -> Self {
        TranslateWarning::SkippedStatement {
            reason: reason.into(),
            statement_preview: preview(statement),
        }
    }
}

/// First line of a statement, cut to 60 chars
fn preview(statement: &str) -> String {
    let line = statement.trim().lines().next().unwrap_or("");
    if line.chars().count() > 60 {
        let cut: String = line.chars().take(57).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}

impl std::fmt::Display for TranslateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateWarning::UnsupportedFeature {
                feature,
                suggestion,
            } => {
                write!(f, "Unsupported feature: {}", feature)?;
                if let Some(s) = suggestion {
                    write!(f, " ({})", s)?;
                }
                Ok(())
            }
            TranslateWarning::LossyConversion {
                from_type,
                to_type,
                table,
                column,
            } => {
                write!(f, "Lossy conversion: {} → {}", from_type, to_type)?;
                if let Some(t) = table {
                    write!(f, " in table {}", t)?;
                    if let Some(c) = column {
                        write!(f, ".{}", c)?;
                    }
                }
                Ok(())
            }
            TranslateWarning::SkippedStatement {
                reason,
                statement_preview,
            } => {
                write!(f, "Skipped: {} ({})", reason, statement_preview)
            }
        }
    }
}

/// Collects warnings during translation, deduplicated and capped
#[derive(Debug)]
pub struct WarningCollector {
    warnings: Vec<TranslateWarning>,
    max_warnings: usize,
    truncated: bool,
}

impl Default for WarningCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::with_limit(100)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            warnings: Vec::new(),
            max_warnings: limit,
            truncated: false,
        }
    }

    pub fn add(&mut self, warning: TranslateWarning) {
        if self.warnings.iter().any(|w| Self::is_similar(w, &warning)) {
            return;
        }
        if self.warnings.len() < self.max_warnings {
            self.warnings.push(warning);
        } else {
            self.truncated = true;
        }
    }

    pub fn extend(&mut self, warnings: impl IntoIterator<Item = TranslateWarning>) {
        for w in warnings {
            self.add(w);
        }
    }

    /// Check if two warnings are similar enough to deduplicate
    fn is_similar(a: &TranslateWarning, b: &TranslateWarning) -> bool {
        match (a, b) {
            (
                TranslateWarning::UnsupportedFeature { feature: f1, .. },
                TranslateWarning::UnsupportedFeature { feature: f2, .. },
            ) => f1 == f2,
            (
                TranslateWarning::LossyConversion {
                    from_type: f1,
                    to_type: t1,
                    ..
                },
                TranslateWarning::LossyConversion {
                    from_type: f2,
                    to_type: t2,
                    ..
                },
            ) => f1 == f2 && t1 == t2,
            _ => false,
        }
    }

    pub fn warnings(&self) -> &[TranslateWarning] {
        &self.warnings
    }

    pub fn take(&mut self) -> Vec<TranslateWarning> {
        self.truncated = false;
        std::mem::take(&mut self.warnings)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn count(&self) -> usize {
        self.warnings.len()
    }

    /// Print summary of warnings
    pub fn print_summary(&self) {
        if self.warnings.is_empty() {
            return;
        }

        eprintln!("\nTranslation warnings ({}):", self.warnings.len());
        for warning in &self.warnings {
            eprintln!("  ⚠ {}", warning);
        }

        if self.truncated {
            eprintln!("  ... (additional warnings truncated)");
        }
    }
}

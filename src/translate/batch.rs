//! Translate every `CREATE TABLE` in a SQL script.

use super::{TranslateOptions, TranslateWarning, Translator, WarningCollector};
use crate::dialect::Dialect;
use crate::parser::{determine_buffer_size, skip_leading_comments, Parser, StatementType};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Configuration for a batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Input SQL file
    pub input: PathBuf,
    /// Output SQL file (None for stdout)
    pub output: Option<PathBuf>,
    pub from: Dialect,
    pub to: Dialect,
    pub options: TranslateOptions,
    /// Parse and translate but write nothing
    pub dry_run: bool,
    pub progress: bool,
    /// Abort on the first statement that fails to translate
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            from: Dialect::MySql,
            to: Dialect::Postgres,
            options: TranslateOptions::default(),
            dry_run: false,
            progress: false,
            fail_fast: false,
        }
    }
}

/// Statistics from a batch run
#[derive(Debug, Default)]
pub struct TranslateStats {
    /// Statements read from the input
    pub statements_processed: u64,
    /// `CREATE TABLE` statements written to the output
    pub statements_translated: u64,
    /// Statements that are not `CREATE TABLE`
    pub statements_skipped: u64,
    /// `CREATE TABLE` statements that failed to translate
    pub statements_failed: u64,
    pub warnings: Vec<TranslateWarning>,
}

impl TranslateStats {
    pub fn print_summary(&self) {
        eprintln!(
            "Translated {} of {} statements ({} skipped, {} failed)",
            self.statements_translated,
            self.statements_processed,
            self.statements_skipped,
            self.statements_failed
        );
    }
}

/// Run a batch translation.
///
/// Only `CREATE TABLE` statements are translated; everything else is left
/// out of the output and recorded as a skipped-statement warning.
pub fn run(config: BatchConfig) -> anyhow::Result<TranslateStats> {
    let mut stats = TranslateStats::default();
    let strict = config.options.strict;

    let progress_bar = if config.progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Translating...");
        Some(pb)
    } else {
        None
    };

    let mut translator = Translator::new(config.from, config.to).with_options(config.options);
    let mut collector = WarningCollector::new();

    let file = File::open(&config.input)?;
    let buffer_size = determine_buffer_size(file.metadata()?.len());
    let mut parser = Parser::with_dialect(file, buffer_size, config.from);

    let mut writer: Box<dyn Write> = if config.dry_run {
        Box::new(std::io::sink())
    } else {
        match &config.output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                Box::new(BufWriter::with_capacity(256 * 1024, File::create(path)?))
            }
            None => Box::new(BufWriter::new(std::io::stdout())),
        }
    };

    while let Some(raw) = parser.read_statement()? {
        let body = skip_leading_comments(&raw);
        if body.iter().all(|b| b.is_ascii_whitespace() || *b == b';') {
            continue;
        }
        stats.statements_processed += 1;

        if let Some(ref pb) = progress_bar {
            if stats.statements_processed % 100 == 0 {
                pb.set_message(format!(
                    "Processed {} statements...",
                    stats.statements_processed
                ));
            }
        }

        let sql = String::from_utf8_lossy(body);
        let (stmt_type, _) = Parser::<&[u8]>::parse_statement(body);
        if stmt_type != StatementType::CreateTable {
            stats.statements_skipped += 1;
            collector.add(TranslateWarning::skipped(
                format!("{} is not translated", stmt_type.label()),
                &sql,
            ));
            continue;
        }

        match translator.translate(&sql) {
            Ok(out) => {
                stats.statements_translated += 1;
                writer.write_all(out.as_bytes())?;
                writer.write_all(b"\n\n")?;
            }
            Err(e) => {
                if config.fail_fast || strict {
                    if let Some(pb) = progress_bar {
                        pb.abandon();
                    }
                    return Err(anyhow::anyhow!(
                        "statement {}: {}",
                        stats.statements_processed,
                        e
                    ));
                }
                stats.statements_failed += 1;
                collector.add(TranslateWarning::skipped(e.to_string(), &sql));
            }
        }
    }

    writer.flush()?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!(
            "Translated {} statements",
            stats.statements_translated
        ));
    }

    collector.extend(translator.take_warnings());
    stats.warnings = collector.take();
    Ok(stats)
}

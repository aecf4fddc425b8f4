//! Translate command CLI handler.

use sql_translator::translate::{self, BatchConfig, TranslateConfig, TranslateStats};
use sql_translator::{Dialect, TranslateOptions};
use std::path::PathBuf;

use super::glob_util::{expand_inputs, output_path, FileOutcomes};

pub struct TranslateArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub config: Option<PathBuf>,
    pub mysql_table_options: Option<String>,
    pub strict: bool,
    pub progress: bool,
    pub dry_run: bool,
    pub fail_fast: bool,
}

/// Dialects and options after merging the config file with CLI flags
struct Settings {
    from: Dialect,
    to: Dialect,
    options: TranslateOptions,
}

fn resolve(args: &TranslateArgs) -> anyhow::Result<Settings> {
    let config = match &args.config {
        Some(path) => TranslateConfig::load(path)?,
        None => TranslateConfig::default(),
    };

    let from = match &args.from {
        Some(d) => d.parse::<Dialect>()?,
        None => config
            .from_dialect()?
            .ok_or_else(|| anyhow::anyhow!("source dialect required: use --from or set `from` in --config"))?,
    };
    let to = match &args.to {
        Some(d) => d.parse::<Dialect>()?,
        None => config
            .to_dialect()?
            .ok_or_else(|| anyhow::anyhow!("target dialect required: use --to or set `to` in --config"))?,
    };
    translate::route(from, to)?;

    let mut options = config.to_options();
    if args.strict {
        options = options.with_strict(true);
    }
    if let Some(table_options) = &args.mysql_table_options {
        options = options.with_mysql_table_options(table_options.as_str());
    }

    Ok(Settings { from, to, options })
}

pub fn run(args: TranslateArgs) -> anyhow::Result<()> {
    let settings = resolve(&args)?;
    let inputs = expand_inputs(&args.file)?;

    if inputs.is_single() {
        let file = inputs.files.into_iter().next();
        match file {
            Some(file) => run_single(file, &args, settings),
            None => Ok(()),
        }
    } else {
        let output_dir = match &args.output {
            Some(dir) => dir.clone(),
            None => {
                anyhow::bail!(
                    "Output directory required when using glob patterns. Use --output <dir>"
                );
            }
        };
        run_multi(inputs.files, output_dir, &args, settings)
    }
}

fn run_single(file: PathBuf, args: &TranslateArgs, settings: Settings) -> anyhow::Result<()> {
    let strict = settings.options.strict;
    let config = BatchConfig {
        input: file,
        output: args.output.clone(),
        from: settings.from,
        to: settings.to,
        options: settings.options,
        dry_run: args.dry_run,
        progress: args.progress,
        fail_fast: args.fail_fast,
    };

    let stats = translate::run(config)?;
    print_stats(&stats, args.dry_run, args.progress);

    if strict && !stats.warnings.is_empty() {
        anyhow::bail!("Strict mode: {} warnings generated", stats.warnings.len());
    }
    Ok(())
}

fn run_multi(
    files: Vec<PathBuf>,
    output_dir: PathBuf,
    args: &TranslateArgs,
    settings: Settings,
) -> anyhow::Result<()> {
    let total = files.len();
    let strict = settings.options.strict;
    let mut outcomes = FileOutcomes::default();

    if !args.dry_run {
        std::fs::create_dir_all(&output_dir)?;
    }

    eprintln!(
        "Translating {} files from {} to {}...\n",
        total, settings.from, settings.to
    );

    for (idx, file) in files.iter().enumerate() {
        eprintln!("[{}/{}] Translating: {}", idx + 1, total, file.display());

        let output = (!args.dry_run).then(|| output_path(&output_dir, file, idx));
        let config = BatchConfig {
            input: file.clone(),
            output: output.clone(),
            from: settings.from,
            to: settings.to,
            options: settings.options.clone(),
            dry_run: args.dry_run,
            progress: false,
            fail_fast: args.fail_fast,
        };

        match translate::run(config) {
            Ok(stats) => {
                let warning_str = if stats.warnings.is_empty() {
                    String::new()
                } else {
                    format!(" ({} warnings)", stats.warnings.len())
                };
                eprintln!(
                    "  {} translated, {} skipped, {} failed{}",
                    stats.statements_translated,
                    stats.statements_skipped,
                    stats.statements_failed,
                    warning_str
                );
                if let Some(out) = output {
                    eprintln!("  → {}", out.display());
                }
                eprintln!();

                if strict && !stats.warnings.is_empty() {
                    outcomes.failure(
                        file,
                        format!("{} warnings in strict mode", stats.warnings.len()),
                    );
                    if args.fail_fast {
                        break;
                    }
                } else {
                    outcomes.success();
                }
            }
            Err(e) => {
                eprintln!("  Error: {}\n", e);
                outcomes.failure(file, &e);
                if args.fail_fast {
                    break;
                }
            }
        }
    }

    eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    eprintln!("Translation Summary:");
    eprintln!("  Total files: {}", total);
    eprintln!("  Succeeded: {}", outcomes.succeeded);
    eprintln!("  Failed: {}", outcomes.failed.len());

    if outcomes.has_failures() {
        eprintln!();
        eprintln!("Failed files:");
        for (path, error) in &outcomes.failed {
            eprintln!("  - {}: {}", path.display(), error);
        }
        anyhow::bail!("{} of {} files failed", outcomes.failed.len(), total);
    }

    Ok(())
}

fn print_stats(stats: &TranslateStats, dry_run: bool, progress: bool) {
    if progress || dry_run {
        eprintln!();
        eprintln!("Translation Statistics:");
        eprintln!("  Statements processed: {}", stats.statements_processed);
        eprintln!("  Statements translated: {}", stats.statements_translated);
        eprintln!("  Statements skipped: {}", stats.statements_skipped);
        eprintln!("  Statements failed: {}", stats.statements_failed);
    }

    if !stats.warnings.is_empty() {
        eprintln!();
        eprintln!("Warnings ({}):", stats.warnings.len());
        for warning in &stats.warnings {
            eprintln!("  ⚠ {}", warning);
        }
    }

    if dry_run {
        eprintln!();
        eprintln!("(Dry run - no output written)");
    }
}

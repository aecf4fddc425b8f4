mod field_type;
mod glob_util;
mod literal;
mod translate;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-translator")]
#[command(author = "Helge Sverre <helge.sverre@gmail.com>")]
#[command(version)]
#[command(
    about = "Translate CREATE TABLE statements between MySQL, PostgreSQL, SQLite and SQL Server",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate every CREATE TABLE statement in a SQL file
    Translate {
        /// Input SQL file or glob pattern (e.g., *.sql, schema/**/*.sql)
        file: PathBuf,

        /// Output SQL file or directory (default: stdout for single file, required for glob)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source dialect: mysql, postgresql, sqlite, sqlserver (or an alias)
        #[arg(long)]
        from: Option<String>,

        /// Target dialect: mysql, postgresql, sqlite, sqlserver (or an alias)
        #[arg(long)]
        to: Option<String>,

        /// YAML config with dialects, type overrides and table options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Table options appended to MySQL output ("" drops them)
        #[arg(long)]
        mysql_table_options: Option<String>,

        /// Strict mode: fail on any warning
        #[arg(long)]
        strict: bool,

        /// Show progress during translation
        #[arg(short, long)]
        progress: bool,

        /// Translate without writing output (dry run)
        #[arg(long)]
        dry_run: bool,

        /// Stop on the first statement or file that fails
        #[arg(long)]
        fail_fast: bool,
    },

    /// Translate a single column type
    Type {
        /// Column type, e.g. "varchar(255)" or "int unsigned"
        field_type: String,

        /// Source dialect
        #[arg(long)]
        from: String,

        /// Target dialect
        #[arg(long)]
        to: String,
    },

    /// Render a value as an SQL literal for a column type
    Literal {
        /// Raw value (omit together with --null for NULL)
        value: Option<String>,

        /// SQL column type of the value
        #[arg(long = "type")]
        sql_type: String,

        /// Read and write the value as this dialect does
        #[arg(long)]
        dialect: Option<String>,

        /// Treat the value as NULL
        #[arg(long)]
        null: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Translate {
            file,
            output,
            from,
            to,
            config,
            mysql_table_options,
            strict,
            progress,
            dry_run,
            fail_fast,
        } => translate::run(translate::TranslateArgs {
            file,
            output,
            from,
            to,
            config,
            mysql_table_options,
            strict,
            progress,
            dry_run,
            fail_fast,
        }),
        Commands::Type {
            field_type,
            from,
            to,
        } => field_type::run(&field_type, &from, &to),
        Commands::Literal {
            value,
            sql_type,
            dialect,
            null,
        } => literal::run(value, &sql_type, dialect.as_deref(), null),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "sql-translator",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

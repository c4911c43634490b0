//! Top-level CLI definition and dispatch.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::control;
use serde_json::{Value, json};
use thiserror::Error;

use entry_expiration::core::config::Config;
use entry_expiration::core::errors::CleanError;
use entry_expiration::expiration::cleaner::{self, RunOutcome};
use entry_expiration::expiration::cutoff::resolve_cutoff;
use entry_expiration::report::console::{ConsoleReporter, Verbosity};
use entry_expiration::report::{NullReporter, Reporter};
use entry_expiration::store::sqlite::SqliteEntryStore;

/// Delete stored form entries older than a relative age.
#[derive(Debug, Parser)]
#[command(
    name = "clean-entries",
    author,
    version,
    about = "Delete form entries older than a given age",
    long_about = None,
    after_help = "Examples:\n  clean-entries 6months\n  clean-entries 6months --dry-run\n  clean-entries \"1 year 2 weeks\" --database /srv/site/wordpress.sqlite3"
)]
pub struct Cli {
    /// How long entries are kept, e.g. "6months", "1year", "90days".
    #[arg(value_name = "DURATION")]
    duration: Option<String>,
    /// Show how many entries would be deleted without deleting them.
    #[arg(long)]
    dry_run: bool,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// SQLite database holding the entries table.
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,
    /// Table prefix, e.g. "wp_".
    #[arg(long, value_name = "PREFIX")]
    table_prefix: Option<String>,
    /// Print the outcome as one JSON object.
    #[arg(long)]
    json: bool,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
    /// Also print debug lines.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (errors only).
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input or configuration.
    #[error("{0}")]
    User(String),
    /// Record store or environment failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<CleanError> for CliError {
    fn from(err: CleanError) -> Self {
        if err.is_user_error() {
            Self::User(err.to_string())
        } else if matches!(err, CleanError::Serialization { .. }) {
            Self::Internal(err.to_string())
        } else {
            Self::Runtime(err.to_string())
        }
    }
}

/// Load configuration, open the store, and run one cleaning pass.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    let mode = output_mode(cli);
    let mut console = ConsoleReporter::new(verbosity(cli));
    let mut silent = NullReporter;
    let reporter: &mut dyn Reporter = match mode {
        OutputMode::Human => &mut console,
        OutputMode::Json => &mut silent,
    };

    let mut config = Config::load(cli.config.as_deref())?;
    apply_cli_overrides(&mut config, cli)?;

    // Refuse a bad duration before the database is opened.
    let duration = cli.duration.as_deref().unwrap_or_default();
    resolve_cutoff(duration, config.clock.timezone.now())?;

    reporter.debug(&format!("config file: {}", config.config_file.display()));
    reporter.debug(&format!("timezone: {}", config.clock.timezone.label()));

    let mut store = SqliteEntryStore::from_config(&config)?;
    if let Some(path) = store.path() {
        reporter.debug(&format!("database: {}", path.display()));
    }
    reporter.debug(&format!("table: {}", store.table()));

    let outcome = cleaner::run(
        duration,
        cli.dry_run,
        config.clock.timezone,
        &mut store,
        reporter,
    )?;

    if mode == OutputMode::Json {
        write_json_line(&outcome_payload(&outcome, cli.dry_run, store.table())?)?;
    }
    Ok(())
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) -> Result<(), CliError> {
    if let Some(path) = &cli.database {
        config.database.path = Some(path.clone());
    }
    if let Some(prefix) = &cli.table_prefix {
        config.entries.table_prefix = prefix.trim().to_string();
    }
    config.validate()?;
    Ok(())
}

fn outcome_payload(outcome: &RunOutcome, dry_run: bool, table: &str) -> Result<Value, CliError> {
    let mut payload = serde_json::to_value(outcome)?;
    if let Value::Object(map) = &mut payload {
        map.insert("command".to_string(), json!("clean-entries"));
        map.insert("dry_run".to_string(), json!(dry_run));
        map.insert("table".to_string(), json!(table));
    }
    Ok(payload)
}

const fn verbosity(cli: &Cli) -> Verbosity {
    if cli.quiet {
        Verbosity::Quiet
    } else if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("CLEAN_ENTRIES_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        _ => OutputMode::Human,
    }
}

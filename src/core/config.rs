//! Configuration system: TOML file + env var overrides + defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime, Timelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::errors::{CleanError, Result};
use crate::core::paths::resolve_config_path;

static SQL_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Full cleaner configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub entries: EntriesConfig,
    pub clock: ClockConfig,
    /// Where this config was loaded from (not serialized).
    #[serde(skip)]
    pub config_file: PathBuf,
}

/// Location of the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file. Must be set by file, env, or `--database`.
    pub path: Option<PathBuf>,
    /// How long to wait on a locked database before failing.
    pub busy_timeout_ms: u64,
}

/// Table and column holding the form entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EntriesConfig {
    pub table_prefix: String,
    pub table: String,
    pub date_column: String,
}

/// Which wall clock the `date` column is written in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ClockConfig {
    pub timezone: TimeZoneMode,
}

/// Time zone used to read "now" before subtracting the duration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneMode {
    #[default]
    Utc,
    Local,
}

impl TimeZoneMode {
    /// Current wall-clock time in this zone, truncated to whole seconds.
    #[must_use]
    pub fn now(self) -> NaiveDateTime {
        let now = match self {
            Self::Utc => Utc::now().naive_utc(),
            Self::Local => Local::now().naive_local(),
        };
        now.with_nanosecond(0).unwrap_or(now)
    }

    fn parse(name: &str, raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            other => Err(CleanError::ConfigParse {
                context: "env",
                details: format!("{name}={other:?}: expected \"utc\" or \"local\""),
            }),
        }
    }

    /// Label used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Utc => "utc",
            Self::Local => "local",
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: 5_000,
        }
    }
}

impl Default for EntriesConfig {
    fn default() -> Self {
        Self {
            table_prefix: "wp_".to_string(),
            table: "wpforms_entries".to_string(),
            date_column: "date".to_string(),
        }
    }
}

impl EntriesConfig {
    /// Table name with prefix applied, e.g. `wp_wpforms_entries`.
    #[must_use]
    pub fn qualified_table(&self) -> String {
        format!("{}{}", self.table_prefix, self.table)
    }

    /// Reject anything that cannot be safely spliced into SQL as an identifier.
    pub fn validate(&self) -> Result<()> {
        let table = self.qualified_table();
        if !SQL_IDENTIFIER.is_match(&table) {
            return Err(CleanError::InvalidConfig {
                details: format!(
                    "entries table {table:?} must match [A-Za-z_][A-Za-z0-9_]*"
                ),
            });
        }
        if !SQL_IDENTIFIER.is_match(&self.date_column) {
            return Err(CleanError::InvalidConfig {
                details: format!(
                    "entries.date_column {:?} must match [A-Za-z_][A-Za-z0-9_]*",
                    self.date_column
                ),
            });
        }
        Ok(())
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[CLN-CONFIG] WARNING: HOME not set, falling back to /tmp for config path"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        home_dir
            .join(".config")
            .join("clean-entries")
            .join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, env_var)
    }

    /// Same as [`Config::load`] with an injectable environment lookup.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| CleanError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(CleanError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.config_file = path_buf;
        cfg.apply_env_overrides_from(lookup)?;
        cfg.normalize_paths();
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("CLEAN_ENTRIES_DB_PATH") {
            self.database.path = Some(PathBuf::from(raw));
        }
        if let Some(raw) = lookup("CLEAN_ENTRIES_BUSY_TIMEOUT_MS") {
            self.database.busy_timeout_ms = parse_env_u64("CLEAN_ENTRIES_BUSY_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("CLEAN_ENTRIES_TABLE_PREFIX") {
            self.entries.table_prefix = raw;
        }
        if let Some(raw) = lookup("CLEAN_ENTRIES_TABLE") {
            self.entries.table = raw;
        }
        if let Some(raw) = lookup("CLEAN_ENTRIES_DATE_COLUMN") {
            self.entries.date_column = raw;
        }
        if let Some(raw) = lookup("CLEAN_ENTRIES_TIMEZONE") {
            self.clock.timezone = TimeZoneMode::parse("CLEAN_ENTRIES_TIMEZONE", &raw)?;
        }
        Ok(())
    }

    fn normalize_paths(&mut self) {
        if let Some(path) = self.database.path.take() {
            self.database.path = Some(resolve_config_path(&path, &self.config_file));
        }
        self.entries.table_prefix = self.entries.table_prefix.trim().to_string();
        self.entries.table = self.entries.table.trim().to_string();
        self.entries.date_column = self.entries.date_column.trim().to_string();
    }

    /// Check invariants that do not depend on the database being reachable.
    pub fn validate(&self) -> Result<()> {
        self.entries.validate()?;

        if self.database.busy_timeout_ms > 600_000 {
            return Err(CleanError::InvalidConfig {
                details: format!(
                    "database.busy_timeout_ms must be <= 600000, got {}",
                    self.database.busy_timeout_ms
                ),
            });
        }

        Ok(())
    }

    /// The configured database path, or an error telling the operator how to set one.
    pub fn require_database_path(&self) -> Result<&Path> {
        self.database
            .path
            .as_deref()
            .ok_or_else(|| CleanError::InvalidConfig {
                details: "no database configured; set database.path, CLEAN_ENTRIES_DB_PATH, or --database"
                    .to_string(),
            })
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_u64(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|error| CleanError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

//! SQLite-backed entry store over a WPForms-style `<prefix>wpforms_entries` table.
//!
//! The database belongs to the host application: it is opened read-write but
//! never created, and no schema is applied.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use crate::core::config::{Config, EntriesConfig};
use crate::core::errors::{CleanError, Result};
use crate::expiration::cutoff::Cutoff;
use crate::store::EntryStore;

/// Entry store on an existing SQLite database.
pub struct SqliteEntryStore {
    conn: Connection,
    path: Option<PathBuf>,
    table: String,
    count_sql: String,
    delete_sql: String,
}

impl SqliteEntryStore {
    /// Open the database configured in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = config.require_database_path()?;
        Self::open(
            path,
            &config.entries,
            Duration::from_millis(config.database.busy_timeout_ms),
        )
    }

    /// Open an existing database file at `path`.
    pub fn open(path: &Path, entries: &EntriesConfig, busy_timeout: Duration) -> Result<Self> {
        if !path.is_file() {
            return Err(CleanError::Store {
                context: "open",
                details: format!("database file {} does not exist", path.display()),
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(busy_timeout)?;

        let mut store = Self::from_connection(conn, entries)?;
        store.path = Some(path.to_path_buf());
        Ok(store)
    }

    /// Wrap an already open connection (in-memory databases, host-managed handles).
    pub fn from_connection(conn: Connection, entries: &EntriesConfig) -> Result<Self> {
        entries.validate()?;
        let table = entries.qualified_table();
        let column = &entries.date_column;

        ensure_table(&conn, &table, column)?;

        Ok(Self {
            count_sql: format!("SELECT COUNT(*) FROM \"{table}\" WHERE \"{column}\" < ?1"),
            delete_sql: format!("DELETE FROM \"{table}\" WHERE \"{column}\" < ?1"),
            conn,
            path: None,
            table,
        })
    }

    /// Path to the database file, when opened from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Fully qualified table name this store works on.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Borrow the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl EntryStore for SqliteEntryStore {
    fn count_before(&self, cutoff: &Cutoff) -> Result<u64> {
        let count: i64 = self
            .conn
            .prepare_cached(&self.count_sql)?
            .query_row(params![cutoff.to_sql_string()], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| CleanError::Store {
            context: "count",
            details: format!("negative row count {count}"),
        })
    }

    fn delete_before(&mut self, cutoff: &Cutoff) -> Result<u64> {
        let deleted = self
            .conn
            .prepare_cached(&self.delete_sql)?
            .execute(params![cutoff.to_sql_string()])?;
        Ok(deleted as u64)
    }
}

fn ensure_table(conn: &Connection, table: &str, column: &str) -> Result<()> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )
        .optional()?;
    if found.is_none() {
        return Err(CleanError::Store {
            context: "schema",
            details: format!("table {table} not found"),
        });
    }

    let has_column = conn
        .prepare(&format!("PRAGMA table_info(\"{table}\")"))?
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?
        .iter()
        .any(|name| name.eq_ignore_ascii_case(column));
    if !has_column {
        return Err(CleanError::Store {
            context: "schema",
            details: format!("table {table} has no column {column}"),
        });
    }
    Ok(())
}

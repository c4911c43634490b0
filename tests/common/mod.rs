#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, params};

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_clean-entries") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) {
        "clean-entries.exe"
    } else {
        "clean-entries"
    };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve clean-entries binary path for integration test"),
    }
}

/// Run the binary with an isolated HOME and no inherited `CLEAN_ENTRIES_*` settings.
pub fn run_cli_case(case_name: &str, args: &[&str], envs: &[(&str, &str)]) -> CmdResult {
    let root = std::env::temp_dir().join("clean-entries-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");
    let home = tempfile::tempdir().expect("create isolated HOME");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let mut command = Command::new(&bin_path);
    command
        .args(args)
        .env("HOME", home.path())
        .env("RUST_BACKTRACE", "1")
        .env("NO_COLOR", "1");
    for name in [
        "CLEAN_ENTRIES_DB_PATH",
        "CLEAN_ENTRIES_BUSY_TIMEOUT_MS",
        "CLEAN_ENTRIES_TABLE_PREFIX",
        "CLEAN_ENTRIES_TABLE",
        "CLEAN_ENTRIES_DATE_COLUMN",
        "CLEAN_ENTRIES_TIMEZONE",
        "CLEAN_ENTRIES_OUTPUT_FORMAT",
    ] {
        command.env_remove(name);
    }
    for (name, value) in envs {
        command.env(name, value);
    }
    let output = command.output().expect("execute clean-entries command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("envs={envs:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

/// Create `<prefix>wpforms_entries` in a fresh database file and insert one row per date.
pub fn entries_db(dir: &Path, prefix: &str, dates: &[&str]) -> PathBuf {
    let path = dir.join("site.sqlite3");
    let conn = Connection::open(&path).expect("create test database");
    conn.execute_batch(&format!(
        "CREATE TABLE {prefix}wpforms_entries (
            entry_id INTEGER PRIMARY KEY AUTOINCREMENT,
            form_id INTEGER NOT NULL,
            fields TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL
        );"
    ))
    .expect("create entries table");
    for date in dates {
        conn.execute(
            &format!("INSERT INTO {prefix}wpforms_entries (form_id, date) VALUES (7, ?1)"),
            params![date],
        )
        .expect("insert entry");
    }
    path
}

/// Number of rows left in `<prefix>wpforms_entries`.
pub fn remaining(path: &Path, prefix: &str) -> i64 {
    let conn = Connection::open(path).expect("reopen test database");
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {prefix}wpforms_entries"),
        [],
        |row| row.get(0),
    )
    .expect("count remaining entries")
}

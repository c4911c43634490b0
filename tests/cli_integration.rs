//! CLI smoke tests: the `clean-entries` binary against throwaway SQLite databases.

mod common;

use serde_json::Value;

const OLD: &str = "2001-01-01 00:00:00";
const OLDER: &str = "1999-06-30 23:59:59";
const FUTURE: &str = "2999-01-01 00:00:00";

#[test]
fn help_prints_usage() {
    let result = common::run_cli_case("help_prints_usage", &["--help"], &[]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("Usage: clean-entries [OPTIONS] [DURATION]"),
        "missing help banner; log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.contains("--dry-run"));
}

#[test]
fn version_prints_version() {
    let result = common::run_cli_case("version_prints_version", &["--version"], &[]);
    assert!(result.status.success());
    assert!(
        result.stdout.contains(env!("CARGO_PKG_VERSION")),
        "missing version; log: {}",
        result.log_path.display()
    );
}

#[test]
fn deletes_expired_entries() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::entries_db(dir.path(), "wp_", &[OLD, OLDER, OLD, FUTURE]);
    let db_arg = db.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "deletes_expired_entries",
        &["6months", "--database", &db_arg],
        &[],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result
            .stdout
            .contains("Start the cleaning process for entries before: "),
        "missing start line; log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.contains("Success: 3 entries deleted"));
    assert!(result.stdout.contains("Success: End cleaning expired entries"));
    assert_eq!(common::remaining(&db, "wp_"), 1);
}

#[test]
fn dry_run_keeps_entries() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::entries_db(dir.path(), "wp_", &[OLD, OLD, OLD, OLD, OLD, FUTURE]);
    let db_arg = db.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "dry_run_keeps_entries",
        &["6months", "--dry-run", "--database", &db_arg],
        &[],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert!(
        result
            .stderr
            .contains("Warning: Dry run: 5 entries would be deleted."),
        "missing dry-run warning; log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.contains("Success: End cleaning expired entries"));
    assert_eq!(common::remaining(&db, "wp_"), 6);
}

#[test]
fn nothing_to_delete_warns_and_stops() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::entries_db(dir.path(), "wp_", &[FUTURE]);
    let db_arg = db.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "nothing_to_delete_warns_and_stops",
        &["90days", "--database", &db_arg],
        &[],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("Warning: No entries to delete."));
    assert!(!result.stdout.contains("End cleaning"));
    assert_eq!(common::remaining(&db, "wp_"), 1);
}

#[test]
fn second_run_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::entries_db(dir.path(), "wp_", &[OLD, OLDER]);
    let db_arg = db.to_string_lossy().to_string();

    let first = common::run_cli_case("second_run_first", &["1year", "--database", &db_arg], &[]);
    assert!(first.stdout.contains("2 entries deleted"));

    let second = common::run_cli_case("second_run_second", &["1year", "--database", &db_arg], &[]);
    assert!(second.status.success());
    assert!(
        second.stderr.contains("No entries to delete."),
        "log: {}",
        second.log_path.display()
    );
}

#[test]
fn empty_duration_is_user_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::entries_db(dir.path(), "wp_", &[OLD]);
    let db_arg = db.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "empty_duration_is_user_error",
        &["", "--database", &db_arg],
        &[],
    );
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("Error: [CLN-1101] Expired time is empty."));
    assert_eq!(common::remaining(&db, "wp_"), 1);
}

#[test]
fn missing_duration_is_user_error() {
    let result = common::run_cli_case("missing_duration_is_user_error", &[], &[]);
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("Expired time is empty"));
}

#[test]
fn unreadable_duration_is_user_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::entries_db(dir.path(), "wp_", &[OLD]);
    let db_arg = db.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "unreadable_duration_is_user_error",
        &["not-a-time", "--database", &db_arg],
        &[],
    );
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("Expired time is not readable"));
    assert_eq!(common::remaining(&db, "wp_"), 1);
}

#[test]
fn missing_database_config_is_user_error() {
    let result = common::run_cli_case("missing_database_config", &["6months"], &[]);
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("no database configured"));
}

#[test]
fn absent_database_file_is_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.sqlite3");
    let missing_arg = missing.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "absent_database_file_is_runtime_error",
        &["6months", "--database", &missing_arg],
        &[],
    );
    assert_eq!(result.status.code(), Some(2), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("CLN-2102"));
    assert!(!missing.exists());
}

#[test]
fn env_database_and_prefix_are_used() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::entries_db(dir.path(), "blog_", &[OLD, FUTURE]);
    let db_env = db.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "env_database_and_prefix_are_used",
        &["1year"],
        &[
            ("CLEAN_ENTRIES_DB_PATH", db_env.as_str()),
            ("CLEAN_ENTRIES_TABLE_PREFIX", "blog_"),
        ],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert!(result.stdout.contains("1 entries deleted"));
    assert_eq!(common::remaining(&db, "blog_"), 1);
}

#[test]
fn config_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::entries_db(dir.path(), "site_", &[OLD]);
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        "[database]\npath = \"site.sqlite3\"\n\n[entries]\ntable_prefix = \"site_\"\n",
    )
    .unwrap();
    let config_arg = config.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "config_file_is_read",
        &["30days", "--config", &config_arg, "--verbose"],
        &[],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("Debug: table: site_wpforms_entries"));
    assert_eq!(common::remaining(&db, "site_"), 0);
}

#[test]
fn json_output_describes_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::entries_db(dir.path(), "wp_", &[OLD, OLD, FUTURE]);
    let db_arg = db.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "json_output_describes_outcome",
        &["6months", "--dry-run", "--json", "--database", &db_arg],
        &[],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload: Value = serde_json::from_str(result.stdout.trim()).expect("one JSON object");
    assert_eq!(payload["command"], "clean-entries");
    assert_eq!(payload["status"], "dry_run");
    assert_eq!(payload["matched"], 2);
    assert_eq!(payload["dry_run"], true);
    assert!(result.stderr.is_empty(), "log: {}", result.log_path.display());
}

#[test]
fn quiet_mode_prints_nothing_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let db = common::entries_db(dir.path(), "wp_", &[OLD]);
    let db_arg = db.to_string_lossy().to_string();

    let result = common::run_cli_case(
        "quiet_mode_prints_nothing_on_success",
        &["6months", "-q", "--database", &db_arg],
        &[],
    );
    assert!(result.status.success());
    assert!(result.stdout.is_empty(), "log: {}", result.log_path.display());
    assert_eq!(common::remaining(&db, "wp_"), 0);
}

//! The cleaning run: resolve the cutoff, count, then report or delete.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::core::config::TimeZoneMode;
use crate::core::errors::Result;
use crate::expiration::cutoff::{Cutoff, resolve_cutoff};
use crate::report::Reporter;
use crate::store::EntryStore;

/// Completion line printed after a dry run or a deletion.
pub const COMPLETION_MESSAGE: &str = "End cleaning expired entries";

/// What a single run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// No entry was older than the cutoff; nothing was deleted.
    NothingToDelete { cutoff: Cutoff },
    /// Dry run: `matched` entries would have been deleted.
    DryRun { cutoff: Cutoff, matched: u64 },
    /// `deleted` is the delete statement's affected-row count, which may
    /// differ from `matched` if other writers touched the table in between.
    Deleted {
        cutoff: Cutoff,
        matched: u64,
        deleted: u64,
    },
}

impl RunOutcome {
    /// The cutoff this run used.
    pub const fn cutoff(&self) -> Cutoff {
        match self {
            Self::NothingToDelete { cutoff }
            | Self::DryRun { cutoff, .. }
            | Self::Deleted { cutoff, .. } => *cutoff,
        }
    }

    /// Rows actually removed.
    pub const fn deleted(&self) -> u64 {
        match self {
            Self::Deleted { deleted, .. } => *deleted,
            Self::NothingToDelete { .. } | Self::DryRun { .. } => 0,
        }
    }
}

/// Run against the current time in `timezone`.
pub fn run<S, R>(
    duration: &str,
    dry_run: bool,
    timezone: TimeZoneMode,
    store: &mut S,
    reporter: &mut R,
) -> Result<RunOutcome>
where
    S: EntryStore + ?Sized,
    R: Reporter + ?Sized,
{
    run_at(duration, dry_run, timezone.now(), store, reporter)
}

/// Run with an explicit "now".
///
/// An empty or unreadable `duration` fails before the store is touched.
pub fn run_at<S, R>(
    duration: &str,
    dry_run: bool,
    now: NaiveDateTime,
    store: &mut S,
    reporter: &mut R,
) -> Result<RunOutcome>
where
    S: EntryStore + ?Sized,
    R: Reporter + ?Sized,
{
    let cutoff = resolve_cutoff(duration, now)?;
    reporter.log(&format!(
        "Start the cleaning process for entries before: {cutoff}"
    ));

    let matched = store.count_before(&cutoff)?;
    reporter.debug(&format!("{matched} entries older than {cutoff}"));

    if matched == 0 {
        reporter.warning("No entries to delete.");
        return Ok(RunOutcome::NothingToDelete { cutoff });
    }

    let outcome = if dry_run {
        reporter.warning(&format!("Dry run: {matched} entries would be deleted."));
        RunOutcome::DryRun { cutoff, matched }
    } else {
        let deleted = store.delete_before(&cutoff)?;
        if deleted != matched {
            reporter.debug(&format!(
                "counted {matched} entries but the delete affected {deleted}"
            ));
        }
        reporter.success(&format!("{deleted} entries deleted"));
        RunOutcome::Deleted {
            cutoff,
            matched,
            deleted,
        }
    };

    reporter.success(COMPLETION_MESSAGE);
    Ok(outcome)
}

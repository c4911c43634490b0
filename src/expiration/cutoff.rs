//! The absolute point in time below which entries count as expired.

use std::fmt;

use chrono::{Datelike, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::core::errors::{CleanError, Result};
use crate::expiration::expression::{ExpressionError, RelativeSpan};

/// Text layout of the `date` column; sorts the same as the instants it encodes.
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shown to the operator when no duration was given.
pub const EMPTY_DURATION_MESSAGE: &str =
    "Expired time is empty. Please give an expired time. Ex: \"6months\", \"1year\", \"90days\".";

/// An absolute cutoff; entries with `date < cutoff` are expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cutoff(NaiveDateTime);

impl Cutoff {
    /// Wrap a wall-clock timestamp. Years outside `1..=9999` would not sort as text.
    pub fn new(at: NaiveDateTime) -> std::result::Result<Self, ExpressionError> {
        if (1..=9999).contains(&at.year()) {
            Ok(Self(at))
        } else {
            Err(ExpressionError::OutOfRange)
        }
    }

    /// The wall-clock instant.
    pub const fn at(&self) -> NaiveDateTime {
        self.0
    }

    /// Value bound to the `date < ?` parameter.
    pub fn to_sql_string(&self) -> String {
        self.0.format(SQL_DATETIME_FORMAT).to_string()
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SQL_DATETIME_FORMAT))
    }
}

impl Serialize for Cutoff {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolve `expression` relative to `now`.
///
/// Every failure is an [`CleanError::InvalidArgument`] carrying the message the
/// operator sees.
pub fn resolve_cutoff(expression: &str, now: NaiveDateTime) -> Result<Cutoff> {
    let span = expression.parse::<RelativeSpan>().map_err(unreadable)?;
    span.before(now)
        .and_then(Cutoff::new)
        .map_err(unreadable)
}

fn unreadable(err: ExpressionError) -> CleanError {
    if err == ExpressionError::Empty {
        return CleanError::invalid_argument(EMPTY_DURATION_MESSAGE);
    }
    CleanError::invalid_argument(format!(
        "Expired time is not readable ({err}). Use a valid format like \"6months\", \"1year\", \"90days\"."
    ))
}

//! Relative time expressions such as `6months`, `1 year 2 weeks` or `90 days ago`.
//!
//! An expression is a list of `<amount><unit>` terms separated by whitespace or
//! commas. It always denotes a span *into the past*: an explicit `-` is refused
//! because it would move the cutoff into the future and match every entry.

#![allow(missing_docs)]

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Days, Months, NaiveDateTime, TimeDelta};
use regex::Regex;
use thiserror::Error;

static TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A(?P<sign>[+-]?)\s*(?P<amount>\d+)?\s*(?P<unit>[a-z]+)")
        .expect("term pattern is valid")
});

/// Why an expression could not be turned into a span or a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("expression is empty")]
    Empty,
    #[error("unit {unit:?} has no amount")]
    MissingAmount { unit: String },
    #[error("unknown time unit {unit:?}")]
    UnknownUnit { unit: String },
    #[error("negative amount in {term:?}; durations always count backwards from now")]
    Negative { term: String },
    #[error("unexpected text {text:?}")]
    Unexpected { text: String },
    #[error("amount is too large")]
    Overflow,
    #[error("resulting date is outside the supported range")]
    OutOfRange,
}

/// A single unit accepted in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Fortnight,
    Month,
    Year,
}

impl FromStr for TimeUnit {
    type Err = ExpressionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unit = match raw.to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Self::Second,
            "min" | "mins" | "minute" | "minutes" => Self::Minute,
            "h" | "hour" | "hours" => Self::Hour,
            "d" | "day" | "days" => Self::Day,
            "w" | "week" | "weeks" => Self::Week,
            "fortnight" | "fortnights" => Self::Fortnight,
            "month" | "months" => Self::Month,
            "y" | "year" | "years" => Self::Year,
            _ => {
                return Err(ExpressionError::UnknownUnit {
                    unit: raw.to_string(),
                });
            }
        };
        Ok(unit)
    }
}

/// A parsed expression, split into calendar months, calendar days and fixed seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelativeSpan {
    months: u32,
    days: u64,
    seconds: i64,
}

impl RelativeSpan {
    pub const fn months(&self) -> u32 {
        self.months
    }

    pub const fn days(&self) -> u64 {
        self.days
    }

    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    fn add(&mut self, amount: u64, unit: TimeUnit) -> Result<(), ExpressionError> {
        match unit {
            TimeUnit::Year | TimeUnit::Month => {
                let per = if unit == TimeUnit::Year { 12 } else { 1 };
                let months = u32::try_from(amount)
                    .ok()
                    .and_then(|n| n.checked_mul(per))
                    .ok_or(ExpressionError::Overflow)?;
                self.months = self
                    .months
                    .checked_add(months)
                    .ok_or(ExpressionError::Overflow)?;
            }
            TimeUnit::Day | TimeUnit::Week | TimeUnit::Fortnight => {
                let per = match unit {
                    TimeUnit::Week => 7,
                    TimeUnit::Fortnight => 14,
                    _ => 1,
                };
                let days = amount.checked_mul(per).ok_or(ExpressionError::Overflow)?;
                self.days = self
                    .days
                    .checked_add(days)
                    .ok_or(ExpressionError::Overflow)?;
            }
            TimeUnit::Hour | TimeUnit::Minute | TimeUnit::Second => {
                let per = match unit {
                    TimeUnit::Hour => 3_600,
                    TimeUnit::Minute => 60,
                    _ => 1,
                };
                let seconds = i64::try_from(amount)
                    .ok()
                    .and_then(|n| n.checked_mul(per))
                    .ok_or(ExpressionError::Overflow)?;
                self.seconds = self
                    .seconds
                    .checked_add(seconds)
                    .ok_or(ExpressionError::Overflow)?;
            }
        }
        Ok(())
    }

    /// Move `now` back by this span.
    ///
    /// Calendar parts go first: months clamp to the last day of the target
    /// month (`2026-03-31` minus one month is `2026-02-28`), then whole days,
    /// then fixed seconds.
    pub fn before(&self, now: NaiveDateTime) -> Result<NaiveDateTime, ExpressionError> {
        let mut at = now;
        if self.months > 0 {
            at = at
                .checked_sub_months(Months::new(self.months))
                .ok_or(ExpressionError::OutOfRange)?;
        }
        if self.days > 0 {
            at = at
                .checked_sub_days(Days::new(self.days))
                .ok_or(ExpressionError::OutOfRange)?;
        }
        if self.seconds > 0 {
            let delta = TimeDelta::try_seconds(self.seconds).ok_or(ExpressionError::OutOfRange)?;
            at = at
                .checked_sub_signed(delta)
                .ok_or(ExpressionError::OutOfRange)?;
        }
        Ok(at)
    }
}

impl FromStr for RelativeSpan {
    type Err = ExpressionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut rest = input.trim();
        if rest.is_empty() {
            return Err(ExpressionError::Empty);
        }

        let mut span = Self::default();
        let mut terms = 0usize;
        loop {
            rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
            if rest.is_empty() {
                break;
            }
            if terms > 0 && rest.eq_ignore_ascii_case("ago") {
                break;
            }

            let Some(caps) = TERM.captures(rest) else {
                return Err(ExpressionError::Unexpected {
                    text: rest.to_string(),
                });
            };
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let unit_raw = caps.name("unit").map_or("", |m| m.as_str());

            if caps.name("sign").is_some_and(|m| m.as_str() == "-") {
                return Err(ExpressionError::Negative {
                    term: whole.trim().to_string(),
                });
            }
            let Some(amount_raw) = caps.name("amount") else {
                return Err(ExpressionError::MissingAmount {
                    unit: unit_raw.to_string(),
                });
            };
            let amount = amount_raw
                .as_str()
                .parse::<u64>()
                .map_err(|_| ExpressionError::Overflow)?;
            let unit = unit_raw.parse::<TimeUnit>()?;
            span.add(amount, unit)?;

            terms += 1;
            rest = &rest[whole.len()..];
        }

        if terms == 0 {
            return Err(ExpressionError::Empty);
        }
        Ok(span)
    }
}

impl fmt::Display for RelativeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn plural(n: u64) -> &'static str {
            if n == 1 { "" } else { "s" }
        }

        let mut parts = Vec::new();
        if self.months > 0 {
            parts.push(format!(
                "{} month{}",
                self.months,
                plural(u64::from(self.months))
            ));
        }
        if self.days > 0 {
            parts.push(format!("{} day{}", self.days, plural(self.days)));
        }
        if self.seconds > 0 || parts.is_empty() {
            parts.push(format!(
                "{} second{}",
                self.seconds,
                plural(self.seconds.unsigned_abs())
            ));
        }
        f.write_str(&parts.join(" "))
    }
}

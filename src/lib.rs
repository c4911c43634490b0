#![forbid(unsafe_code)]

//! Entry expiration cleaner: deletes stored form entries older than a
//! relative age such as `6months`.
//!
//! The whole job is one operation, [`expiration::cleaner::run`]: resolve the
//! duration into a cutoff, count entries strictly older than it, then either
//! report the count (dry run) or delete them and report the affected rows.
//! The record store and the status-line sink are passed in explicitly.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use entry_expiration::prelude::*;
//!
//! # fn main() -> entry_expiration::core::errors::Result<()> {
//! let config = Config::load(None)?;
//! let mut store = SqliteEntryStore::from_config(&config)?;
//! let mut reporter = MemoryReporter::new();
//! let outcome = run("6months", true, config.clock.timezone, &mut store, &mut reporter)?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod prelude;

pub mod core;
pub mod expiration;
pub mod report;
pub mod store;

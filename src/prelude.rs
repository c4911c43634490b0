//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use entry_expiration::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, TimeZoneMode};
pub use crate::core::errors::{CleanError, Result};

// Expiration
pub use crate::expiration::cleaner::{RunOutcome, run, run_at};
pub use crate::expiration::cutoff::{Cutoff, resolve_cutoff};
pub use crate::expiration::expression::RelativeSpan;

// Reporting
pub use crate::report::{Level, MemoryReporter, NullReporter, Reporter};

// Store
pub use crate::store::EntryStore;
#[cfg(feature = "sqlite")]
pub use crate::store::sqlite::SqliteEntryStore;

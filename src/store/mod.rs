//! The record store holding form entries.

#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::core::errors::Result;
use crate::expiration::cutoff::Cutoff;

/// Access to the entries table, passed explicitly into a cleaning run.
///
/// Both operations compare the entry timestamp with a strict `<` against the
/// cutoff and must bind the cutoff as a parameter.
pub trait EntryStore {
    /// Number of entries with a timestamp strictly earlier than `cutoff`.
    fn count_before(&self, cutoff: &Cutoff) -> Result<u64>;

    /// Delete every entry strictly earlier than `cutoff`; returns the affected row count.
    fn delete_before(&mut self, cutoff: &Cutoff) -> Result<u64>;
}

impl<S: EntryStore + ?Sized> EntryStore for &mut S {
    fn count_before(&self, cutoff: &Cutoff) -> Result<u64> {
        (**self).count_before(cutoff)
    }

    fn delete_before(&mut self, cutoff: &Cutoff) -> Result<u64> {
        (**self).delete_before(cutoff)
    }
}

impl<S: EntryStore + ?Sized> EntryStore for Box<S> {
    fn count_before(&self, cutoff: &Cutoff) -> Result<u64> {
        (**self).count_before(cutoff)
    }

    fn delete_before(&mut self, cutoff: &Cutoff) -> Result<u64> {
        (**self).delete_before(cutoff)
    }
}

//! Expiration: relative time expressions, cutoffs, and the cleaning run.

pub mod cleaner;
pub mod cutoff;
pub mod expression;

//! Validity tracking for the aggregated item dataset.
//!
//! The master cache is always unfiltered; filtered views are read-time
//! projections over it and only their access recency is tracked here.
mod epoch;
mod manager;

pub use epoch::InvalidationEpoch;
pub use manager::{ItemStackCacheManager, ViewRecord};

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter used to bust every cache that validated against it.
///
/// Caches remember the value they observed when they last validated and treat
/// any later value as an invalidation, so no observer wiring is needed.
#[derive(Debug, Default)]
pub struct InvalidationEpoch {
    counter: AtomicU64,
}

static GLOBAL_EPOCH: InvalidationEpoch = InvalidationEpoch::new();

impl InvalidationEpoch {
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Process-wide epoch shared by every cache that is not given its own.
    pub fn global() -> &'static InvalidationEpoch {
        &GLOBAL_EPOCH
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }

    /// Advances the epoch and returns the new value.
    pub fn advance(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::AcqRel) + 1
    }
}

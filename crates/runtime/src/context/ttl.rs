use std::time::{Duration, Instant};

use tracing::trace;

/// Single-slot cache whose value expires `ttl` after creation.
///
/// Expiry is checked lazily on access; nothing runs in the background.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entry: Option<(Instant, T)>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Returns the cached value, building a new one with `factory` when the
    /// slot is empty, expired, or `force_refresh` is set.
    ///
    /// A failing factory leaves the slot empty so the next call retries.
    pub fn get_or_create<E>(
        &mut self,
        now: Instant,
        force_refresh: bool,
        factory: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, E> {
        let current = match self.entry.take() {
            Some((created, value)) if !force_refresh && !self.is_expired(created, now) => {
                (created, value)
            }
            _ => {
                trace!(ttl = ?self.ttl, force_refresh, "building cached value");
                (now, factory()?)
            }
        };
        let (_, value) = self.entry.insert(current);
        Ok(value)
    }

    /// Cached value if present and unexpired at `now`.
    pub fn peek(&self, now: Instant) -> Option<&T> {
        self.entry
            .as_ref()
            .filter(|(created, _)| !self.is_expired(*created, now))
            .map(|(_, value)| value)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    fn is_expired(&self, created: Instant, now: Instant) -> bool {
        now.saturating_duration_since(created) > self.ttl
    }
}

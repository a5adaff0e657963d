use std::num::NonZeroUsize;
use std::rc::Rc;
use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::{debug, info, trace};

use super::InvalidationEpoch;
use crate::config::StorageConfig;
use crate::env::{Clock, SystemClock};
use crate::item::UniqueItemTypes;

/// Access metadata for one filtered view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewRecord {
    pub filter: UniqueItemTypes,
    pub last_access: Instant,
    pub hits: u32,
}

#[derive(Clone, Copy, Debug)]
struct ViewStats {
    last_access: Instant,
    hits: u32,
}

/// Time-boxed validity tracker for the master dataset.
///
/// The cache is either Valid or Invalid. It becomes Valid through
/// [`mark_cached`](Self::mark_cached) and falls back to Invalid when
/// explicitly invalidated, when the validity window elapses, or when the
/// shared [`InvalidationEpoch`] advances past the value observed at
/// validation. Expiry is evaluated lazily on each validity check.
pub struct ItemStackCacheManager {
    clock: Rc<dyn Clock>,
    epoch: &'static InvalidationEpoch,
    window: Duration,
    valid: bool,
    cached_at: Option<Instant>,
    observed_epoch: u64,
    views: LruCache<UniqueItemTypes, ViewStats>,
    validations: u64,
}

impl ItemStackCacheManager {
    pub fn new(window: Duration, max_views: usize) -> Self {
        let capacity = NonZeroUsize::new(max_views).unwrap_or(NonZeroUsize::MIN);
        let epoch = InvalidationEpoch::global();
        Self {
            clock: Rc::new(SystemClock),
            epoch,
            window,
            valid: false,
            cached_at: None,
            observed_epoch: epoch.current(),
            views: LruCache::new(capacity),
            validations: 0,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.cache_window, config.max_views)
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates against `epoch` instead of the process-wide one.
    #[must_use]
    pub fn with_epoch(mut self, epoch: &'static InvalidationEpoch) -> Self {
        self.epoch = epoch;
        self.observed_epoch = epoch.current();
        self
    }

    /// Re-evaluates expiry and returns whether the master cache is usable.
    ///
    /// Flips to Invalid as a side effect when the window has elapsed or the
    /// epoch has advanced since [`mark_cached`](Self::mark_cached).
    pub fn is_master_cache_valid(&mut self) -> bool {
        if !self.valid {
            return false;
        }

        let epoch = self.epoch.current();
        if epoch != self.observed_epoch {
            debug!(
                observed = self.observed_epoch,
                current = epoch,
                "item cache invalidated by epoch"
            );
            self.valid = false;
            return false;
        }

        if let Some(age) = self.cache_age() {
            if age > self.window {
                trace!(?age, window = ?self.window, "item cache window elapsed");
                self.valid = false;
                return false;
            }
        }

        true
    }

    /// Marks the master cache valid as of now.
    pub fn mark_cached(&mut self) {
        self.valid = true;
        self.cached_at = Some(self.clock.now());
        self.observed_epoch = self.epoch.current();
        self.validations += 1;
    }

    pub fn invalidate_cache(&mut self) {
        self.valid = false;
    }

    /// Advances the process-wide epoch; every cache validated against it
    /// reports itself stale on its next check.
    pub fn invalidate_global_cache() -> u64 {
        let epoch = InvalidationEpoch::global().advance();
        info!(epoch, "global item cache invalidation");
        epoch
    }

    /// Records an access to the view for `filter`, evicting the least
    /// recently used view when the cap is exceeded.
    pub fn touch_view(&mut self, filter: &UniqueItemTypes) {
        let now = self.clock.now();

        if let Some(stats) = self.views.get_mut(filter) {
            stats.last_access = now;
            stats.hits = stats.hits.saturating_add(1);
            return;
        }

        let stats = ViewStats {
            last_access: now,
            hits: 1,
        };
        if let Some((evicted, _)) = self.views.push(filter.clone(), stats) {
            trace!(%evicted, "evicted least recently used view");
        }
    }

    /// Tracked views, most recently accessed first.
    pub fn views(&self) -> Vec<ViewRecord> {
        self.views
            .iter()
            .map(|(filter, stats)| ViewRecord {
                filter: filter.clone(),
                last_access: stats.last_access,
                hits: stats.hits,
            })
            .collect()
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn max_views(&self) -> usize {
        self.views.cap().get()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Time since the last validation, if any.
    pub fn cache_age(&self) -> Option<Duration> {
        self.cached_at
            .map(|at| self.clock.now().saturating_duration_since(at))
    }

    /// Number of times the cache has been marked valid.
    pub fn validations(&self) -> u64 {
        self.validations
    }

    /// Diagnostic line; the format is not stable.
    pub fn cache_info(&self) -> String {
        let age = self
            .cache_age()
            .map(|age| format!("{}ms", age.as_millis()))
            .unwrap_or_else(|| "never".to_owned());
        format!(
            "item cache: valid={} age={} window={}ms epoch={}/{} validations={} views={}/{}",
            self.valid,
            age,
            self.window.as_millis(),
            self.observed_epoch,
            self.epoch.current(),
            self.validations,
            self.views.len(),
            self.max_views(),
        )
    }
}

impl std::fmt::Debug for ItemStackCacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStackCacheManager")
            .field("valid", &self.valid)
            .field("window", &self.window)
            .field("observed_epoch", &self.observed_epoch)
            .field("views", &self.views.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ManualClock;

    fn manager(clock: &Rc<ManualClock>, epoch: &'static InvalidationEpoch) -> ItemStackCacheManager {
        ItemStackCacheManager::new(Duration::from_millis(500), 10)
            .with_clock(clock.clone())
            .with_epoch(epoch)
    }

    fn filter(types: &[i32]) -> UniqueItemTypes {
        UniqueItemTypes::from_types(types.iter().copied()).unwrap()
    }

    #[test]
    fn starts_invalid() {
        static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
        let clock = Rc::new(ManualClock::new());
        let mut cache = manager(&clock, &EPOCH);

        assert!(!cache.is_master_cache_valid());
        assert_eq!(cache.cache_age(), None);
    }

    #[test]
    fn window_boundary() {
        static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
        let clock = Rc::new(ManualClock::new());
        let mut cache = manager(&clock, &EPOCH);

        cache.mark_cached();
        clock.set_elapsed(Duration::from_millis(490));
        assert!(cache.is_master_cache_valid());

        clock.set_elapsed(Duration::from_millis(510));
        assert!(!cache.is_master_cache_valid());

        // Expiry sticks even if time were to read earlier again.
        clock.set_elapsed(Duration::from_millis(100));
        assert!(!cache.is_master_cache_valid());
    }

    #[test]
    fn explicit_invalidation() {
        static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
        let clock = Rc::new(ManualClock::new());
        let mut cache = manager(&clock, &EPOCH);

        cache.mark_cached();
        cache.invalidate_cache();
        assert!(!cache.is_master_cache_valid());

        cache.mark_cached();
        assert!(cache.is_master_cache_valid());
        assert_eq!(cache.validations(), 2);
    }

    #[test]
    fn epoch_advance_invalidates_every_instance() {
        static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
        let clock = Rc::new(ManualClock::new());
        let mut first = manager(&clock, &EPOCH);
        let mut second = manager(&clock, &EPOCH);

        first.mark_cached();
        second.mark_cached();
        EPOCH.advance();

        assert!(!first.is_master_cache_valid());
        assert!(!second.is_master_cache_valid());

        let mut third = manager(&clock, &EPOCH);
        third.mark_cached();
        assert!(third.is_master_cache_valid());
    }

    #[test]
    fn global_invalidation_reaches_default_instances() {
        let clock = Rc::new(ManualClock::new());
        let mut first =
            ItemStackCacheManager::new(Duration::from_secs(60), 10).with_clock(clock.clone());
        let mut second =
            ItemStackCacheManager::new(Duration::from_secs(60), 10).with_clock(clock.clone());
        first.mark_cached();
        second.mark_cached();

        ItemStackCacheManager::invalidate_global_cache();

        assert!(!first.is_master_cache_valid());
        assert!(!second.is_master_cache_valid());
    }

    #[test]
    fn views_are_bounded_lru() {
        static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
        let clock = Rc::new(ManualClock::new());
        let mut cache = ItemStackCacheManager::new(Duration::from_millis(500), 3)
            .with_clock(clock.clone())
            .with_epoch(&EPOCH);

        for item in 1..=3 {
            cache.touch_view(&filter(&[item]));
            clock.advance(Duration::from_millis(1));
        }
        // Refresh the oldest so the second becomes least recently used.
        cache.touch_view(&filter(&[1]));
        cache.touch_view(&filter(&[4]));

        let tracked: Vec<String> = cache.views().iter().map(|v| v.filter.to_string()).collect();
        assert_eq!(tracked, vec!["[4]", "[1]", "[3]"]);
        assert_eq!(cache.view_count(), 3);
        assert_eq!(cache.views()[1].hits, 2);
    }

    #[test]
    fn views_do_not_affect_validity() {
        static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
        let clock = Rc::new(ManualClock::new());
        let mut cache = manager(&clock, &EPOCH);

        for item in 1..=25 {
            cache.touch_view(&filter(&[item]));
        }
        assert!(!cache.is_master_cache_valid());

        cache.mark_cached();
        cache.touch_view(&UniqueItemTypes::wildcard());
        assert!(cache.is_master_cache_valid());
        assert_eq!(cache.view_count(), 10);
    }

    #[test]
    fn zero_view_cap_keeps_one_view() {
        let cache = ItemStackCacheManager::new(Duration::from_millis(500), 0);
        assert_eq!(cache.max_views(), 1);
    }

    #[test]
    fn cache_info_mentions_state() {
        static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
        let clock = Rc::new(ManualClock::new());
        let mut cache = manager(&clock, &EPOCH);
        assert!(cache.cache_info().contains("age=never"));

        cache.mark_cached();
        clock.advance(Duration::from_millis(20));
        let info = cache.cache_info();
        assert!(info.contains("valid=true"));
        assert!(info.contains("age=20ms"));
    }
}

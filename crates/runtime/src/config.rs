//! Runtime configuration loaders and the live, shareable config.
use std::env;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use storage_core::{InvalidationEpoch, SourceKinds, StorageConfig};
use tracing::info;

/// Configuration read at startup.
#[derive(Clone, Debug, Default)]
pub struct RuntimeConfig {
    pub storage: StorageConfig,
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `STORAGE_RANGE` - Max distance to sources; negative or `unlimited` disables (default: unlimited)
    /// - `STORAGE_ONLY_UNLOCKED` - Skip locked sources the player does not own (default: true)
    /// - `STORAGE_CACHE_MS` - Discovery validity window in ms (default: 500)
    /// - `STORAGE_CONTEXT_TTL_MS` - Context lifetime in ms (default: 200)
    /// - `STORAGE_MAX_VIEWS` - Tracked filtered views (default: 10)
    /// - `STORAGE_PULL_FROM_DRONES`, `STORAGE_PULL_FROM_DEW_COLLECTORS`,
    ///   `STORAGE_PULL_FROM_WORKSTATIONS`, `STORAGE_PULL_FROM_CONTAINERS`,
    ///   `STORAGE_PULL_FROM_VEHICLES` - Per-kind toggles (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).map(|value| value.trim().to_owned());
        let mut storage = StorageConfig::default();

        if let Some(range) = read("STORAGE_RANGE") {
            storage.range = parse_range(&range).unwrap_or(storage.range);
        }

        if let Some(only_unlocked) = parse::<bool>(read("STORAGE_ONLY_UNLOCKED")) {
            storage.only_unlocked = only_unlocked;
        }

        if let Some(ms) = parse::<u64>(read("STORAGE_CACHE_MS")) {
            storage.cache_window = Duration::from_millis(ms);
        }

        if let Some(ms) = parse::<u64>(read("STORAGE_CONTEXT_TTL_MS")) {
            storage.context_ttl = Duration::from_millis(ms);
        }

        if let Some(max_views) = parse::<usize>(read("STORAGE_MAX_VIEWS")) {
            storage.max_views = max_views.max(1);
        }

        for (key, flag) in [
            ("STORAGE_PULL_FROM_DRONES", SourceKinds::DRONES),
            ("STORAGE_PULL_FROM_DEW_COLLECTORS", SourceKinds::DEW_COLLECTORS),
            ("STORAGE_PULL_FROM_WORKSTATIONS", SourceKinds::WORKSTATIONS),
            ("STORAGE_PULL_FROM_CONTAINERS", SourceKinds::CONTAINERS),
            ("STORAGE_PULL_FROM_VEHICLES", SourceKinds::VEHICLES),
        ] {
            if let Some(enabled) = parse::<bool>(read(key)) {
                storage.enabled_kinds.set(flag, enabled);
            }
        }

        Self { storage }
    }

    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(self.storage)
    }
}

fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
    value?.parse().ok()
}

/// `None` when unparseable; `Some(None)` for unlimited.
fn parse_range(value: &str) -> Option<Option<u32>> {
    if value.eq_ignore_ascii_case("unlimited") {
        return Some(None);
    }
    let range: i64 = value.parse().ok()?;
    if range < 0 {
        Some(None)
    } else {
        Some(Some(u32::try_from(range).unwrap_or(u32::MAX)))
    }
}

/// Live storage configuration shared between the host and storage services.
///
/// Every update bumps a revision counter and advances the invalidation epoch,
/// so cached discoveries made under the old settings are dropped. Contexts
/// keep the snapshot they were created with.
#[derive(Clone, Debug)]
pub struct SharedConfig {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    current: RwLock<StorageConfig>,
    revision: AtomicU64,
    epoch: &'static InvalidationEpoch,
}

impl SharedConfig {
    pub fn new(config: StorageConfig) -> Self {
        Self::with_epoch(config, InvalidationEpoch::global())
    }

    pub fn with_epoch(config: StorageConfig, epoch: &'static InvalidationEpoch) -> Self {
        Self {
            inner: Arc::new(Inner {
                current: RwLock::new(config),
                revision: AtomicU64::new(0),
                epoch,
            }),
        }
    }

    /// Copy of the current configuration.
    pub fn snapshot(&self) -> StorageConfig {
        match self.inner.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Applies `change` and returns the new revision.
    pub fn update(&self, change: impl FnOnce(&mut StorageConfig)) -> u64 {
        {
            let mut guard = match self.inner.current.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            change(&mut guard);
        }
        let revision = self.inner.revision.fetch_add(1, Ordering::AcqRel) + 1;
        let epoch = self.inner.epoch.advance();
        info!(revision, epoch, "storage configuration updated");
        revision
    }

    pub fn replace(&self, config: StorageConfig) -> u64 {
        self.update(|current| *current = config)
    }

    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Acquire)
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(StorageConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use storage_core::SourceKind;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(from_pairs(&[]).storage, StorageConfig::default());
    }

    #[test]
    fn reads_every_setting() {
        let config = from_pairs(&[
            ("STORAGE_RANGE", "32"),
            ("STORAGE_ONLY_UNLOCKED", "false"),
            ("STORAGE_CACHE_MS", "750"),
            ("STORAGE_CONTEXT_TTL_MS", "100"),
            ("STORAGE_MAX_VIEWS", "0"),
            ("STORAGE_PULL_FROM_VEHICLES", "false"),
            ("STORAGE_PULL_FROM_DRONES", " false "),
        ])
        .storage;

        assert_eq!(config.range, Some(32));
        assert!(!config.only_unlocked);
        assert_eq!(config.cache_window, Duration::from_millis(750));
        assert_eq!(config.context_ttl, Duration::from_millis(100));
        assert_eq!(config.max_views, 1);
        assert!(!config.is_kind_enabled(SourceKind::Vehicle));
        assert!(!config.is_kind_enabled(SourceKind::Drone));
        assert!(config.is_kind_enabled(SourceKind::Container));
    }

    #[test]
    fn range_accepts_unlimited_forms_and_ignores_garbage() {
        for value in ["-1", "unlimited", "UNLIMITED"] {
            assert_eq!(from_pairs(&[("STORAGE_RANGE", value)]).storage.range, None);
        }
        assert_eq!(
            from_pairs(&[("STORAGE_RANGE", "far")]).storage.range,
            StorageConfig::DEFAULT_RANGE
        );
    }

    #[test]
    fn update_bumps_revision_and_epoch() {
        static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
        let shared = SharedConfig::with_epoch(StorageConfig::default(), &EPOCH);
        let handle = shared.clone();
        let before = EPOCH.current();

        assert_eq!(handle.update(|c| c.range = Some(8)), 1);
        assert_eq!(shared.revision(), 1);
        assert_eq!(shared.snapshot().range, Some(8));
        assert_eq!(EPOCH.current(), before + 1);
    }
}

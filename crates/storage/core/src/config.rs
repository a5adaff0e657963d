use std::time::Duration;

use bitflags::bitflags;

use crate::source::SourceKind;

bitflags! {
    /// Set of source kinds discovery is allowed to pull from.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SourceKinds: u8 {
        const DRONES = 1 << 0;
        const DEW_COLLECTORS = 1 << 1;
        const WORKSTATIONS = 1 << 2;
        const CONTAINERS = 1 << 3;
        const VEHICLES = 1 << 4;
    }
}

impl Default for SourceKinds {
    fn default() -> Self {
        Self::all()
    }
}

/// Storage configuration snapshot.
///
/// Captured once per context so behavior stays stable for the context's
/// lifetime even if the live configuration changes mid-tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageConfig {
    pub enabled_kinds: SourceKinds,
    /// Maximum distance from the player; `None` means unlimited.
    pub range: Option<u32>,
    /// Skip locked containers not owned by the player.
    pub only_unlocked: bool,
    /// How long a discovery pass stays valid.
    pub cache_window: Duration,
    /// Maximum number of tracked filtered views.
    pub max_views: usize,
    /// Lifetime of a cached storage context.
    pub context_ttl: Duration,
}

impl StorageConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RANGE: Option<u32> = None;
    pub const DEFAULT_CACHE_WINDOW: Duration = Duration::from_millis(500);
    pub const DEFAULT_MAX_VIEWS: usize = 10;
    pub const DEFAULT_CONTEXT_TTL: Duration = Duration::from_millis(200);

    /// A context older than `context_ttl * CONTEXT_STALENESS_MULTIPLE` is stale
    /// even for holders that never go back through the context cache.
    pub const CONTEXT_STALENESS_MULTIPLE: u32 = 5;

    pub fn new() -> Self {
        Self {
            enabled_kinds: SourceKinds::all(),
            range: Self::DEFAULT_RANGE,
            only_unlocked: true,
            cache_window: Self::DEFAULT_CACHE_WINDOW,
            max_views: Self::DEFAULT_MAX_VIEWS,
            context_ttl: Self::DEFAULT_CONTEXT_TTL,
        }
    }

    #[must_use]
    pub fn with_enabled_kinds(mut self, kinds: SourceKinds) -> Self {
        self.enabled_kinds = kinds;
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: Option<u32>) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn with_only_unlocked(mut self, only_unlocked: bool) -> Self {
        self.only_unlocked = only_unlocked;
        self
    }

    #[must_use]
    pub fn with_cache_window(mut self, window: Duration) -> Self {
        self.cache_window = window;
        self
    }

    #[must_use]
    pub fn with_max_views(mut self, max_views: usize) -> Self {
        self.max_views = max_views;
        self
    }

    #[must_use]
    pub fn with_context_ttl(mut self, ttl: Duration) -> Self {
        self.context_ttl = ttl;
        self
    }

    pub fn is_kind_enabled(&self, kind: SourceKind) -> bool {
        self.enabled_kinds.contains(kind.flag())
    }

    /// Age after which a context is discarded regardless of cache state.
    pub fn context_staleness_limit(&self) -> Duration {
        self.context_ttl
            .saturating_mul(Self::CONTEXT_STALENESS_MULTIPLE)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_kind() {
        let config = StorageConfig::default();
        for kind in SourceKind::PRIORITY {
            assert!(config.is_kind_enabled(kind));
        }
        assert_eq!(config.cache_window, Duration::from_millis(500));
        assert_eq!(config.max_views, 10);
    }

    #[test]
    fn disabled_kinds_are_reported() {
        let config = StorageConfig::new()
            .with_enabled_kinds(SourceKinds::CONTAINERS | SourceKinds::DRONES);
        assert!(config.is_kind_enabled(SourceKind::Container));
        assert!(!config.is_kind_enabled(SourceKind::Vehicle));
    }

    #[test]
    fn staleness_limit_is_a_multiple_of_ttl() {
        let config = StorageConfig::new().with_context_ttl(Duration::from_millis(100));
        assert_eq!(config.context_staleness_limit(), Duration::from_millis(500));
    }
}

//! Per-session storage context.
//!
//! A [`StorageContext`] snapshots the configuration and world at creation,
//! owns the aggregated store and its cache manager, and lazily rediscovers
//! sources whenever the cache is no longer valid. Contexts are short-lived;
//! [`TtlCache`] keeps one around for a few ticks.

mod query;
mod ttl;

pub use query::ItemQuery;
pub use ttl::TtlCache;

use std::fmt::Write as _;
use std::rc::Rc;
use std::time::{Duration, Instant};

use storage_core::{
    Clock, ItemPropertiesOracle, ItemStack, ItemStackCacheManager, SharedStack, StorageConfig,
    StorageSourceItemDataStore, UniqueItemTypes, WorldSnapshot, remove_items,
};
use tracing::{debug, warn};

use crate::discovery::SourceDiscovery;
use crate::error::{ContextError, Result};
use crate::oracle::OracleManager;

pub struct StorageContext {
    config: StorageConfig,
    world: WorldSnapshot,
    store: StorageSourceItemDataStore,
    cache: ItemStackCacheManager,
    items: Rc<dyn ItemPropertiesOracle>,
    discovery: Rc<dyn SourceDiscovery>,
    clock: Rc<dyn Clock>,
    created_at: Instant,
    discoveries: u64,
}

impl StorageContext {
    /// Captures `config` and the current world snapshot.
    ///
    /// No discovery runs here; the first query populates the store.
    ///
    /// # Errors
    ///
    /// [`ContextError::WorldUnavailable`] when no world session is active.
    pub fn create(
        config: StorageConfig,
        oracles: &OracleManager,
        discovery: Rc<dyn SourceDiscovery>,
    ) -> Result<Self> {
        let world = oracles
            .world()
            .snapshot()
            .ok_or(ContextError::WorldUnavailable)?;
        let cache = ItemStackCacheManager::from_config(&config)
            .with_clock(Rc::clone(&oracles.clock))
            .with_epoch(oracles.epoch);

        debug!(player = world.player.0, position = %world.position, "storage context created");
        Ok(Self {
            config,
            world,
            store: StorageSourceItemDataStore::new(),
            cache,
            items: Rc::clone(&oracles.items),
            discovery,
            clock: Rc::clone(&oracles.clock),
            created_at: oracles.now(),
            discoveries: 0,
        })
    }

    /// Rediscovers sources unless the master cache is still valid.
    ///
    /// On failure the store is left empty and the cache invalid, so the next
    /// call starts over.
    pub fn ensure_valid_cache(&mut self) -> Result<()> {
        if self.cache.is_master_cache_valid() {
            debug!("item cache hit");
            return Ok(());
        }

        debug!(
            previous_sources = self.store.source_count(),
            "item cache miss; rediscovering"
        );
        self.store.clear();
        self.cache.invalidate_cache();

        if let Err(err) = self
            .discovery
            .discover_and_register(&mut self.store, &self.world, &self.config)
        {
            self.store.clear();
            warn!(%err, "storage discovery failed; store cleared");
            return Err(err.into());
        }

        self.discoveries += 1;
        self.cache.mark_cached();
        debug!(
            sources = self.store.source_count(),
            stacks = self.store.stack_count(),
            "item cache rebuilt"
        );
        Ok(())
    }

    /// Total units matching `query` across all sources.
    pub fn item_count(&mut self, query: impl Into<ItemQuery>) -> Result<i64> {
        self.ensure_valid_cache()?;
        Ok(self
            .view(query.into())
            .map_or(0, |filter| self.store.filtered_item_count(&filter)))
    }

    pub fn has_item(&mut self, query: impl Into<ItemQuery>) -> Result<bool> {
        self.ensure_valid_cache()?;
        Ok(self
            .view(query.into())
            .is_some_and(|filter| self.store.has_any(&filter)))
    }

    /// Live handles to every present stack matching `filter`, in removal
    /// order.
    pub fn all_available_item_stacks(
        &mut self,
        filter: &UniqueItemTypes,
    ) -> Result<Vec<SharedStack>> {
        self.ensure_valid_cache()?;
        self.cache.touch_view(filter);
        Ok(self.store.filtered_stacks(filter))
    }

    /// Removes up to `quantity_needed` units and returns how many were taken.
    ///
    /// Copies of the removed portions are appended to `removed` when given.
    pub fn remove_remaining(
        &mut self,
        query: impl Into<ItemQuery>,
        quantity_needed: i32,
        ignore_modded_variant: bool,
        removed: Option<&mut Vec<ItemStack>>,
    ) -> Result<i32> {
        self.ensure_valid_cache()?;
        if quantity_needed <= 0 {
            return Ok(0);
        }
        let Some(filter) = self.view(query.into()) else {
            return Ok(0);
        };

        let taken = remove_items(
            &self.store,
            self.items.as_ref(),
            &filter,
            quantity_needed,
            ignore_modded_variant,
            removed,
        );
        debug!(%filter, requested = quantity_needed, taken, "storage removal");
        Ok(taken)
    }

    /// Multi-line description of the discovered sources. Not a stable format.
    pub fn source_summary(&self) -> String {
        let mut out = format!(
            "storage: {} sources, {} stacks near {} (discoveries={})",
            self.store.source_count(),
            self.store.stack_count(),
            self.world.position,
            self.discoveries,
        );
        for summary in self.store.kind_summaries() {
            if summary.sources == 0 {
                continue;
            }
            let _ = write!(
                out,
                "\n  {}: {} sources, {} stacks, {} items",
                summary.kind, summary.sources, summary.stacks, summary.items
            );
        }
        out
    }

    pub fn cache_info(&self) -> String {
        format!(
            "{} context_age={}ms stale={}",
            self.cache.cache_info(),
            self.age().as_millis(),
            self.is_stale(),
        )
    }

    pub fn age(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.created_at)
    }

    /// True once the context has outlived its staleness limit. Holders that
    /// keep a context outside [`TtlCache`] should drop it at that point.
    pub fn is_stale(&self) -> bool {
        self.age() > self.config.context_staleness_limit()
    }

    /// Drops the current discovery; the next query rediscovers.
    pub fn invalidate(&mut self) {
        self.cache.invalidate_cache();
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn world(&self) -> &WorldSnapshot {
        &self.world
    }

    pub fn store(&self) -> &StorageSourceItemDataStore {
        &self.store
    }

    pub fn cache(&self) -> &ItemStackCacheManager {
        &self.cache
    }

    /// Completed discovery passes.
    pub fn discoveries(&self) -> u64 {
        self.discoveries
    }

    fn view(&mut self, query: ItemQuery) -> Option<UniqueItemTypes> {
        let filter = query.to_filter()?;
        self.cache.touch_view(&filter);
        Some(filter)
    }
}

impl std::fmt::Debug for StorageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageContext")
            .field("config", &self.config)
            .field("world", &self.world)
            .field("sources", &self.store.source_count())
            .field("cache", &self.cache)
            .field("discoveries", &self.discoveries)
            .finish()
    }
}

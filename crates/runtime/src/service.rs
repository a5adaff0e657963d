//! Host-facing storage facade.
//!
//! [`StorageService`] keeps one [`StorageContext`] alive for the configured
//! TTL, rebuilds it when the live configuration changes, and turns context
//! errors into empty results so gameplay code never has to handle them.

use std::rc::Rc;

use storage_core::{ErrorSeverity, ItemStack, StorageError, UniqueItemTypes};
use tracing::{debug, error, info, warn};

use crate::config::SharedConfig;
use crate::context::{ItemQuery, StorageContext, TtlCache};
use crate::discovery::SourceDiscovery;
use crate::error::Result;
use crate::oracle::OracleManager;

pub struct StorageService {
    config: SharedConfig,
    oracles: OracleManager,
    discovery: Rc<dyn SourceDiscovery>,
    contexts: TtlCache<StorageContext>,
    context_revision: Option<u64>,
}

impl StorageService {
    pub fn new(
        config: SharedConfig,
        oracles: OracleManager,
        discovery: Rc<dyn SourceDiscovery>,
    ) -> Self {
        let ttl = config.snapshot().context_ttl;
        Self {
            config,
            oracles,
            discovery,
            contexts: TtlCache::new(ttl),
            context_revision: None,
        }
    }

    /// Current context, reusing the cached one while it is fresh and built
    /// under the current configuration revision.
    pub fn context(&mut self) -> Result<&mut StorageContext> {
        self.context_with(false)
    }

    /// Discards the cached context and builds a new one.
    pub fn refresh(&mut self) -> Result<&mut StorageContext> {
        self.context_with(true)
    }

    fn context_with(&mut self, force_refresh: bool) -> Result<&mut StorageContext> {
        let revision = self.config.revision();
        let force_refresh = force_refresh || self.context_revision != Some(revision);
        let config = self.config.snapshot();
        self.contexts.set_ttl(config.context_ttl);

        let now = self.oracles.now();
        let oracles = &self.oracles;
        let discovery = &self.discovery;
        let context = self.contexts.get_or_create(now, force_refresh, || {
            StorageContext::create(config, oracles, Rc::clone(discovery))
        })?;
        self.context_revision = Some(revision);
        Ok(context)
    }

    pub fn item_count(&mut self, query: impl Into<ItemQuery>) -> i64 {
        let query = query.into();
        degrade(
            "item_count",
            self.context().and_then(|ctx| ctx.item_count(query)),
        )
    }

    pub fn has_item(&mut self, query: impl Into<ItemQuery>) -> bool {
        let query = query.into();
        degrade("has_item", self.context().and_then(|ctx| ctx.has_item(query)))
    }

    /// Copies of every matching stack, in removal order.
    pub fn all_available_item_stacks(&mut self, filter: &UniqueItemTypes) -> Vec<ItemStack> {
        let stacks: Result<Vec<ItemStack>> = self.context().and_then(|ctx| {
            let handles = ctx.all_available_item_stacks(filter)?;
            Ok(handles.iter().map(|stack| stack.get()).collect())
        });
        degrade("all_available_item_stacks", stacks)
    }

    /// Removes up to `quantity_needed` units; 0 when storage is unavailable.
    pub fn remove_remaining(
        &mut self,
        query: impl Into<ItemQuery>,
        quantity_needed: i32,
        ignore_modded_variant: bool,
        removed: Option<&mut Vec<ItemStack>>,
    ) -> i32 {
        let query = query.into();
        degrade(
            "remove_remaining",
            self.context().and_then(|ctx| {
                ctx.remove_remaining(query, quantity_needed, ignore_modded_variant, removed)
            }),
        )
    }

    pub fn source_summary(&mut self) -> String {
        match self.context() {
            Ok(ctx) => {
                if let Err(err) = ctx.ensure_valid_cache() {
                    return format!("storage unavailable: {err}");
                }
                ctx.source_summary()
            }
            Err(err) => format!("storage unavailable: {err}"),
        }
    }

    /// Cache diagnostics for the current context without forcing discovery.
    pub fn cache_info(&mut self) -> String {
        match self.context() {
            Ok(ctx) => ctx.cache_info(),
            Err(err) => format!("storage unavailable: {err}"),
        }
    }

    /// Advances the invalidation epoch this service validates against.
    ///
    /// Every context sharing the epoch rediscovers on its next query.
    pub fn invalidate(&self) -> u64 {
        let epoch = self.oracles.epoch().advance();
        info!(epoch, "storage cache invalidated");
        epoch
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }
}

fn degrade<T: Default>(operation: &'static str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            let code = err.error_code();
            match err.severity() {
                ErrorSeverity::Recoverable => {
                    debug!(operation, code, %err, "storage unavailable; returning empty result");
                }
                ErrorSeverity::Validation => {
                    warn!(operation, code, %err, "storage query rejected");
                }
                ErrorSeverity::Internal | ErrorSeverity::Fatal => {
                    error!(operation, code, %err, "storage query failed");
                }
            }
            T::default()
        }
    }
}

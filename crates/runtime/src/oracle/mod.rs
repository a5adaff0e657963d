//! Runtime implementations of the core oracle traits.
//!
//! The [`OracleManager`] bundles the read-only collaborators a storage
//! context consults, together with the clock and invalidation epoch it runs
//! against, so contexts can be rebuilt on demand.
mod items;
mod world;

use std::rc::Rc;
use std::time::Instant;

use storage_core::{Clock, InvalidationEpoch, ItemPropertiesOracle, SystemClock, WorldOracle};

pub use items::ItemPropertiesOracleImpl;
pub use world::StaticWorldOracle;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) world: Rc<dyn WorldOracle>,
    pub(crate) items: Rc<dyn ItemPropertiesOracle>,
    pub(crate) clock: Rc<dyn Clock>,
    pub(crate) epoch: &'static InvalidationEpoch,
}

impl OracleManager {
    /// Uses the system clock and the process-wide invalidation epoch.
    pub fn new(world: Rc<dyn WorldOracle>, items: Rc<dyn ItemPropertiesOracle>) -> Self {
        Self {
            world,
            items,
            clock: Rc::new(SystemClock),
            epoch: InvalidationEpoch::global(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_epoch(mut self, epoch: &'static InvalidationEpoch) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn world(&self) -> &dyn WorldOracle {
        self.world.as_ref()
    }

    pub fn items(&self) -> &dyn ItemPropertiesOracle {
        self.items.as_ref()
    }

    pub fn epoch(&self) -> &'static InvalidationEpoch {
        self.epoch
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }
}

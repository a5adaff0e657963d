#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use storage_core::{
    InvalidationEpoch, ItemStack, ManualClock, PlayerId, Position, RegionId, SourceId,
    SourceRef, StorageConfig, StorageSourceItemDataStore, WorldSnapshot,
};
use storage_runtime::{
    ContainerSource, DiscoveryError, ItemPropertiesOracleImpl, OracleManager, Placement,
    SharedConfig, SourceDiscovery, StaticWorldOracle, StorageService, WorldRegistry,
};

pub const PLAYER: PlayerId = PlayerId(1);
pub const HOME: RegionId = RegionId(0, 0);

/// Item type that never stacks.
pub const RELIC: i32 = 9;

pub fn snapshot() -> WorldSnapshot {
    WorldSnapshot::new(PLAYER, Position::ORIGIN, vec![HOME])
}

pub fn near(x: i32) -> Placement {
    Placement::at(Position::new(x, 0, 0), HOME)
}

pub fn container(id: u64, stacks: &[ItemStack]) -> Rc<ContainerSource> {
    Rc::new(ContainerSource::new(SourceId(id), stacks.iter().copied()))
}

/// Everything a storage service needs, with handles kept for assertions.
pub struct Harness {
    pub clock: Rc<ManualClock>,
    pub world: Rc<StaticWorldOracle>,
    pub registry: Rc<WorldRegistry>,
    pub oracles: OracleManager,
    pub config: SharedConfig,
}

impl Harness {
    pub fn new(epoch: &'static InvalidationEpoch, config: StorageConfig) -> Self {
        let _ = storage_runtime::logging::init_for_tests();
        let clock = Rc::new(ManualClock::new());
        let world = Rc::new(StaticWorldOracle::new(snapshot()));
        let items = Rc::new(ItemPropertiesOracleImpl::new().with_item(RELIC, 1));
        let oracles = OracleManager::new(world.clone(), items)
            .with_clock(clock.clone())
            .with_epoch(epoch);

        Self {
            clock,
            world,
            registry: Rc::new(WorldRegistry::new()),
            oracles,
            config: SharedConfig::with_epoch(config, epoch),
        }
    }

    pub fn place(&self, source: SourceRef, placement: Placement) {
        self.registry.place(source, placement);
    }

    pub fn service(&self) -> StorageService {
        self.service_with(self.registry.clone())
    }

    pub fn service_with(&self, discovery: Rc<dyn SourceDiscovery>) -> StorageService {
        StorageService::new(self.config.clone(), self.oracles.clone(), discovery)
    }
}

/// Registers everything the registry offers, then fails the first
/// `failures` passes.
pub struct FlakyDiscovery {
    inner: Rc<WorldRegistry>,
    failures: Cell<u32>,
    calls: Cell<u32>,
}

impl FlakyDiscovery {
    pub fn new(inner: Rc<WorldRegistry>, failures: u32) -> Self {
        Self {
            inner,
            failures: Cell::new(failures),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl SourceDiscovery for FlakyDiscovery {
    fn discover_and_register(
        &self,
        store: &mut StorageSourceItemDataStore,
        world: &WorldSnapshot,
        config: &StorageConfig,
    ) -> Result<(), DiscoveryError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.discover_and_register(store, world, config)?;

        let failures = self.failures.get();
        if failures > 0 {
            self.failures.set(failures - 1);
            return Err(DiscoveryError::unavailable("region unloading"));
        }
        Ok(())
    }
}

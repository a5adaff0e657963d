//! In-memory world of placed storage sources.
use std::cell::RefCell;

use storage_core::{
    PlayerId, Position, RegionId, SourceId, SourceRef, StorageConfig,
    StorageSourceItemDataStore, WorldSnapshot,
};
use tracing::{debug, trace};

use super::{DiscoveryError, SourceDiscovery};

/// Where a source sits and who may open it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub position: Position,
    pub region: RegionId,
    pub owner: Option<PlayerId>,
    pub locked: bool,
}

impl Placement {
    pub fn at(position: Position, region: RegionId) -> Self {
        Self {
            position,
            region,
            owner: None,
            locked: false,
        }
    }

    #[must_use]
    pub fn owned_by(mut self, owner: PlayerId) -> Self {
        self.owner = Some(owner);
        self
    }

    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// A locked source is accessible only to its owner.
    pub fn is_accessible_to(&self, player: PlayerId) -> bool {
        !self.locked || self.owner == Some(player)
    }
}

struct Entry {
    source: SourceRef,
    placement: Placement,
}

/// Reference [`SourceDiscovery`] over sources placed in memory.
///
/// Sources are offered to the store in placement order, which becomes the
/// discovery order used by removal within a kind.
#[derive(Default)]
pub struct WorldRegistry {
    entries: RefCell<Vec<Entry>>,
}

impl WorldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `source`, replacing any earlier placement with the same id.
    pub fn place(&self, source: SourceRef, placement: Placement) {
        let mut entries = self.entries.borrow_mut();
        let id = source.id();
        match entries.iter_mut().find(|entry| entry.source.id() == id) {
            Some(entry) => {
                entry.source = source;
                entry.placement = placement;
            }
            None => entries.push(Entry { source, placement }),
        }
    }

    pub fn remove(&self, id: SourceId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.source.id() != id);
        entries.len() != before
    }

    pub fn placement_of(&self, id: SourceId) -> Option<Placement> {
        self.entries
            .borrow()
            .iter()
            .find(|entry| entry.source.id() == id)
            .map(|entry| entry.placement)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn is_eligible(entry: &Entry, world: &WorldSnapshot, config: &StorageConfig) -> bool {
        let placement = &entry.placement;
        config.is_kind_enabled(entry.source.kind())
            && world.is_region_loaded(placement.region)
            && world.is_within_range(placement.position, config.range)
            && (!config.only_unlocked || placement.is_accessible_to(world.player))
    }
}

impl SourceDiscovery for WorldRegistry {
    fn discover_and_register(
        &self,
        store: &mut StorageSourceItemDataStore,
        world: &WorldSnapshot,
        config: &StorageConfig,
    ) -> Result<(), DiscoveryError> {
        let entries = self.entries.borrow();
        let mut registered = 0usize;

        for entry in entries.iter() {
            if !Self::is_eligible(entry, world, config) {
                trace!(source = %entry.source.id(), "source not eligible");
                continue;
            }
            store.register_source(entry.source.clone())?;
            registered += 1;
        }

        debug!(
            placed = entries.len(),
            registered,
            stacks = store.stack_count(),
            "discovery pass complete"
        );
        Ok(())
    }
}

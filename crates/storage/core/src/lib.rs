//! Aggregation, caching, and removal engine for reachable item storage.
//!
//! `storage-core` indexes heterogeneous storage sources against the item
//! stacks they expose and answers "how many of X are reachable" and "remove N
//! of X" against that index. Discovery of which sources are eligible lives
//! outside this crate; the engine only talks to the [`StorageSource`]
//! capability and the oracles in [`env`].
//!
//! Modules are organized leaf to root:
//! - [`item`] holds stacks, item types, and the [`UniqueItemTypes`] filter
//! - [`source`] defines the storage source capability and kind ordering
//! - [`store`] is the bidirectional source/stack index
//! - [`cache`] tracks master-cache validity and filtered-view recency
//! - [`removal`] implements cross-source subtraction
pub mod cache;
pub mod config;
pub mod env;
pub mod error;
pub mod item;
pub mod removal;
pub mod source;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{InvalidationEpoch, ItemStackCacheManager, ViewRecord};
pub use config::{SourceKinds, StorageConfig};
pub use env::{
    Clock, ItemPropertiesOracle, ManualClock, PlayerId, Position, RegionId, SystemClock,
    WorldOracle, WorldSnapshot,
};
pub use error::{ErrorSeverity, StorageError};
pub use item::{FilterError, ItemStack, ItemType, ItemValue, SharedStack, UniqueItemTypes};
pub use removal::remove_items;
pub use source::{SourceId, SourceKind, SourceRef, StorageSource};
pub use store::{KindSummary, StorageSourceItemDataStore, StoreError};

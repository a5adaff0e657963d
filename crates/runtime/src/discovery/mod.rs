//! Source discovery: populating a store from the world.
//!
//! Discovery is the only writer of the store. A pass either registers every
//! eligible source or fails; the caller clears the store on failure so a
//! half-populated set is never observed.

mod world;

pub use world::{Placement, WorldRegistry};

use storage_core::{
    ErrorSeverity, StorageConfig, StorageError, StorageSourceItemDataStore, StoreError,
    WorldSnapshot,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Registration(#[from] StoreError),

    /// The host could not complete the scan (region unloading, save in
    /// progress). A later pass may succeed.
    #[error("discovery unavailable: {reason}")]
    Unavailable { reason: String },
}

impl DiscoveryError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

impl StorageError for DiscoveryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Registration(err) => err.severity(),
            Self::Unavailable { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Registration(err) => err.error_code(),
            Self::Unavailable { .. } => "DISCOVERY_UNAVAILABLE",
        }
    }
}

/// Enumerates storage sources reachable from `world` and registers them.
pub trait SourceDiscovery {
    fn discover_and_register(
        &self,
        store: &mut StorageSourceItemDataStore,
        world: &WorldSnapshot,
        config: &StorageConfig,
    ) -> Result<(), DiscoveryError>;
}

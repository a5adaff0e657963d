//! Runtime wiring for the storage engine.
//!
//! This crate supplies the pieces `storage-core` leaves to its host: source
//! discovery over a world, concrete source adapters, oracle implementations,
//! configuration loading, and the [`StorageService`] facade gameplay code
//! calls into.
//!
//! Modules are organized by responsibility:
//! - [`context`] holds the per-session [`StorageContext`] and its TTL cache
//! - [`discovery`] finds eligible sources and registers them in a store
//! - [`sources`] adapts world entities to the storage source capability
//! - [`oracle`] provides in-memory item and world oracles
//! - [`service`] exposes the degraded, host-facing API
//! - [`config`] and [`logging`] cover startup concerns
pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod oracle;
pub mod service;
pub mod sources;

pub use config::{RuntimeConfig, SharedConfig};
pub use context::{ItemQuery, StorageContext, TtlCache};
pub use discovery::{DiscoveryError, Placement, SourceDiscovery, WorldRegistry};
pub use error::{ContextError, Result};
pub use oracle::{ItemPropertiesOracleImpl, OracleManager, StaticWorldOracle};
pub use service::StorageService;
pub use sources::{
    ContainerSource, DewCollectorSource, DirtyFlag, DroneSource, SlotArray, VehicleSource,
    WorkstationSource,
};

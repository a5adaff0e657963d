//! Storage source capability.
//!
//! Concrete sources (containers, workstation outputs, collectors, vehicles,
//! drones) are owned by the host world. The engine only holds them through
//! [`StorageSource`] and never manages their lifecycle.

use std::fmt;
use std::rc::Rc;

use crate::config::SourceKinds;
use crate::item::SharedStack;

/// Concrete kind of a storage source.
///
/// The kind is the bucket key of the data store's kind index. Removal visits
/// kinds in [`SourceKind::PRIORITY`] order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SourceKind {
    /// Autonomous carrier following the player.
    Drone,
    /// Harvesting collector (water, resin, etc.).
    DewCollector,
    /// Crafting-station output slots.
    Workstation,
    /// Placed storage container.
    Container,
    /// Vehicle cargo bag.
    Vehicle,
}

impl SourceKind {
    /// Order in which kinds are consulted during removal.
    pub const PRIORITY: [SourceKind; 5] = [
        SourceKind::Drone,
        SourceKind::DewCollector,
        SourceKind::Workstation,
        SourceKind::Container,
        SourceKind::Vehicle,
    ];

    /// Configuration flag enabling this kind.
    pub const fn flag(self) -> SourceKinds {
        match self {
            Self::Drone => SourceKinds::DRONES,
            Self::DewCollector => SourceKinds::DEW_COLLECTORS,
            Self::Workstation => SourceKinds::WORKSTATIONS,
            Self::Container => SourceKinds::CONTAINERS,
            Self::Vehicle => SourceKinds::VEHICLES,
        }
    }
}

/// Identity of the host entity backing a source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src#{}", self.0)
    }
}

/// Capability every storage source adapter provides.
pub trait StorageSource {
    /// Identity of the underlying entity; equal ids mean the same source.
    fn id(&self) -> SourceId;

    fn kind(&self) -> SourceKind;

    /// Current slot array, in slot order. Handles point at the live slots.
    fn item_stacks(&self) -> &[SharedStack];

    /// Signals that one or more stacks were mutated and must be re-synced.
    fn mark_modified(&self);

    fn same_source(&self, other: &dyn StorageSource) -> bool {
        self.id() == other.id()
    }
}

/// Shared reference to a source held by the data store.
pub type SourceRef = Rc<dyn StorageSource>;

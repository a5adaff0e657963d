//! Storage source adapters, one per [`SourceKind`].
//!
//! Each adapter owns its slots as [`SharedStack`] handles and records
//! modifications in a [`DirtyFlag`] the host drains when persisting.

mod slots;
mod workstation;

pub use slots::{DirtyFlag, SlotArray};
pub use workstation::WorkstationSource;

use storage_core::{ItemStack, SharedStack, SourceId, SourceKind, StorageSource};

macro_rules! slot_source {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            id: SourceId,
            slots: SlotArray,
            dirty: DirtyFlag,
        }

        impl $name {
            pub fn new(id: SourceId, stacks: impl IntoIterator<Item = ItemStack>) -> Self {
                Self {
                    id,
                    slots: SlotArray::from_stacks(stacks),
                    dirty: DirtyFlag::default(),
                }
            }

            /// Wraps existing stack handles without copying them.
            pub fn from_slots(id: SourceId, slots: Vec<SharedStack>) -> Self {
                Self {
                    id,
                    slots: SlotArray::from_shared(slots),
                    dirty: DirtyFlag::default(),
                }
            }

            pub fn slots(&self) -> &[SharedStack] {
                self.slots.as_slice()
            }

            pub fn slot_array(&self) -> &SlotArray {
                &self.slots
            }

            pub fn dirty(&self) -> &DirtyFlag {
                &self.dirty
            }
        }

        impl StorageSource for $name {
            fn id(&self) -> SourceId {
                self.id
            }

            fn kind(&self) -> SourceKind {
                SourceKind::$kind
            }

            fn item_stacks(&self) -> &[SharedStack] {
                self.slots.as_slice()
            }

            fn mark_modified(&self) {
                self.dirty.mark();
            }
        }
    };
}

slot_source!(
    /// Chest or crate placed in the world. Lock state lives in the
    /// discovery placement.
    ContainerSource => Container
);
slot_source!(
    /// Passive collector; its output slots are plain storage.
    DewCollectorSource => DewCollector
);
slot_source!(
    /// Vehicle cargo hold.
    VehicleSource => Vehicle
);
slot_source!(
    /// Companion drone inventory.
    DroneSource => Drone
);

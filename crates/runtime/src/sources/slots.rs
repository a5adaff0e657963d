use std::cell::Cell;

use storage_core::{ItemStack, ItemType, SharedStack};

/// Fixed-size slot array backing a source adapter.
///
/// Slots are shared handles: the store and removal mutate the same stacks
/// the adapter owns.
#[derive(Clone, Debug, Default)]
pub struct SlotArray {
    slots: Vec<SharedStack>,
}

impl SlotArray {
    /// `size` empty slots.
    pub fn with_capacity(size: usize) -> Self {
        Self {
            slots: (0..size).map(|_| SharedStack::empty()).collect(),
        }
    }

    pub fn from_stacks(stacks: impl IntoIterator<Item = ItemStack>) -> Self {
        Self {
            slots: stacks.into_iter().map(SharedStack::new).collect(),
        }
    }

    pub fn from_shared(slots: Vec<SharedStack>) -> Self {
        Self { slots }
    }

    pub fn as_slice(&self) -> &[SharedStack] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&SharedStack> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Units of `item_type` held across all slots.
    pub fn total_of(&self, item_type: ItemType) -> i64 {
        self.slots
            .iter()
            .filter(|slot| slot.is_present() && slot.item_type() == item_type)
            .map(|slot| i64::from(slot.count()))
            .sum()
    }

    /// Places `stack` in the first empty slot. Returns false when full.
    pub fn insert(&self, stack: ItemStack) -> bool {
        match self.slots.iter().find(|slot| !slot.is_present()) {
            Some(slot) => {
                slot.set(stack);
                true
            }
            None => false,
        }
    }
}

/// Counts modifications the host has not yet persisted.
#[derive(Debug, Default)]
pub struct DirtyFlag(Cell<u32>);

impl DirtyFlag {
    pub fn mark(&self) {
        self.0.set(self.0.get().saturating_add(1));
    }

    pub fn pending(&self) -> u32 {
        self.0.get()
    }

    pub fn is_dirty(&self) -> bool {
        self.0.get() > 0
    }

    /// Returns the pending count and resets it.
    pub fn take(&self) -> u32 {
        self.0.replace(0)
    }
}

//! Shared fixtures for unit tests.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::env::ItemPropertiesOracle;
use crate::item::{ItemStack, ItemType, SharedStack};
use crate::source::{SourceId, SourceKind, StorageSource};

pub(crate) struct TestSource {
    id: SourceId,
    kind: SourceKind,
    slots: Vec<SharedStack>,
    modified: Cell<u32>,
}

impl TestSource {
    pub(crate) fn new(id: u64, kind: SourceKind, stacks: &[ItemStack]) -> Rc<Self> {
        let slots = stacks.iter().copied().map(SharedStack::new).collect();
        Self::with_slots(id, kind, slots)
    }

    pub(crate) fn with_slots(id: u64, kind: SourceKind, slots: Vec<SharedStack>) -> Rc<Self> {
        Rc::new(Self {
            id: SourceId(id),
            kind,
            slots,
            modified: Cell::new(0),
        })
    }

    pub(crate) fn slot(&self, index: usize) -> &SharedStack {
        &self.slots[index]
    }

    pub(crate) fn modified_count(&self) -> u32 {
        self.modified.get()
    }
}

impl StorageSource for TestSource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn item_stacks(&self) -> &[SharedStack] {
        &self.slots
    }

    fn mark_modified(&self) {
        self.modified.set(self.modified.get() + 1);
    }
}

/// Item types listed here are non-stackable; everything else stacks.
#[derive(Default)]
pub(crate) struct TestItems {
    unstackable: HashSet<ItemType>,
}

impl TestItems {
    pub(crate) fn with_unstackable(types: &[i32]) -> Self {
        Self {
            unstackable: types.iter().map(|t| ItemType(*t)).collect(),
        }
    }
}

impl ItemPropertiesOracle for TestItems {
    fn is_stackable(&self, item_type: ItemType) -> bool {
        !self.unstackable.contains(&item_type)
    }
}

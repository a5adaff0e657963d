use storage_core::{ItemStack, SharedStack, SourceId, SourceKind, StorageSource};

use super::{DirtyFlag, SlotArray};

/// Crafting station; only finished output is offered to storage.
///
/// Input and fuel slots hold items the player committed to a recipe and are
/// never counted or consumed by the storage engine.
#[derive(Debug)]
pub struct WorkstationSource {
    id: SourceId,
    input: SlotArray,
    output: SlotArray,
    dirty: DirtyFlag,
}

impl WorkstationSource {
    pub fn new(id: SourceId, input_slots: usize, output_slots: usize) -> Self {
        Self {
            id,
            input: SlotArray::with_capacity(input_slots),
            output: SlotArray::with_capacity(output_slots),
            dirty: DirtyFlag::default(),
        }
    }

    pub fn with_output(
        id: SourceId,
        input_slots: usize,
        output: impl IntoIterator<Item = ItemStack>,
    ) -> Self {
        Self {
            id,
            input: SlotArray::with_capacity(input_slots),
            output: SlotArray::from_stacks(output),
            dirty: DirtyFlag::default(),
        }
    }

    pub fn input(&self) -> &SlotArray {
        &self.input
    }

    pub fn output(&self) -> &SlotArray {
        &self.output
    }

    /// Stores a finished product. Returns false when every output slot is
    /// occupied.
    pub fn push_output(&self, stack: ItemStack) -> bool {
        self.output.insert(stack)
    }

    pub fn dirty(&self) -> &DirtyFlag {
        &self.dirty
    }
}

impl StorageSource for WorkstationSource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Workstation
    }

    fn item_stacks(&self) -> &[SharedStack] {
        self.output.as_slice()
    }

    fn mark_modified(&self) {
        self.dirty.mark();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_output_slots_only() {
        let station = WorkstationSource::with_output(SourceId(4), 3, [ItemStack::new(8, 2)]);
        assert!(station.input().insert(ItemStack::new(1, 10)));

        let offered: Vec<ItemStack> = station.item_stacks().iter().map(SharedStack::get).collect();
        assert_eq!(offered, vec![ItemStack::new(8, 2)]);
    }
}

//! Cross-source removal of a requested quantity.
//!
//! Sources are visited in [`SourceKind::PRIORITY`] order, then discovery
//! order within a kind, then slot order within a source. Stacks are mutated
//! in place through their shared handles so the owning source's slot array
//! reflects the removal immediately.

use std::collections::HashMap;

use tracing::{debug, error};

use crate::env::ItemPropertiesOracle;
use crate::item::{ItemStack, ItemType, UniqueItemTypes};
use crate::source::SourceKind;
use crate::store::StorageSourceItemDataStore;

/// Removes up to `quantity_needed` units matching `filter` from `store`.
///
/// - stackable items subtract `min(count, remaining)` from each stack
/// - non-stackable items consume a whole stack per unit, whatever its count
/// - stacks reaching zero are cleared but stay in their slot
/// - each source with a non-zero contribution is marked modified once
///
/// Copies of what was taken are appended to `removed` when given. Returns the
/// number of units actually removed.
pub fn remove_items(
    store: &StorageSourceItemDataStore,
    items: &dyn ItemPropertiesOracle,
    filter: &UniqueItemTypes,
    quantity_needed: i32,
    ignore_modded_variant: bool,
    mut removed: Option<&mut Vec<ItemStack>>,
) -> i32 {
    if quantity_needed <= 0 {
        return 0;
    }

    let mut stackable = StackabilityCache::new(items);
    let mut remaining = quantity_needed;

    'kinds: for kind in SourceKind::PRIORITY {
        for source in store.sources_of_kind(kind) {
            let mut contributed = 0;

            for handle in store.stacks_of(source.id()) {
                let mut stack = handle.borrow_mut();
                if stack.count <= 0 || !filter.contains(stack.item_type()) {
                    continue;
                }
                if ignore_modded_variant && items.ignore_as_modded(&stack) {
                    continue;
                }

                let taken = if stackable.resolve(stack.item_type()) {
                    take_units(&mut stack, remaining)
                } else {
                    take_whole(&mut stack)
                };

                remaining -= taken.units;
                contributed += taken.units;
                if let Some(removed) = removed.as_deref_mut() {
                    removed.push(taken.copy);
                }

                if remaining == 0 {
                    break;
                }
            }

            if contributed > 0 {
                debug!(
                    source = %source.id(),
                    %kind,
                    contributed,
                    "removed items from storage source"
                );
                source.mark_modified();
            }

            if remaining == 0 {
                break 'kinds;
            }
        }
    }

    quantity_needed - remaining
}

/// Units taken from one stack plus a copy describing them.
struct Taken {
    units: i32,
    copy: ItemStack,
}

/// A non-stackable stack is one unit whatever its count field says.
fn take_whole(stack: &mut ItemStack) -> Taken {
    let copy = *stack;
    stack.clear();
    Taken { units: 1, copy }
}

fn take_units(stack: &mut ItemStack, remaining: i32) -> Taken {
    let units = stack.count.min(remaining);
    let copy = ItemStack {
        count: units,
        ..*stack
    };

    let left = stack.count - units;
    if left < 0 {
        error!(
            item_type = %stack.item_type(),
            count = stack.count,
            units,
            "stack count would go negative; clamping to zero"
        );
    }
    stack.count = left.max(0);
    if stack.count == 0 {
        stack.clear();
    }

    Taken { units, copy }
}

/// Resolves stackability once per item type for the duration of one call.
struct StackabilityCache<'a> {
    items: &'a dyn ItemPropertiesOracle,
    known: HashMap<ItemType, bool>,
}

impl<'a> StackabilityCache<'a> {
    fn new(items: &'a dyn ItemPropertiesOracle) -> Self {
        Self {
            items,
            known: HashMap::new(),
        }
    }

    fn resolve(&mut self, item_type: ItemType) -> bool {
        let items = self.items;
        *self
            .known
            .entry(item_type)
            .or_insert_with(|| items.is_stackable(item_type))
    }
}

use crate::item::{ItemStack, ItemType};

/// Pure item-property lookups consulted by removal.
pub trait ItemPropertiesOracle {
    /// Returns true if stacks of `item_type` hold more than one unit.
    fn is_stackable(&self, item_type: ItemType) -> bool;

    /// Returns true if `stack` carries mod-derived variance and must be left
    /// alone when the caller asks to ignore modded variants.
    fn ignore_as_modded(&self, stack: &ItemStack) -> bool {
        stack.value.mod_count > 0
    }
}

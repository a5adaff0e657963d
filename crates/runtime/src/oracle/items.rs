//! Minimal [`storage_core::ItemPropertiesOracle`] backed by an in-memory map.
use std::collections::HashMap;

use storage_core::{ItemPropertiesOracle, ItemType};

/// Item properties keyed by type.
///
/// Types without a definition are treated as stackable.
#[derive(Clone, Debug, Default)]
pub struct ItemPropertiesOracleImpl {
    max_stack: HashMap<ItemType, u16>,
}

impl ItemPropertiesOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item definition
    pub fn define(&mut self, item_type: impl Into<ItemType>, max_stack: u16) {
        self.max_stack.insert(item_type.into(), max_stack);
    }

    #[must_use]
    pub fn with_item(mut self, item_type: impl Into<ItemType>, max_stack: u16) -> Self {
        self.define(item_type, max_stack);
        self
    }

    pub fn max_stack(&self, item_type: ItemType) -> Option<u16> {
        self.max_stack.get(&item_type).copied()
    }
}

impl ItemPropertiesOracle for ItemPropertiesOracleImpl {
    fn is_stackable(&self, item_type: ItemType) -> bool {
        self.max_stack(item_type).is_none_or(|max| max > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_unit_stacks_are_not_stackable() {
        let items = ItemPropertiesOracleImpl::new()
            .with_item(10, 1)
            .with_item(11, 64);

        assert!(!items.is_stackable(ItemType(10)));
        assert!(items.is_stackable(ItemType(11)));
        assert!(items.is_stackable(ItemType(12)));
    }
}

use storage_core::{ItemType, UniqueItemTypes};

/// What a storage query asks for: one item type or a prepared filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemQuery {
    Item(ItemType),
    Types(UniqueItemTypes),
}

impl ItemQuery {
    /// Resolves to a filter. A single item type that is not a valid id
    /// matches nothing and yields `None`.
    pub fn to_filter(&self) -> Option<UniqueItemTypes> {
        match self {
            Self::Item(item_type) => UniqueItemTypes::single(*item_type).ok(),
            Self::Types(filter) => Some(filter.clone()),
        }
    }
}

impl From<ItemType> for ItemQuery {
    fn from(item_type: ItemType) -> Self {
        Self::Item(item_type)
    }
}

impl From<i32> for ItemQuery {
    fn from(item_type: i32) -> Self {
        Self::Item(ItemType(item_type))
    }
}

impl From<UniqueItemTypes> for ItemQuery {
    fn from(filter: UniqueItemTypes) -> Self {
        Self::Types(filter)
    }
}

impl From<&UniqueItemTypes> for ItemQuery {
    fn from(filter: &UniqueItemTypes) -> Self {
        Self::Types(filter.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_single_item_matches_nothing() {
        assert_eq!(ItemQuery::from(0).to_filter(), None);
        assert_eq!(ItemQuery::from(-5).to_filter(), None);
        assert_eq!(
            ItemQuery::from(3).to_filter(),
            Some(UniqueItemTypes::single(3).unwrap())
        );
    }
}

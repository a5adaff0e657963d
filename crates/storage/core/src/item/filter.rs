//! Immutable item-type filter.
//!
//! A [`UniqueItemTypes`] is either the wildcard or a sorted, deduplicated set
//! of strictly positive item types. It is used as a view key, so equality and
//! hashing run over the normalized array.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::ItemType;
use crate::error::{ErrorSeverity, StorageError};

/// Errors raised while constructing a filter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// No valid item type remained after normalization and no wildcard was given.
    #[error("filter has no valid item types")]
    Empty,

    /// The wildcard marker was combined with specific item types.
    #[error("wildcard cannot be combined with {specific} specific item type(s)")]
    MixedWildcard { specific: usize },

    /// A single-type filter was requested for a non-positive item type.
    #[error("{0:?} is not a valid item type")]
    InvalidType(ItemType),
}

impl StorageError for FilterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "FILTER_EMPTY",
            Self::MixedWildcard { .. } => "FILTER_MIXED_WILDCARD",
            Self::InvalidType(_) => "FILTER_INVALID_TYPE",
        }
    }
}

/// Normalized set of item types, or the wildcard.
///
/// # Invariants
///
/// - never empty
/// - either exactly `[ItemType::WILDCARD]`, or strictly positive, unique, sorted
/// - never contains `ItemType::EMPTY`
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UniqueItemTypes {
    types: Arc<[ItemType]>,
}

static WILDCARD: OnceLock<UniqueItemTypes> = OnceLock::new();

impl UniqueItemTypes {
    /// Builds a filter, dropping zero and negative non-wildcard entries.
    ///
    /// # Errors
    ///
    /// - [`FilterError::MixedWildcard`] if the wildcard appears with specific types
    /// - [`FilterError::Empty`] if nothing valid remains and no wildcard was given
    pub fn from_types<I>(types: I) -> Result<Self, FilterError>
    where
        I: IntoIterator,
        I::Item: Into<ItemType>,
    {
        let mut saw_wildcard = false;
        let mut valid: Vec<ItemType> = Vec::new();

        for item_type in types {
            let item_type = item_type.into();
            if item_type.is_wildcard() {
                saw_wildcard = true;
            } else if item_type.is_valid() {
                valid.push(item_type);
            }
        }

        if saw_wildcard {
            return if valid.is_empty() {
                Ok(Self::wildcard())
            } else {
                Err(FilterError::MixedWildcard {
                    specific: valid.len(),
                })
            };
        }

        if valid.is_empty() {
            return Err(FilterError::Empty);
        }

        valid.sort_unstable();
        valid.dedup();

        Ok(Self {
            types: valid.into(),
        })
    }

    /// Like [`from_types`](Self::from_types), but an input with no valid types
    /// yields the wildcard instead of an error.
    ///
    /// # Errors
    ///
    /// Still rejects wildcard mixed with specific types.
    pub fn from_types_or_wildcard<I>(types: I) -> Result<Self, FilterError>
    where
        I: IntoIterator,
        I::Item: Into<ItemType>,
    {
        match Self::from_types(types) {
            Err(FilterError::Empty) => Ok(Self::wildcard()),
            other => other,
        }
    }

    /// The canonical filter matching every positive item type.
    pub fn wildcard() -> Self {
        WILDCARD
            .get_or_init(|| Self {
                types: Arc::from(vec![ItemType::WILDCARD]),
            })
            .clone()
    }

    /// Filter for exactly one item type.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidType`] for zero and reserved negative types.
    pub fn single(item_type: impl Into<ItemType>) -> Result<Self, FilterError> {
        let item_type = item_type.into();
        if item_type.is_wildcard() {
            return Ok(Self::wildcard());
        }
        if !item_type.is_valid() {
            return Err(FilterError::InvalidType(item_type));
        }
        Ok(Self {
            types: Arc::from(vec![item_type]),
        })
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(&*self.types, [only] if only.is_wildcard())
    }

    /// Returns true if `item_type` passes this filter.
    ///
    /// The empty type and reserved negative types never match, not even the
    /// wildcard.
    pub fn contains(&self, item_type: ItemType) -> bool {
        if !item_type.is_valid() {
            return false;
        }
        self.is_wildcard() || self.types.binary_search(&item_type).is_ok()
    }

    /// Returns true if `haystack` covers every type `needle` can match.
    ///
    /// A wildcard haystack covers everything; a specific haystack never covers
    /// the wildcard. Runs as a linear merge over the two sorted arrays.
    pub fn can_satisfy(haystack: &Self, needle: &Self) -> bool {
        if haystack.is_wildcard() {
            return true;
        }
        if needle.is_wildcard() {
            return false;
        }

        let hay = &*haystack.types;
        if needle.types.len() > hay.len() {
            return false;
        }

        let mut cursor = 0;
        for wanted in needle.types.iter() {
            while cursor < hay.len() && hay[cursor] < *wanted {
                cursor += 1;
            }
            if cursor == hay.len() || hay[cursor] != *wanted {
                return false;
            }
            cursor += 1;
        }
        true
    }

    /// Shorthand for `UniqueItemTypes::can_satisfy(self, needle)`.
    pub fn satisfies(&self, needle: &Self) -> bool {
        Self::can_satisfy(self, needle)
    }

    /// Sorted item types; `[WILDCARD]` for the wildcard.
    pub fn as_slice(&self) -> &[ItemType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for UniqueItemTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UniqueItemTypes({self})")
    }
}

impl fmt::Display for UniqueItemTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            return f.write_str("*");
        }
        f.write_str("[")?;
        for (index, item_type) in self.types.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", item_type.0)?;
        }
        f.write_str("]")
    }
}

impl TryFrom<ItemType> for UniqueItemTypes {
    type Error = FilterError;

    fn try_from(item_type: ItemType) -> Result<Self, Self::Error> {
        Self::single(item_type)
    }
}

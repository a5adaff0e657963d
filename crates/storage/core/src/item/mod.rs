//! Item stacks and item-type filters.
//!
//! - [`ItemType`]: integer identifier of an item definition
//! - [`ItemStack`]: quantity + item value, mutated in place during removal
//! - [`SharedStack`]: identity-preserving handle to a stack owned by a source
//! - [`UniqueItemTypes`]: immutable filter used to scope queries
mod filter;
mod stack;

pub use filter::{FilterError, UniqueItemTypes};
pub use stack::{ItemStack, ItemType, ItemValue, SharedStack, StackKey};

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Reference to an item definition owned by the host (lookup via oracles).
///
/// `0` is the empty/invalid type, positive values are real item types and
/// negative values are reserved. [`ItemType::WILDCARD`] is the only reserved
/// value with a meaning, and only inside filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemType(pub i32);

impl ItemType {
    pub const EMPTY: Self = Self(0);

    /// Filter marker matching every positive item type.
    pub const WILDCARD: Self = Self(-1);

    /// Returns true for real item types (strictly positive).
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_wildcard(self) -> bool {
        self.0 == Self::WILDCARD.0
    }
}

impl From<i32> for ItemType {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            f.write_str("*")
        } else {
            write!(f, "item#{}", self.0)
        }
    }
}

/// The item carried by a stack: its type plus instance details.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemValue {
    pub item_type: ItemType,
    pub quality: u16,
    /// Number of installed modifications; non-zero marks a modded variant.
    pub mod_count: u8,
}

impl ItemValue {
    pub const EMPTY: Self = Self {
        item_type: ItemType::EMPTY,
        quality: 0,
        mod_count: 0,
    };

    pub fn new(item_type: impl Into<ItemType>) -> Self {
        Self {
            item_type: item_type.into(),
            ..Self::EMPTY
        }
    }

    #[must_use]
    pub const fn with_quality(mut self, quality: u16) -> Self {
        self.quality = quality;
        self
    }

    #[must_use]
    pub const fn with_mods(mut self, mod_count: u8) -> Self {
        self.mod_count = mod_count;
        self
    }

    pub const fn is_empty(&self) -> bool {
        !self.item_type.is_valid()
    }
}

/// Quantity of a single item value occupying one slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub value: ItemValue,
    pub count: i32,
}

impl ItemStack {
    pub fn new(item_type: impl Into<ItemType>, count: i32) -> Self {
        Self {
            value: ItemValue::new(item_type),
            count,
        }
    }

    pub const fn from_value(value: ItemValue, count: i32) -> Self {
        Self { value, count }
    }

    pub const fn empty() -> Self {
        Self {
            value: ItemValue::EMPTY,
            count: 0,
        }
    }

    #[inline]
    pub const fn item_type(&self) -> ItemType {
        self.value.item_type
    }

    /// Returns true if the stack holds a positive quantity of a real item.
    #[inline]
    pub const fn is_present(&self) -> bool {
        self.count > 0 && self.value.item_type.is_valid()
    }

    /// Zeroes the stack in place; the slot itself stays with its owner.
    pub fn clear(&mut self) {
        *self = Self::empty();
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.count, self.value.item_type)
    }
}

/// Identity key of a [`SharedStack`], stable while any handle is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StackKey(usize);

/// Shared handle to a stack living in a source's slot array.
///
/// Cloning the handle shares the same instance. Two handles are the same
/// stack only if they point at the same allocation, regardless of contents.
#[derive(Clone, Default)]
pub struct SharedStack(Rc<RefCell<ItemStack>>);

impl SharedStack {
    pub fn new(stack: ItemStack) -> Self {
        Self(Rc::new(RefCell::new(stack)))
    }

    pub fn empty() -> Self {
        Self::new(ItemStack::empty())
    }

    /// Returns a copy of the current contents.
    pub fn get(&self) -> ItemStack {
        *self.0.borrow()
    }

    pub fn set(&self, stack: ItemStack) {
        *self.0.borrow_mut() = stack;
    }

    pub fn count(&self) -> i32 {
        self.0.borrow().count
    }

    pub fn item_type(&self) -> ItemType {
        self.0.borrow().item_type()
    }

    pub fn is_present(&self) -> bool {
        self.0.borrow().is_present()
    }

    pub fn borrow(&self) -> Ref<'_, ItemStack> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, ItemStack> {
        self.0.borrow_mut()
    }

    pub fn key(&self) -> StackKey {
        StackKey(Rc::as_ptr(&self.0) as usize)
    }

    pub fn ptr_eq(&self, other: &SharedStack) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<ItemStack> for SharedStack {
    fn from(stack: ItemStack) -> Self {
        Self::new(stack)
    }
}

impl fmt::Debug for SharedStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedStack").field(&*self.0.borrow()).finish()
    }
}

//! Bidirectional index between storage sources and the stacks they expose.
//!
//! The store keeps three relationships behind one choke point:
//! - source → stacks, in slot order
//! - stack → owning source, so a stack is never claimed twice
//! - kind → sources, in discovery order, for kind-scoped removal
//!
//! It is repopulated from scratch on every discovery pass.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::rc::Rc;

use tracing::error;

use crate::error::{ErrorSeverity, StorageError};
use crate::item::{ItemType, SharedStack, StackKey, UniqueItemTypes};
use crate::source::{SourceId, SourceKind, SourceRef};

/// Errors raised while registering sources.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A stack instance is already owned by a different source. This means
    /// discovery scanned the same entity twice under different identities.
    #[error("stack of {item_type} from {claimant} is already owned by {owner}")]
    StackAlreadyClaimed {
        item_type: ItemType,
        owner: SourceId,
        claimant: SourceId,
    },
}

impl StorageError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::StackAlreadyClaimed { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::StackAlreadyClaimed { .. } => "STORE_STACK_ALREADY_CLAIMED",
        }
    }
}

/// Per-kind counts for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindSummary {
    pub kind: SourceKind,
    pub sources: usize,
    pub stacks: usize,
    pub items: i64,
}

/// Central index of registered sources and their stacks.
#[derive(Default)]
pub struct StorageSourceItemDataStore {
    /// Registered sources in discovery order.
    sources: Vec<SourceRef>,
    stacks_by_source: HashMap<SourceId, Vec<SharedStack>>,
    owners: HashMap<StackKey, SourceId>,
    sources_by_kind: HashMap<SourceKind, Vec<SourceRef>>,
}

impl StorageSourceItemDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` and every present stack it currently exposes.
    ///
    /// Stacks with a non-positive count or invalid item type are skipped.
    /// Registering an already-registered source replaces its stack list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StackAlreadyClaimed`] if any stack is owned by a
    /// different source. Nothing is registered in that case and the existing
    /// owner keeps the stack.
    pub fn register_source(&mut self, source: SourceRef) -> Result<usize, StoreError> {
        let id = source.id();

        let mut valid: Vec<SharedStack> = Vec::new();
        for stack in source.item_stacks() {
            if !stack.is_present() || valid.iter().any(|seen| seen.ptr_eq(stack)) {
                continue;
            }
            let owner = self.owners.get(&stack.key()).copied();
            if let Some(owner) = owner.filter(|owner| *owner != id) {
                let item_type = stack.item_type();
                error!(
                    %owner,
                    claimant = %id,
                    %item_type,
                    "stack registered by two different sources"
                );
                return Err(StoreError::StackAlreadyClaimed {
                    item_type,
                    owner,
                    claimant: id,
                });
            }
            valid.push(stack.clone());
        }

        if self.stacks_by_source.contains_key(&id) {
            self.unregister_source(id);
        }

        for stack in &valid {
            self.owners.insert(stack.key(), id);
        }
        let count = valid.len();
        self.stacks_by_source.insert(id, valid);
        self.sources_by_kind
            .entry(source.kind())
            .or_default()
            .push(Rc::clone(&source));
        self.sources.push(source);

        Ok(count)
    }

    /// Removes every relationship held for `id`. Returns false if unknown.
    pub fn unregister_source(&mut self, id: SourceId) -> bool {
        let Some(stacks) = self.stacks_by_source.remove(&id) else {
            return false;
        };

        for stack in &stacks {
            if let Entry::Occupied(owner) = self.owners.entry(stack.key()) {
                if *owner.get() == id {
                    owner.remove();
                }
            }
        }

        if let Some(position) = self.sources.iter().position(|s| s.id() == id) {
            let source = self.sources.remove(position);
            if let Some(bucket) = self.sources_by_kind.get_mut(&source.kind()) {
                bucket.retain(|s| s.id() != id);
            }
        }

        true
    }

    /// Drops every source and stack relationship.
    pub fn clear(&mut self) {
        self.sources.clear();
        self.stacks_by_source.clear();
        self.owners.clear();
        self.sources_by_kind.clear();
    }

    /// Sources of `kind` in discovery order.
    pub fn sources_of_kind(&self, kind: SourceKind) -> &[SourceRef] {
        self.sources_by_kind
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every registered source in discovery order.
    pub fn sources(&self) -> &[SourceRef] {
        &self.sources
    }

    /// Stacks attributed to `id`, in slot order.
    pub fn stacks_of(&self, id: SourceId) -> &[SharedStack] {
        self.stacks_by_source
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Source currently owning `stack`, if it is registered.
    pub fn owner_of(&self, stack: &SharedStack) -> Option<SourceId> {
        self.owners.get(&stack.key()).copied()
    }

    pub fn contains_source(&self, id: SourceId) -> bool {
        self.stacks_by_source.contains_key(&id)
    }

    /// Sums the counts of present stacks matching `filter`.
    pub fn filtered_item_count(&self, filter: &UniqueItemTypes) -> i64 {
        self.matching_stacks(filter)
            .map(|stack| i64::from(stack.count()))
            .sum()
    }

    /// Handles (not copies) of present stacks matching `filter`, in kind
    /// priority, discovery, and slot order.
    pub fn filtered_stacks(&self, filter: &UniqueItemTypes) -> Vec<SharedStack> {
        self.matching_stacks(filter).cloned().collect()
    }

    pub fn has_any(&self, filter: &UniqueItemTypes) -> bool {
        self.matching_stacks(filter).next().is_some()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn stack_count(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Per-kind source, stack, and item counts in priority order.
    pub fn kind_summaries(&self) -> Vec<KindSummary> {
        SourceKind::PRIORITY
            .iter()
            .map(|&kind| {
                let sources = self.sources_of_kind(kind);
                let mut summary = KindSummary {
                    kind,
                    sources: sources.len(),
                    stacks: 0,
                    items: 0,
                };
                for source in sources {
                    for stack in self.stacks_of(source.id()) {
                        if stack.is_present() {
                            summary.stacks += 1;
                            summary.items += i64::from(stack.count());
                        }
                    }
                }
                summary
            })
            .collect()
    }

    fn matching_stacks<'a>(
        &'a self,
        filter: &'a UniqueItemTypes,
    ) -> impl Iterator<Item = &'a SharedStack> + 'a {
        SourceKind::PRIORITY
            .iter()
            .flat_map(move |&kind| self.sources_of_kind(kind))
            .flat_map(move |source| self.stacks_of(source.id()))
            .filter(move |stack| {
                let stack = stack.borrow();
                stack.count > 0 && filter.contains(stack.item_type())
            })
    }
}

impl std::fmt::Debug for StorageSourceItemDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageSourceItemDataStore")
            .field("sources", &self.sources.len())
            .field("stacks", &self.owners.len())
            .finish()
    }
}

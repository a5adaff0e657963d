//! Host-driven [`storage_core::WorldOracle`].
use std::cell::RefCell;

use storage_core::{WorldOracle, WorldSnapshot};

/// World snapshot set by the host on session start and cleared on exit.
#[derive(Debug, Default)]
pub struct StaticWorldOracle {
    snapshot: RefCell<Option<WorldSnapshot>>,
}

impl StaticWorldOracle {
    pub fn new(snapshot: WorldSnapshot) -> Self {
        Self {
            snapshot: RefCell::new(Some(snapshot)),
        }
    }

    /// No active world session.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn set(&self, snapshot: WorldSnapshot) {
        self.snapshot.replace(Some(snapshot));
    }

    pub fn clear(&self) {
        self.snapshot.replace(None);
    }
}

impl WorldOracle for StaticWorldOracle {
    fn snapshot(&self) -> Option<WorldSnapshot> {
        self.snapshot.borrow().clone()
    }
}

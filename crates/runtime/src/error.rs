//! Errors surfaced by storage contexts.
use storage_core::{ErrorSeverity, StorageError};
use thiserror::Error;

use crate::discovery::DiscoveryError;

pub type Result<T> = std::result::Result<T, ContextError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// No world session is active; queries degrade to empty results.
    #[error("no active world session")]
    WorldUnavailable,

    #[error("storage discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
}

impl StorageError for ContextError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WorldUnavailable => ErrorSeverity::Recoverable,
            Self::Discovery(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WorldUnavailable => "CONTEXT_WORLD_UNAVAILABLE",
            Self::Discovery(err) => err.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage_core::{ItemType, SourceId, StoreError};

    #[test]
    fn discovery_errors_keep_their_severity() {
        let claimed = ContextError::from(DiscoveryError::from(StoreError::StackAlreadyClaimed {
            item_type: ItemType(3),
            owner: SourceId(1),
            claimant: SourceId(2),
        }));
        assert_eq!(claimed.severity(), ErrorSeverity::Internal);
        assert_eq!(claimed.error_code(), "STORE_STACK_ALREADY_CLAIMED");

        let offline = ContextError::WorldUnavailable;
        assert!(offline.severity().is_recoverable());
    }
}

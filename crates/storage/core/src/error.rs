//! Common error infrastructure for storage-core.
//!
//! Domain-specific errors (`FilterError`, `StoreError`) live next to the
//! types they validate; this module only provides the shared classification.
//!
//! # Propagation Policy
//!
//! - **Validation** and **Internal** errors are programmer errors and are
//!   raised, never swallowed
//! - **Recoverable** errors describe expected runtime conditions (no active
//!   world) that callers degrade to empty results

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Expected runtime condition; retrying on a later tick may succeed.
    ///
    /// Examples: no active world session, a discovery pass aborted by the host
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: filter mixing wildcard with specific types, empty filter
    Validation,

    /// Unexpected state inconsistency that indicates a bug.
    ///
    /// Examples: the same stack instance reported by two different sources
    Internal,

    /// Unrecoverable error; the engine cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all storage errors.
///
/// Implementations use `#[derive(thiserror::Error)]` for the `Display`/`Error`
/// impls and classify severity by recoverability, not impact.
pub trait StorageError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

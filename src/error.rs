//! Error taxonomy shared by every `BucketTable` operation.

use std::collections::TryReserveError;

/// Failures reported by table operations.
///
/// `NotFound` is an expected outcome of `find`/`remove`, not a fault; use
/// [`TableError::is_not_found`] to branch on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    #[error("table storage is not allocated")]
    NotInitialized,

    #[error("table storage is already allocated")]
    AlreadyInitialized,

    #[error("could not reserve {requested} slots: {source}")]
    AllocationFailure {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("key not found")]
    NotFound,
}

impl TableError {
    pub(crate) fn allocation(requested: usize, source: TryReserveError) -> Self {
        log::error!("reserving {requested} slots failed: {source}");
        TableError::AllocationFailure { requested, source }
    }

    /// True when a lookup or removal simply did not find its key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TableError::NotFound)
    }

    /// True for failures caused by the table's lifecycle state rather than
    /// by the arguments of the call.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            TableError::NotInitialized | TableError::AlreadyInitialized
        )
    }
}

use em_machine::TransitionError;
use em_types::InstanceId;

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Storage backend is read-only or otherwise unavailable.
    #[error("store is read-only")]
    ReadOnly,

    /// The backend refused the record.
    #[error("record {instance} rejected: {reason}")]
    Rejected { instance: InstanceId, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from [`Repository::save`](crate::Repository::save).
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// A before-transition hook failed. Nothing was committed.
    #[error("save aborted: {0}")]
    Aborted(#[source] TransitionError),

    /// The store refused the commit. Nothing was committed.
    #[error("commit failed: {0}")]
    Commit(#[from] StoreError),

    /// An after-transition hook failed. The record is committed and stays so.
    #[error("saved, but post-commit hook failed: {0}")]
    PostCommit(#[source] TransitionError),
}

impl SaveError {
    /// Whether the record reached the store despite the error.
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::PostCommit(_))
    }

    /// The hook failure behind this error, if any.
    pub fn transition(&self) -> Option<&TransitionError> {
        match self {
            Self::Aborted(err) | Self::PostCommit(err) => Some(err),
            Self::Commit(_) => None,
        }
    }
}

/// Result alias for save operations.
pub type SaveResult<T> = Result<T, SaveError>;

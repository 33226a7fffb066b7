use em_types::InstanceId;

use crate::error::StoreResult;

/// Durable storage the save lifecycle commits into.
///
/// `commit` is the commit point: before-hooks run strictly before it and
/// after-hooks only once it has returned `Ok`.
pub trait RecordStore<H>: Send + Sync {
    /// Persist the current state of `host`.
    fn commit(&self, host: &H) -> StoreResult<()>;

    /// Remove the record stored for instance `id`. Returns `true` if one
    /// existed.
    fn delete(&self, id: InstanceId) -> StoreResult<bool>;
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use em_machine::Record;
use em_types::InstanceId;

use crate::error::{StoreError, StoreResult};
use crate::traits::RecordStore;

/// In-memory record store keyed by instance identity.
///
/// Intended for tests and embedding. Each commit stores a clone of the host;
/// the clone carries a fresh [`RecordState`](em_machine::RecordState), so
/// snapshots never share cached value objects with live instances.
pub struct InMemoryRecordStore<H> {
    records: RwLock<HashMap<InstanceId, H>>,
    commits: AtomicU64,
    read_only: AtomicBool,
}

impl<H: Record + Clone> InMemoryRecordStore<H> {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            commits: AtomicU64::new(0),
            read_only: AtomicBool::new(false),
        }
    }

    /// Latest committed snapshot of instance `id`.
    pub fn get(&self, id: InstanceId) -> Option<H> {
        self.records.read().expect("lock poisoned").get(&id).cloned()
    }

    /// Returns `true` if a snapshot of `id` is stored.
    pub fn contains(&self, id: InstanceId) -> bool {
        self.records.read().expect("lock poisoned").contains_key(&id)
    }

    /// Number of distinct instances stored.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }

    /// Successful commits since creation.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::Acquire)
    }

    /// Refuse further commits with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::Release);
    }
}

impl<H: Record + Clone> Default for InMemoryRecordStore<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Record + Clone + Send + Sync> RecordStore<H> for InMemoryRecordStore<H> {
    fn commit(&self, host: &H) -> StoreResult<()> {
        if self.read_only.load(Ordering::Acquire) {
            return Err(StoreError::ReadOnly);
        }
        let mut map = self.records.write().expect("lock poisoned");
        map.insert(host.instance_id(), host.clone());
        self.commits.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn delete(&self, id: InstanceId) -> StoreResult<bool> {
        if self.read_only.load(Ordering::Acquire) {
            return Err(StoreError::ReadOnly);
        }
        let mut map = self.records.write().expect("lock poisoned");
        Ok(map.remove(&id).is_some())
    }
}

impl<H> std::fmt::Debug for InMemoryRecordStore<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.records.read().expect("lock poisoned").len();
        f.debug_struct("InMemoryRecordStore")
            .field("record_count", &count)
            .field("commits", &self.commits.load(Ordering::Acquire))
            .finish()
    }
}

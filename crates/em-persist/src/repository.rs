use std::sync::Arc;

use em_machine::{Record, Schema};
use em_types::{ChangeEvent, Phase};
use tracing::{debug, warn};

use crate::error::{SaveError, SaveResult, StoreResult};
use crate::tracker::ChangeTracker;
use crate::traits::RecordStore;

/// Outcome of a successful save.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Changes as committed, including those made by before-hooks.
    pub changes: Vec<ChangeEvent>,
    /// Before-transition hooks that ran.
    pub before_fired: usize,
    /// After-transition hooks that ran.
    pub after_fired: usize,
}

impl SaveReport {
    /// Whether the save committed no attribute changes.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Save lifecycle for hosts of type `H` backed by store `S`.
///
/// A save runs before-hooks for every pending change, commits, records the
/// new baseline, then runs after-hooks with the changes as committed.
pub struct Repository<H: 'static, S> {
    schema: Arc<Schema<H>>,
    store: S,
    tracker: ChangeTracker,
}

impl<H: Record + 'static, S: RecordStore<H>> Repository<H, S> {
    /// Repository over `store` for the attributes in `schema`.
    pub fn new(schema: Arc<Schema<H>>, store: S) -> Self {
        Self {
            schema,
            store,
            tracker: ChangeTracker::new(),
        }
    }

    /// The attributes this repository tracks.
    pub fn schema(&self) -> &Schema<H> {
        &self.schema
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Baselines of the hosts saved so far.
    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    /// Changes a save of `host` would commit right now.
    pub fn pending_changes(&self, host: &H) -> Vec<ChangeEvent> {
        self.tracker.changes(&self.schema, host)
    }

    /// Persist `host`, dispatching transition hooks around the commit.
    ///
    /// Attributes are visited in schema order. Before-hooks see each
    /// attribute's change as it stands when that attribute is reached.
    ///
    /// A before-hook failure aborts with nothing committed. An after-hook
    /// failure is reported as [`SaveError::PostCommit`]: the commit and the
    /// new baseline stand, and the remaining after-hooks are skipped.
    pub fn save(&self, host: &mut H) -> SaveResult<SaveReport> {
        let instance = host.instance_id();
        let mut report = SaveReport::default();

        // Each attribute's change is read just before its own hooks run, so
        // values set by earlier before-hooks are dispatched too.
        for attribute in self.schema.iter() {
            let Some(event) = self.tracker.change(&**attribute, host) else {
                continue;
            };
            if attribute.has_transitions() {
                report.before_fired += attribute
                    .dispatch(Phase::Before, host, &event)
                    .map_err(SaveError::Aborted)?;
            }
        }

        let committed = self.pending_changes(host);
        self.store.commit(host)?;
        self.tracker.record(&self.schema, host);
        debug!(%instance, changes = committed.len(), "record committed");

        for event in &committed {
            match self.schema.dispatch(Phase::After, host, event) {
                Ok(fired) => report.after_fired += fired,
                Err(err) => {
                    warn!(%instance, error = %err, "post-commit hook failed");
                    return Err(SaveError::PostCommit(err));
                }
            }
        }

        report.changes = committed;
        Ok(report)
    }

    /// Remove `host`'s record from the store and drop its baseline. A later
    /// save treats the host as never persisted.
    pub fn delete(&self, host: &H) -> StoreResult<bool> {
        let instance = host.instance_id();
        let existed = self.store.delete(instance)?;
        self.tracker.forget(instance);
        debug!(%instance, existed, "record deleted");
        Ok(existed)
    }
}

impl<H: 'static, S: std::fmt::Debug> std::fmt::Debug for Repository<H, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("schema", &self.schema)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

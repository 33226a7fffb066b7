use em_types::InstanceId;

use crate::state::RecordState;

/// A host type that carries enum attributes.
///
/// Implementors embed a [`RecordState`] and hand it out here; everything the
/// attribute machinery remembers about an instance lives there.
pub trait Record {
    fn record_state(&self) -> &RecordState;

    fn instance_id(&self) -> InstanceId {
        self.record_state().id()
    }
}

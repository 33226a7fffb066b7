use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use em_types::InstanceId;
use parking_lot::Mutex;

type Cached = Arc<dyn Any + Send + Sync>;
type Slots = Arc<Mutex<HashMap<String, Slot>>>;

#[derive(Default)]
struct Slot {
    forced: Option<String>,
    skip: bool,
    cached: Option<Cached>,
}

impl Slot {
    fn is_vacant(&self) -> bool {
        self.forced.is_none() && !self.skip && self.cached.is_none()
    }
}

/// Per-instance bookkeeping that enum attributes keep beside the host's own
/// fields: the memoized value object, a forced value visible while a
/// before-hook runs, and the skip-transitions flag.
///
/// Cloning a host must not carry any of this over, so `Clone` yields a fresh
/// state with a new [`InstanceId`] and nothing cached.
pub struct RecordState {
    id: InstanceId,
    slots: Slots,
}

impl RecordState {
    /// Fresh state with a new identity and nothing cached.
    pub fn new() -> Self {
        Self {
            id: InstanceId::next(),
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Identity of the owning host instance.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The forced value for `attribute`, if one is installed.
    pub fn forced_value(&self, attribute: &str) -> Option<String> {
        self.slots
            .lock()
            .get(attribute)
            .and_then(|slot| slot.forced.clone())
    }

    /// Make `attribute` read as `value` until the guard drops.
    pub fn force_value(&self, attribute: &str, value: &str) -> ForcedValueGuard {
        self.slots
            .lock()
            .entry(attribute.to_owned())
            .or_default()
            .forced = Some(value.to_owned());
        ForcedValueGuard {
            slots: Arc::clone(&self.slots),
            attribute: attribute.to_owned(),
        }
    }

    /// Whether dispatch is currently suppressed for `attribute`.
    pub fn is_skipping(&self, attribute: &str) -> bool {
        self.slots
            .lock()
            .get(attribute)
            .is_some_and(|slot| slot.skip)
    }

    /// Suppress transition dispatch for `attribute` until the guard drops.
    pub fn skip_transitions(&self, attribute: &str) -> SkipGuard {
        self.slots
            .lock()
            .entry(attribute.to_owned())
            .or_default()
            .skip = true;
        SkipGuard {
            slots: Arc::clone(&self.slots),
            attribute: attribute.to_owned(),
        }
    }

    /// The memoized object for `attribute`, if it has type `T`.
    pub fn cached<T: Any + Send + Sync>(&self, attribute: &str) -> Option<Arc<T>> {
        let cached = self.slots.lock().get(attribute)?.cached.clone()?;
        cached.downcast::<T>().ok()
    }

    /// Memoize `value` for `attribute`, replacing any earlier entry.
    pub fn store_cached<T: Any + Send + Sync>(&self, attribute: &str, value: Arc<T>) {
        self.slots
            .lock()
            .entry(attribute.to_owned())
            .or_default()
            .cached = Some(value);
    }

    /// Drop the memoized object. The next read rebuilds it.
    pub fn clear_cached(&self, attribute: &str) {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get_mut(attribute) {
            slot.cached = None;
            if slot.is_vacant() {
                slots.remove(attribute);
            }
        }
    }
}

impl Default for RecordState {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RecordState {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordState")
            .field("id", &self.id)
            .field("attributes", &self.slots.lock().len())
            .finish()
    }
}

/// Clears a forced value on drop, including during unwinding.
#[must_use = "the forced value is cleared as soon as the guard drops"]
pub struct ForcedValueGuard {
    slots: Slots,
    attribute: String,
}

impl Drop for ForcedValueGuard {
    fn drop(&mut self) {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get_mut(&self.attribute) {
            slot.forced = None;
            if slot.is_vacant() {
                slots.remove(&self.attribute);
            }
        }
    }
}

/// Clears the skip flag on drop. Nested guards do not stack: the first one
/// to drop re-enables dispatch.
#[must_use = "transitions resume as soon as the guard drops"]
pub struct SkipGuard {
    slots: Slots,
    attribute: String,
}

impl Drop for SkipGuard {
    fn drop(&mut self) {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get_mut(&self.attribute) {
            slot.skip = false;
            if slot.is_vacant() {
                slots.remove(&self.attribute);
            }
        }
    }
}

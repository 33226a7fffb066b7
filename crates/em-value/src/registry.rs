use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use em_types::EnumDefinition;
use tracing::debug;

use crate::base::BaseValue;
use crate::class::ValueClass;
use crate::value::ValueObject;

/// Process-wide cache of canonical value objects for one enum attribute.
///
/// Keys are raw values, declared or not. Lookups run concurrently; two
/// threads missing on the same key may both build a wrapper, and whichever
/// insert lands first is kept. The loser is dropped, which is harmless
/// because wrappers for the same raw value are equal and immutable.
pub struct ValueRegistry<V: BaseValue = String> {
    class: ValueClass<V>,
    cache: DashMap<String, Arc<ValueObject<V>>>,
}

impl<V: BaseValue> ValueRegistry<V> {
    /// Create an empty registry for `class`.
    pub fn new(class: ValueClass<V>) -> Self {
        Self {
            class,
            cache: DashMap::new(),
        }
    }

    pub fn class(&self) -> &ValueClass<V> {
        &self.class
    }

    pub fn definition(&self) -> &EnumDefinition {
        self.class.definition()
    }

    /// Canonical value object for `raw`. Never fails.
    pub fn get(&self, raw: &str) -> Arc<ValueObject<V>> {
        if let Some(hit) = self.cache.get(raw) {
            return Arc::clone(hit.value());
        }

        // Built outside the shard lock; a concurrent insert may win.
        let built = Arc::new(self.class.wrap(raw));
        debug!(
            attribute = self.class.definition().attribute(),
            raw,
            declared = built.is_declared(),
            "value registry miss"
        );
        let entry = self.cache.entry(raw.to_owned()).or_insert(built);
        Arc::clone(entry.value())
    }

    /// Canonical values of every declared token, in declaration order.
    pub fn values(&self) -> Vec<Arc<ValueObject<V>>> {
        self.class
            .definition()
            .iter()
            .map(|token| self.get(token))
            .collect()
    }

    /// `(label, raw)` pairs for every declared token, in declaration order.
    pub fn options(&self) -> Vec<(String, String)> {
        self.class
            .definition()
            .iter()
            .map(|token| (self.class.label_for(token), token.to_owned()))
            .collect()
    }

    /// Number of raw values cached so far.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl<V: BaseValue> fmt::Debug for ValueRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueRegistry")
            .field("class", &self.class)
            .field("cached", &self.cache.len())
            .finish()
    }
}

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use em_types::{EnumDefinition, InstanceId};
use serde::{Serialize, Serializer};

use crate::base::BaseValue;
use crate::class::ClassShared;
use crate::labels::label_key;

/// Immutable wrapper around one raw attribute value.
///
/// Equality, ordering and hashing use the raw value only: two wrappers for
/// the same raw value compare equal regardless of their parent.
pub struct ValueObject<V: BaseValue = String> {
    raw: String,
    base: V,
    position: Option<usize>,
    parent: Option<InstanceId>,
    class: Arc<ClassShared>,
}

impl<V: BaseValue> ValueObject<V> {
    /// Raw token as stored on the host.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The base representation built from the raw value.
    pub fn base(&self) -> &V {
        &self.base
    }

    /// Predicate for one declared token: `true` only when `token` is declared
    /// and this value is that token.
    pub fn is(&self, token: &str) -> bool {
        self.position.is_some() && self.raw == token
    }

    /// Whether the raw value is one of the declared tokens.
    pub fn is_declared(&self) -> bool {
        self.position.is_some()
    }

    /// Declaration index of the raw value.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Every declared token paired with this value's predicate for it.
    pub fn predicates(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.class
            .definition
            .iter()
            .map(move |token| (token, self.is(token)))
    }

    pub fn definition(&self) -> &EnumDefinition {
        &self.class.definition
    }

    pub fn label_scope(&self) -> &str {
        &self.class.label_scope
    }

    /// Full label key, `<scope>.<raw>`.
    pub fn label_key(&self) -> String {
        label_key(&self.class.label_scope, &self.raw)
    }

    /// Human-readable label; the raw value when no translation exists.
    pub fn label(&self) -> String {
        self.class
            .labels
            .resolve(&self.class.label_scope, &self.raw)
            .unwrap_or_else(|| self.raw.clone())
    }

    /// Host instance this value was observed through. `None` for the
    /// registry's canonical values.
    pub fn parent(&self) -> Option<InstanceId> {
        self.parent
    }

    /// A copy of this value linked to `parent`.
    pub fn attach(&self, parent: InstanceId) -> Self {
        self.to_builder().parent(parent).finish()
    }

    /// Builder pre-filled with this value's fields.
    pub fn to_builder(&self) -> ValueObjectBuilder<V> {
        ValueObjectBuilder {
            raw: self.raw.clone(),
            base: Some(self.base.clone()),
            parent: self.parent,
            class: Arc::clone(&self.class),
        }
    }
}

impl<V: BaseValue> Clone for ValueObject<V> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            base: self.base.clone(),
            position: self.position,
            parent: self.parent,
            class: Arc::clone(&self.class),
        }
    }
}

impl<V: BaseValue> Deref for ValueObject<V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.base
    }
}

impl<V: BaseValue> AsRef<str> for ValueObject<V> {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl<V: BaseValue> PartialEq for ValueObject<V> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<V: BaseValue> Eq for ValueObject<V> {}

impl<V: BaseValue> PartialEq<str> for ValueObject<V> {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl<V: BaseValue> PartialEq<&str> for ValueObject<V> {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl<V: BaseValue> PartialOrd for ValueObject<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V: BaseValue> Ord for ValueObject<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<V: BaseValue> Hash for ValueObject<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<V: BaseValue> fmt::Display for ValueObject<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<V: BaseValue> fmt::Debug for ValueObject<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueObject")
            .field("raw", &self.raw)
            .field("declared", &self.position.is_some())
            .field("parent", &self.parent)
            .finish()
    }
}

impl<V: BaseValue> Serialize for ValueObject<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Mutable staging area for a [`ValueObject`].
///
/// `finish` produces the immutable value; there is no way to change a value
/// object afterwards.
pub struct ValueObjectBuilder<V: BaseValue = String> {
    raw: String,
    base: Option<V>,
    parent: Option<InstanceId>,
    class: Arc<ClassShared>,
}

impl<V: BaseValue> ValueObjectBuilder<V> {
    pub(crate) fn new(class: Arc<ClassShared>, raw: String) -> Self {
        Self {
            raw,
            base: None,
            parent: None,
            class,
        }
    }

    /// Link the value to the host instance it is read through.
    pub fn parent(mut self, parent: InstanceId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Freeze the staged fields. The base is derived from the raw token
    /// unless it was carried over by [`ValueObject::to_builder`].
    pub fn finish(self) -> ValueObject<V> {
        let position = self.class.definition.position(&self.raw);
        let base = self.base.unwrap_or_else(|| V::from_raw(&self.raw));
        ValueObject {
            raw: self.raw,
            base,
            position,
            parent: self.parent,
            class: self.class,
        }
    }
}

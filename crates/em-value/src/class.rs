use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use em_types::EnumDefinition;

use crate::base::BaseValue;
use crate::labels::{LabelResolver, RawLabels};
use crate::value::{ValueObject, ValueObjectBuilder};

/// Data shared by every value object of one class.
pub(crate) struct ClassShared {
    pub(crate) definition: Arc<EnumDefinition>,
    pub(crate) label_scope: String,
    pub(crate) labels: Arc<dyn LabelResolver>,
}

/// Value object factory for one enum attribute.
///
/// Built once per (host type, attribute) at setup time. Every value object it
/// produces shares the definition, label scope and resolver, and exposes one
/// predicate per declared token through [`ValueObject::is`].
pub struct ValueClass<V: BaseValue = String> {
    shared: Arc<ClassShared>,
    _base: PhantomData<fn() -> V>,
}

impl<V: BaseValue> ValueClass<V> {
    /// Create a class whose labels resolve through `labels`.
    pub fn new(
        definition: impl Into<Arc<EnumDefinition>>,
        label_scope: impl Into<String>,
        labels: Arc<dyn LabelResolver>,
    ) -> Self {
        Self {
            shared: Arc::new(ClassShared {
                definition: definition.into(),
                label_scope: label_scope.into(),
                labels,
            }),
            _base: PhantomData,
        }
    }

    /// A class without translations: labels are raw values.
    pub fn plain(definition: impl Into<Arc<EnumDefinition>>, label_scope: impl Into<String>) -> Self {
        Self::new(definition, label_scope, Arc::new(RawLabels))
    }

    pub fn definition(&self) -> &EnumDefinition {
        &self.shared.definition
    }

    /// Shared handle to the definition.
    pub fn shared_definition(&self) -> Arc<EnumDefinition> {
        Arc::clone(&self.shared.definition)
    }

    /// Prefix used to build label keys.
    pub fn label_scope(&self) -> &str {
        &self.shared.label_scope
    }

    /// Wrap any raw value. Never fails: an undeclared value yields a wrapper
    /// whose predicates are all false.
    pub fn wrap(&self, raw: &str) -> ValueObject<V> {
        self.builder(raw).finish()
    }

    /// Start building a value object for `raw`.
    pub fn builder(&self, raw: impl Into<String>) -> ValueObjectBuilder<V> {
        ValueObjectBuilder::new(Arc::clone(&self.shared), raw.into())
    }

    /// Label for `raw`, falling back to the raw value itself.
    pub fn label_for(&self, raw: &str) -> String {
        self.shared
            .labels
            .resolve(&self.shared.label_scope, raw)
            .unwrap_or_else(|| raw.to_owned())
    }
}

impl<V: BaseValue> Clone for ValueClass<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            _base: PhantomData,
        }
    }
}

impl<V: BaseValue> fmt::Debug for ValueClass<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueClass")
            .field("definition", &self.shared.definition)
            .field("label_scope", &self.shared.label_scope)
            .finish()
    }
}

use std::fmt;
use std::sync::Arc;

use em_types::naming::short_type_name;
use em_types::{ChangeEvent, DefinitionError, DefinitionResult, Phase};
use em_value::BaseValue;

use crate::attribute::EnumAttribute;
use crate::error::TransitionError;
use crate::record::Record;

/// What the save lifecycle needs from an enum attribute, independent of its
/// base value type.
pub trait AttributeLifecycle<H>: Send + Sync {
    fn name(&self) -> &str;

    /// Current underlying raw value on `host`, forced values ignored.
    fn raw_value(&self, host: &H) -> Option<String>;

    fn has_transitions(&self) -> bool;

    fn dispatch(&self, phase: Phase, host: &mut H, event: &ChangeEvent) -> Result<usize, TransitionError>;
}

impl<H: Record + 'static, V: BaseValue> AttributeLifecycle<H> for EnumAttribute<H, V> {
    fn name(&self) -> &str {
        EnumAttribute::name(self)
    }

    fn raw_value(&self, host: &H) -> Option<String> {
        self.raw(host).map(str::to_owned)
    }

    fn has_transitions(&self) -> bool {
        EnumAttribute::has_transitions(self)
    }

    fn dispatch(&self, phase: Phase, host: &mut H, event: &ChangeEvent) -> Result<usize, TransitionError> {
        EnumAttribute::dispatch(self, phase, host, event)
    }
}

/// Registration table of the enum attributes declared on host type `H`.
pub struct Schema<H> {
    host: String,
    attributes: Vec<Arc<dyn AttributeLifecycle<H>>>,
}

impl<H: 'static> Schema<H> {
    /// Empty schema for the host type named `host`.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            attributes: Vec::new(),
        }
    }

    /// Schema named after the last path segment of `H`.
    pub fn for_type() -> Self {
        Self::new(short_type_name::<H>())
    }

    /// Host type name used in errors and log fields.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Add an attribute. Names must be unique per host type.
    pub fn register(&mut self, attribute: Arc<dyn AttributeLifecycle<H>>) -> DefinitionResult<()> {
        if self.attribute(attribute.name()).is_some() {
            return Err(DefinitionError::DuplicateAttribute {
                host: self.host.clone(),
                attribute: attribute.name().to_owned(),
            });
        }
        self.attributes.push(attribute);
        Ok(())
    }

    /// Builder-style [`Schema::register`].
    pub fn with(mut self, attribute: Arc<dyn AttributeLifecycle<H>>) -> DefinitionResult<Self> {
        self.register(attribute)?;
        Ok(self)
    }

    /// Registered attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&Arc<dyn AttributeLifecycle<H>>> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Attributes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn AttributeLifecycle<H>>> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Route `event` to the attribute it names. Unknown attributes and
    /// attributes without rules dispatch nothing.
    pub fn dispatch(&self, phase: Phase, host: &mut H, event: &ChangeEvent) -> Result<usize, TransitionError> {
        match self.attribute(&event.attribute) {
            Some(attribute) if attribute.has_transitions() => attribute.dispatch(phase, host, event),
            _ => Ok(0),
        }
    }
}

impl<H> fmt::Debug for Schema<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.attributes.iter().map(|a| a.name()).collect();
        f.debug_struct("Schema")
            .field("host", &self.host)
            .field("attributes", &names)
            .finish()
    }
}

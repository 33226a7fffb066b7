//! Value objects for enum-machine.
//!
//! An enum attribute's raw value is always observed through an immutable
//! [`ValueObject`] that carries predicates (one per declared token), a label
//! and a back-reference to the host instance that produced it.
//!
//! # Modules
//!
//! - [`class`] -- [`ValueClass`], the per-attribute value object factory
//! - [`value`] -- [`ValueObject`] and its [`ValueObjectBuilder`]
//! - [`base`] -- [`BaseValue`], the user-supplied base representation
//! - [`labels`] -- [`LabelResolver`] with [`RawLabels`] and [`StaticLabels`]
//! - [`registry`] -- [`ValueRegistry`], the concurrent canonical-value cache
//!
//! # Design Rules
//!
//! 1. Wrapping a raw value never fails, declared or not.
//! 2. Value objects are built through a builder and immutable afterwards.
//! 3. Equality and ordering follow the raw value.
//! 4. Registry cache races are tolerated, never reported.

pub mod base;
pub mod class;
pub mod error;
pub mod labels;
pub mod registry;
pub mod value;

pub use base::BaseValue;
pub use class::ValueClass;
pub use error::{LabelError, LabelResult};
pub use labels::{label_key, LabelResolver, RawLabels, StaticLabels};
pub use registry::ValueRegistry;
pub use value::{ValueObject, ValueObjectBuilder};

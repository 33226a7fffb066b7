//! Foundation types for enum-machine.
//!
//! This crate provides the declaration-side types shared by every other
//! enum-machine crate.
//!
//! # Key Types
//!
//! - [`EnumDefinition`] -- Ordered, unique tokens declared for one attribute
//! - [`TokenSet`] -- The `from`/`to` side of a transition rule (`Any` or explicit)
//! - [`Phase`] -- Before or after the persistence commit point
//! - [`ChangeEvent`] -- Old/new pair reported for one attribute
//! - [`InstanceId`] -- Identity of a host instance, used as back-reference
//! - [`AttributeConfig`] -- Serde/TOML configuration of an attribute

pub mod config;
pub mod definition;
pub mod error;
pub mod event;
pub mod instance;
pub mod naming;
pub mod set;

pub use config::AttributeConfig;
pub use definition::EnumDefinition;
pub use error::{DefinitionError, DefinitionResult};
pub use event::{ChangeEvent, Phase};
pub use instance::InstanceId;
pub use set::TokenSet;

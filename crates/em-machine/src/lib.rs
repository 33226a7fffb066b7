//! Transition machine and attribute accessor for enum-machine.
//!
//! An [`EnumAttribute`] binds one enum attribute of a host type to a
//! [`ValueRegistry`](em_value::ValueRegistry) for reads and a [`Machine`] for
//! save-time hook dispatch. Hosts opt in by embedding a [`RecordState`] and
//! implementing [`Record`].
//!
//! # Key Types
//!
//! - [`EnumAttribute`] -- Memoizing accessor plus declaration builder
//! - [`Machine`] -- Ordered rule table with before/after dispatch
//! - [`TransitionRule`] -- `(phase, from, to, hook)` entry
//! - [`RecordState`] -- Per-instance cache, forced value and skip flag
//! - [`Schema`] -- Attributes registered for one host type
//!
//! # Design Rules
//!
//! 1. Dispatch is synchronous and never blocks a transition.
//! 2. Matching rules fire in registration order; the first failure stops.
//! 3. Before-hooks see the pre-transition value through [`EnumAttribute::read`].
//! 4. Forced values and skip flags are cleared by guards, including on unwind.
//! 5. Cloning a host never shares its cached value objects.

pub mod attribute;
pub mod error;
pub mod machine;
pub mod record;
pub mod rule;
pub mod schema;
pub mod state;

pub use attribute::{EnumAttribute, EnumAttributeBuilder};
pub use error::TransitionError;
pub use machine::Machine;
pub use record::Record;
pub use rule::{Hook, HookError, HookResult, TransitionRule};
pub use schema::{AttributeLifecycle, Schema};
pub use state::{ForcedValueGuard, RecordState, SkipGuard};

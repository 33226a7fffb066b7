//! Reference persistence adapter for enum-machine.
//!
//! Supplies the change events and commit hook points the transition machine
//! consumes: a [`ChangeTracker`] computes old/new pairs against the last
//! persisted values, and [`Repository::save`] runs before-hooks, commits to a
//! [`RecordStore`], then runs after-hooks.
//!
//! # Storage Backends
//!
//! - [`InMemoryRecordStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Nothing is committed when a before-hook fails.
//! 2. After-hooks run only once the commit has succeeded.
//! 3. An after-hook failure never rolls the commit back.
//! 4. Baselines live beside hosts, keyed by instance identity, until
//!    [`Repository::delete`] drops them with the record.

pub mod error;
pub mod memory;
pub mod repository;
pub mod tracker;
pub mod traits;

pub use error::{SaveError, SaveResult, StoreError, StoreResult};
pub use memory::InMemoryRecordStore;
pub use repository::{Repository, SaveReport};
pub use tracker::ChangeTracker;
pub use traits::RecordStore;

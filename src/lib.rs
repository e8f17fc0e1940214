//! Phase-bound migration hooks.
//!
//! A plan binds hooks to pipeline phases. [`HookRunner`] is invoked once per
//! reconcile with the current phase: it selects the bound hook, resolves the
//! cluster it targets, submits (or finds) the hook job and reports whether the
//! phase may proceed. [`drive_phase`] polls it until done.

pub mod cluster;
pub mod condition;
pub mod config;
pub mod error;
pub mod executor;
pub mod log;
pub mod model;
pub mod resources;
pub mod state;

pub use cluster::{ClusterResolver, StaticResolver};
pub use condition::{Condition, Conditions};
pub use config::Config;
pub use error::{ErrorKind, HookError, StoreError};
pub use executor::{drive_phase, record_outcome, HookProgress, HookRunner};
pub use state::{InMemoryStore, ObjectStore, RedisStore};

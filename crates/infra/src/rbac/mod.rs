//! Permission resolution cache (RBAC).
//!
//! A derived, rebuildable projection of roles and role bindings:
//! principal login → resolved permission set.
//!
//! ## Lifecycle
//!
//! - Initialized empty at process start
//! - Rebuilt from scratch by every role/binding mutation (best-effort)
//! - Read on every protected request
//!
//! ## Consistency
//!
//! The store is the source of truth. The published snapshot is either
//! *fresh* (last rebuild succeeded) or *stale-but-serving* (last rebuild
//! failed and the previous snapshot is still in use). There is no third state.

pub mod resolver;
pub mod snapshot;

pub use resolver::{CacheState, PermissionResolver, RefreshError};
pub use snapshot::PermissionSnapshot;

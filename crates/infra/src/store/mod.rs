//! Entity store boundary.
//!
//! This module defines the narrow persistence contract consumed by the
//! services (create/get/update/delete/list keyed by `(project, name)`, plus a
//! login lookup for users) without making any storage assumptions.

pub mod in_memory;
pub mod query;
pub mod r#trait;

pub use in_memory::InMemoryEntityStore;
pub use query::Query;
pub use r#trait::{entity_key, EntityStore, SharedStore, StoreError, UserStore};

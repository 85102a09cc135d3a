//! Entity trait: identity + continuity across state changes.
//!
//! Every persisted resource is identified by its `(project, name)` pair for its
//! whole lifecycle. The closed set of kinds is modeled by [`EntityKind`].

use serde::{Deserialize, Serialize};

use crate::Metadata;

/// Closed set of entity kinds handled by the authorization core.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Role,
    RoleBinding,
    User,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Role => "Role",
            EntityKind::RoleBinding => "RoleBinding",
            EntityKind::User => "User",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity marker + minimal interface.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Kind tag of the entity.
    const KIND: EntityKind;

    fn metadata(&self) -> &Metadata;

    fn metadata_mut(&mut self) -> &mut Metadata;

    /// Project the entity belongs to (empty for global entities).
    fn project(&self) -> &str {
        &self.metadata().project
    }

    fn name(&self) -> &str {
        &self.metadata().name
    }
}

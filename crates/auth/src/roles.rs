use serde::{Deserialize, Serialize};

use dashgate_core::{Entity, EntityKind, Metadata};

use crate::Permission;

/// Role: a named, ordered set of permission statements.
///
/// A role with an empty project is global.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub metadata: Metadata,
    pub spec: RoleSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(project: impl Into<String>, name: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Self {
            metadata: Metadata::new(project, name),
            spec: RoleSpec { permissions },
        }
    }
}

impl Entity for Role {
    const KIND: EntityKind = EntityKind::Role;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

/// Kind of principal a subject refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKind {
    #[serde(rename = "user", alias = "User")]
    User,
}

/// Reference to a principal inside a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub kind: SubjectKind,
    pub name: String,
}

impl Subject {
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: SubjectKind::User,
            name: name.into(),
        }
    }
}

/// Association of one role to one or more subjects, within a project or globally.
///
/// `spec.role` is immutable once the binding exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub metadata: Metadata,
    pub spec: RoleBindingSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBindingSpec {
    pub role: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl RoleBinding {
    pub fn new(
        project: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        subjects: Vec<Subject>,
    ) -> Self {
        Self {
            metadata: Metadata::new(project, name),
            spec: RoleBindingSpec {
                role: role.into(),
                subjects,
            },
        }
    }
}

impl Entity for RoleBinding {
    const KIND: EntityKind = EntityKind::RoleBinding;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

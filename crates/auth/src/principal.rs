use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Action, Permission};

/// Identity of an authenticated principal (the user login).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Where a resolved permission applies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Granted by a global binding; applies in every project.
    Global,
    Project(String),
}

impl Scope {
    /// Scope of a binding living in `project` (empty = global).
    pub fn of_project(project: &str) -> Self {
        if project.is_empty() {
            Scope::Global
        } else {
            Scope::Project(project.to_string())
        }
    }

    pub fn covers(&self, project: &str) -> bool {
        match self {
            Scope::Global => true,
            Scope::Project(p) => p == project,
        }
    }
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Scope::Global => f.write_str("global scope"),
            Scope::Project(p) => write!(f, "project '{p}'"),
        }
    }
}

/// A permission together with the scope it was granted in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopedPermission {
    pub scope: Scope,
    #[serde(flatten)]
    pub permission: Permission,
}

impl ScopedPermission {
    pub fn new(scope: Scope, permission: Permission) -> Self {
        Self { scope, permission }
    }
}

/// Fully resolved set of permissions of one principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<ScopedPermission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, permission: ScopedPermission) -> bool {
        self.0.insert(permission)
    }

    /// Grant every permission of a role within `scope`.
    pub fn grant_all<'a>(&mut self, scope: &Scope, permissions: impl IntoIterator<Item = &'a Permission>) {
        for permission in permissions {
            self.0.insert(ScopedPermission::new(scope.clone(), permission.clone()));
        }
    }

    pub fn contains(&self, permission: &ScopedPermission) -> bool {
        self.0.contains(permission)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopedPermission> {
        self.0.iter()
    }

    /// Whether `action` on `kind` inside `project` is granted.
    pub fn allows(&self, project: &str, action: Action, kind: &str) -> bool {
        self.0
            .iter()
            .any(|p| p.scope.covers(project) && p.permission.matches(action, kind))
    }
}

impl FromIterator<ScopedPermission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = ScopedPermission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for PermissionSet {
    type Item = ScopedPermission;
    type IntoIter = std::collections::btree_set::IntoIter<ScopedPermission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

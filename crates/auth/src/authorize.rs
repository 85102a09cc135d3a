use serde::Serialize;
use thiserror::Error;

use crate::{Action, PermissionSet};

/// What a protected operation requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredPermission {
    /// Target project (empty for global resources).
    pub project: String,
    pub action: Action,
    pub kind: String,
}

impl RequiredPermission {
    pub fn new(project: impl Into<String>, action: Action, kind: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            action,
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{action}' on '{kind}'")]
    Forbidden { action: Action, kind: String },
}

/// Authorize a resolved permission set against a requirement.
///
/// - No IO
/// - No panics
/// - Unknown principals resolve to an empty set and are always denied
pub fn authorize(permissions: &PermissionSet, required: &RequiredPermission) -> Result<(), AuthzError> {
    if permissions.allows(&required.project, required.action, &required.kind) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            action: required.action,
            kind: required.kind.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Permission, Scope};

    #[test]
    fn granted_in_project() {
        let mut set = PermissionSet::new();
        set.grant_all(&Scope::of_project("p1"), &[Permission::new(Action::Read, "Dashboard")]);

        assert!(authorize(&set, &RequiredPermission::new("p1", Action::Read, "Dashboard")).is_ok());
    }

    #[test]
    fn denied_reports_missing_permission() {
        let set = PermissionSet::new();
        let err = authorize(&set, &RequiredPermission::new("p1", Action::Create, "RoleBinding")).unwrap_err();
        assert_eq!(
            err,
            AuthzError::Forbidden {
                action: Action::Create,
                kind: "RoleBinding".to_string()
            }
        );
        assert_eq!(err.to_string(), "forbidden: missing permission 'create' on 'RoleBinding'");
    }
}

//! Referential integrity checks for role bindings.

use thiserror::Error;
use tracing::debug;

use dashgate_auth::{Role, RoleBinding, SubjectKind, User};

use crate::service::ServiceError;
use crate::store::{SharedStore, UserStore};

/// A reference embedded in a binding points at nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("role \"{0}\" doesn't exist")]
    MissingRole(String),

    #[error("user subject \"{0}\" doesn't exist")]
    MissingUserSubject(String),
}

/// Checks that the role and the user subjects of a binding exist.
///
/// A missing reference is a [`ValidationError`]; any other lookup failure is
/// propagated as a store error so callers can tell "absent" from "lookup failed".
#[derive(Clone)]
pub struct ReferentialValidator {
    roles: SharedStore<Role>,
    users: SharedStore<User>,
}

impl ReferentialValidator {
    pub fn new(roles: SharedStore<Role>, users: SharedStore<User>) -> Self {
        Self { roles, users }
    }

    /// The role is looked up in the binding's own project; a global binding
    /// therefore references a global role.
    pub fn validate(&self, binding: &RoleBinding) -> Result<(), ServiceError> {
        let project = &binding.metadata.project;

        match self.roles.get(project, &binding.spec.role) {
            Ok(_) => {}
            Err(err) if err.is_not_found() => {
                debug!(project = %project, role = %binding.spec.role, "binding references a missing role");
                return Err(ValidationError::MissingRole(binding.spec.role.clone()).into());
            }
            Err(err) => return Err(ServiceError::Store(err)),
        }

        for subject in &binding.spec.subjects {
            match subject.kind {
                SubjectKind::User => match self.users.get_user(&subject.name) {
                    Ok(_) => {}
                    Err(err) if err.is_not_found() => {
                        return Err(ValidationError::MissingUserSubject(subject.name.clone()).into());
                    }
                    Err(err) => return Err(ServiceError::Store(err)),
                },
            }
        }

        Ok(())
    }
}

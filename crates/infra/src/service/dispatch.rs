//! Dispatch of tagged entities to their typed service.

use std::sync::Arc;

use dashgate_auth::{AnyEntity, Role, RoleBinding, User};

use crate::rbac::PermissionResolver;
use crate::service::{ReferentialValidator, RoleBindingService, RoleService, ServiceError, UserService};
use crate::store::SharedStore;

/// The entity services sharing one permission resolver.
#[derive(Clone)]
pub struct EntityServices {
    pub roles: RoleService,
    pub bindings: RoleBindingService,
    pub users: UserService,
    resolver: Arc<PermissionResolver>,
}

impl EntityServices {
    /// Wire services over the given stores. The resolver starts empty.
    pub fn new(roles: SharedStore<Role>, bindings: SharedStore<RoleBinding>, users: SharedStore<User>) -> Self {
        let resolver = Arc::new(PermissionResolver::new(roles.clone(), bindings.clone()));
        let validator = ReferentialValidator::new(roles.clone(), users.clone());

        Self {
            roles: RoleService::new(roles, resolver.clone()),
            bindings: RoleBindingService::new(bindings, validator, resolver.clone()),
            users: UserService::new(users, resolver.clone()),
            resolver,
        }
    }

    pub fn resolver(&self) -> &Arc<PermissionResolver> {
        &self.resolver
    }

    pub fn create(&self, entity: AnyEntity) -> Result<AnyEntity, ServiceError> {
        Ok(match entity {
            AnyEntity::Role(role) => self.roles.create(role)?.into(),
            AnyEntity::RoleBinding(binding) => self.bindings.create(binding)?.into(),
            AnyEntity::User(user) => self.users.create(user)?.into(),
        })
    }

    pub fn update(&self, entity: AnyEntity, project: &str, name: &str) -> Result<AnyEntity, ServiceError> {
        Ok(match entity {
            AnyEntity::Role(role) => self.roles.update(role, project, name)?.into(),
            AnyEntity::RoleBinding(binding) => self.bindings.update(binding, project, name)?.into(),
            AnyEntity::User(_) => return Err(ServiceError::bad_request("User entities can't be updated")),
        })
    }
}

//! Role binding lifecycle.

use std::sync::Arc;

use tracing::{debug, info};

use dashgate_auth::{AnyEntity, RoleBinding};
use dashgate_core::{Entity, EntityKind};

use crate::rbac::PermissionResolver;
use crate::service::{bind_to_project, check_new_identity, check_route_identity, refresh_after, ReferentialValidator, ServiceError};
use crate::store::{Query, SharedStore};

/// Orchestrates create/update/delete of role bindings.
///
/// `spec.role` is immutable once a binding exists; rebinding means delete
/// then recreate, which are two independent operations.
#[derive(Clone)]
pub struct RoleBindingService {
    store: SharedStore<RoleBinding>,
    validator: ReferentialValidator,
    resolver: Arc<PermissionResolver>,
}

impl RoleBindingService {
    pub fn new(
        store: SharedStore<RoleBinding>,
        validator: ReferentialValidator,
        resolver: Arc<PermissionResolver>,
    ) -> Self {
        Self {
            store,
            validator,
            resolver,
        }
    }

    pub fn create(&self, mut binding: RoleBinding) -> Result<RoleBinding, ServiceError> {
        check_new_identity(&binding.metadata)?;
        binding.metadata.create_now();
        self.validator.validate(&binding)?;

        let created = self.store.create(binding)?;
        info!(project = %created.project(), name = %created.name(), role = %created.spec.role, "role binding created");

        refresh_after(&self.resolver, EntityKind::RoleBinding, "create");
        Ok(created)
    }

    pub fn update(&self, mut binding: RoleBinding, project: &str, name: &str) -> Result<RoleBinding, ServiceError> {
        check_route_identity(&mut binding.metadata, project, name)?;

        let existing = self.store.get(project, name)?;
        self.validator.validate(&binding)?;

        if binding.spec.role != existing.spec.role {
            debug!(project, name, from = %existing.spec.role, to = %binding.spec.role, "rejected role change");
            return Err(ServiceError::bad_request("spec.role can't be updated"));
        }

        binding.metadata.update_from(&existing.metadata);
        let updated = self.store.update(binding)?;
        info!(project, name, version = updated.metadata.version, "role binding updated");

        refresh_after(&self.resolver, EntityKind::RoleBinding, "update");
        Ok(updated)
    }

    pub fn delete(&self, project: &str, name: &str) -> Result<(), ServiceError> {
        self.store.delete(project, name)?;
        info!(project, name, "role binding deleted");

        refresh_after(&self.resolver, EntityKind::RoleBinding, "delete");
        Ok(())
    }

    pub fn get(&self, project: &str, name: &str) -> Result<RoleBinding, ServiceError> {
        Ok(self.store.get(project, name)?)
    }

    pub fn list(&self, query: &Query) -> Result<Vec<RoleBinding>, ServiceError> {
        Ok(self.store.list(query)?)
    }

    /// Create from a tagged entity posted under `project`; any other kind is a bad request.
    pub fn create_entity(&self, entity: AnyEntity, project: &str) -> Result<RoleBinding, ServiceError> {
        let mut binding = entity.expect::<RoleBinding>()?;
        bind_to_project(&mut binding.metadata, project)?;
        self.create(binding)
    }

    pub fn update_entity(&self, entity: AnyEntity, project: &str, name: &str) -> Result<RoleBinding, ServiceError> {
        self.update(entity.expect::<RoleBinding>()?, project, name)
    }
}

use std::sync::Arc;

use tracing::info;

use dashgate_auth::{AnyEntity, Role};
use dashgate_core::EntityKind;

use crate::rbac::PermissionResolver;
use crate::service::{bind_to_project, check_new_identity, check_route_identity, refresh_after, ServiceError};
use crate::store::{Query, SharedStore};

/// Role CRUD. Every mutation refreshes the permission cache best-effort.
#[derive(Clone)]
pub struct RoleService {
    store: SharedStore<Role>,
    resolver: Arc<PermissionResolver>,
}

impl RoleService {
    pub fn new(store: SharedStore<Role>, resolver: Arc<PermissionResolver>) -> Self {
        Self { store, resolver }
    }

    pub fn create(&self, mut role: Role) -> Result<Role, ServiceError> {
        check_new_identity(&role.metadata)?;
        role.metadata.create_now();

        let created = self.store.create(role)?;
        info!(
            project = %created.metadata.project,
            name = %created.metadata.name,
            permissions = created.spec.permissions.len(),
            "role created"
        );

        refresh_after(&self.resolver, EntityKind::Role, "create");
        Ok(created)
    }

    pub fn update(&self, mut role: Role, project: &str, name: &str) -> Result<Role, ServiceError> {
        check_route_identity(&mut role.metadata, project, name)?;

        let existing = self.store.get(project, name)?;
        role.metadata.update_from(&existing.metadata);

        let updated = self.store.update(role)?;
        info!(project, name, version = updated.metadata.version, "role updated");

        refresh_after(&self.resolver, EntityKind::Role, "update");
        Ok(updated)
    }

    /// Bindings that still reference the role are kept; the cache skips them.
    pub fn delete(&self, project: &str, name: &str) -> Result<(), ServiceError> {
        self.store.delete(project, name)?;
        info!(project, name, "role deleted");

        refresh_after(&self.resolver, EntityKind::Role, "delete");
        Ok(())
    }

    pub fn get(&self, project: &str, name: &str) -> Result<Role, ServiceError> {
        Ok(self.store.get(project, name)?)
    }

    pub fn list(&self, query: &Query) -> Result<Vec<Role>, ServiceError> {
        Ok(self.store.list(query)?)
    }

    /// Create from a tagged entity posted under `project`; any other kind is a bad request.
    pub fn create_entity(&self, entity: AnyEntity, project: &str) -> Result<Role, ServiceError> {
        let mut role = entity.expect::<Role>()?;
        bind_to_project(&mut role.metadata, project)?;
        self.create(role)
    }

    pub fn update_entity(&self, entity: AnyEntity, project: &str, name: &str) -> Result<Role, ServiceError> {
        self.update(entity.expect::<Role>()?, project, name)
    }
}

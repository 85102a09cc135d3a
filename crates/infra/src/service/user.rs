use std::sync::Arc;

use tracing::{error, info};

use dashgate_auth::{hash_credential, AnyEntity, CredentialError, User};
use dashgate_core::EntityKind;

use crate::rbac::PermissionResolver;
use crate::service::{check_new_identity, refresh_after, ServiceError};
use crate::store::{Query, SharedStore, StoreError, UserStore};

/// User management. Users are global and returned without their credential.
#[derive(Clone)]
pub struct UserService {
    store: SharedStore<User>,
    resolver: Arc<PermissionResolver>,
}

impl UserService {
    pub fn new(store: SharedStore<User>, resolver: Arc<PermissionResolver>) -> Self {
        Self { store, resolver }
    }

    /// Persist a new user, hashing the presented password first.
    pub fn create(&self, mut user: User) -> Result<User, ServiceError> {
        if !user.metadata.project.is_empty() {
            return Err(ServiceError::bad_request("users are global, metadata.project must be empty"));
        }
        check_new_identity(&user.metadata)?;

        if let Some(secret) = user.spec.password.take() {
            user.spec.password = Some(hash_credential(&secret).map_err(credential_error)?);
        }
        user.metadata.create_now();

        let created = self.store.create(user)?;
        info!(login = %created.login(), "user created");
        Ok(created.redacted())
    }

    pub fn get(&self, login: &str) -> Result<User, ServiceError> {
        Ok(self.store.get_user(login)?.redacted())
    }

    pub fn list(&self, query: &Query) -> Result<Vec<User>, ServiceError> {
        Ok(self
            .store
            .list(query)?
            .into_iter()
            .map(User::redacted)
            .collect())
    }

    /// Bindings naming the user are left in place.
    pub fn delete(&self, login: &str) -> Result<(), ServiceError> {
        self.store.delete("", login)?;
        info!(login, "user deleted");

        refresh_after(&self.resolver, EntityKind::User, "delete");
        Ok(())
    }

    pub fn create_entity(&self, entity: AnyEntity) -> Result<User, ServiceError> {
        self.create(entity.expect::<User>()?)
    }
}

fn credential_error(err: CredentialError) -> ServiceError {
    match err {
        CredentialError::Empty => ServiceError::bad_request(CredentialError::Empty.to_string()),
        CredentialError::Hash(msg) => {
            error!(error = %msg, "credential hashing failed");
            ServiceError::Store(StoreError::Backend(msg))
        }
    }
}

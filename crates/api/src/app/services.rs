//! Service wiring: stores, permission cache, session issuer.

use std::sync::Arc;

use tracing::info;

use dashgate_auth::{JwtTokenSigner, Permission, Role, RoleBinding, Subject, User};
use dashgate_infra::{EntityServices, InMemoryEntityStore, ServiceError, SessionIssuer};

use crate::config::{AdminCredentials, ApiConfig};
use crate::cookies::CookieSettings;

/// Name of the global role and binding created for the bootstrap administrator.
pub const ADMIN_ROLE: &str = "admin";

pub struct AppServices {
    pub entities: EntityServices,
    pub sessions: SessionIssuer,
    pub signer: Arc<JwtTokenSigner>,
    pub cookies: CookieSettings,
}

impl AppServices {
    /// In-memory stores, empty permission cache, optional bootstrap admin.
    pub fn build(config: &ApiConfig) -> Result<Self, ServiceError> {
        let users = Arc::new(InMemoryEntityStore::<User>::new());
        let entities = EntityServices::new(
            Arc::new(InMemoryEntityStore::<Role>::new()),
            Arc::new(InMemoryEntityStore::<RoleBinding>::new()),
            users.clone(),
        );

        let signer = Arc::new(JwtTokenSigner::new_hs256(config.jwt_secret.as_bytes(), config.tokens));
        let sessions = SessionIssuer::new(users, signer.clone());

        let services = Self {
            entities,
            sessions,
            signer,
            cookies: CookieSettings {
                secure: config.secure_cookies,
            },
        };

        if let Some(admin) = &config.admin {
            services.bootstrap_admin(admin)?;
        }
        Ok(services)
    }

    /// Create the administrator, a global `admin` role granting everything, and
    /// the global binding between them. Entities that already exist are kept.
    fn bootstrap_admin(&self, admin: &AdminCredentials) -> Result<(), ServiceError> {
        keep_existing(
            self.entities
                .users
                .create(User::new(admin.login.clone(), Some(admin.password.clone()))),
        )?;
        keep_existing(
            self.entities
                .roles
                .create(Role::new("", ADMIN_ROLE, vec![Permission::wildcard()])),
        )?;
        keep_existing(self.entities.bindings.create(RoleBinding::new(
            "",
            ADMIN_ROLE,
            ADMIN_ROLE,
            vec![Subject::user(admin.login.clone())],
        )))?;

        info!(login = %admin.login, "bootstrap administrator ready");
        Ok(())
    }
}

fn keep_existing<T>(result: Result<T, ServiceError>) -> Result<(), ServiceError> {
    match result {
        Ok(_) | Err(ServiceError::Conflict(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

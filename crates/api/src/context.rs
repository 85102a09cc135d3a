use dashgate_auth::Principal;

/// Principal context for a request (authenticated login).
///
/// Inserted by the auth middleware; permissions are resolved per request from
/// the permission cache, never carried in the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn login(&self) -> &str {
        self.principal.as_str()
    }
}

use serde::{Deserialize, Serialize};

use dashgate_core::{Entity, EntityKind, Metadata};

/// A user principal. Users are global: the login is `metadata.name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: UserSpec,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Stored credential (a PHC hash once persisted by the user service).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl core::fmt::Debug for UserSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserSpec")
            .field("display_name", &self.display_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl User {
    pub fn new(login: impl Into<String>, password: Option<String>) -> Self {
        Self {
            metadata: Metadata::global(login),
            spec: UserSpec {
                display_name: None,
                password,
            },
        }
    }

    pub fn login(&self) -> &str {
        &self.metadata.name
    }

    /// Copy without the stored credential, for responses.
    pub fn redacted(mut self) -> Self {
        self.spec.password = None;
        self
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_user_has_no_password_in_json() {
        let user = User::new("alice", Some("$argon2id$secret".to_string())).redacted();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json["spec"].get("password").is_none());
        assert_eq!(user.login(), "alice");
    }

    #[test]
    fn debug_does_not_print_credential() {
        let user = User::new("alice", Some("hunter2".to_string()));
        assert!(!format!("{user:?}").contains("hunter2"));
    }
}

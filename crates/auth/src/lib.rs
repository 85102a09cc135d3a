//! `dashgate-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod credential;
pub mod entity;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod token;
pub mod user;

pub use authorize::{authorize, AuthzError, RequiredPermission};
pub use claims::{validate_claims, JwtClaims, TokenKind, TokenValidationError};
pub use credential::{hash_credential, verify_credential, verify_decoy_credential, CredentialError};
pub use entity::AnyEntity;
pub use permissions::{Action, Permission};
pub use principal::{PermissionSet, Principal, Scope, ScopedPermission};
pub use roles::{Role, RoleBinding, RoleBindingSpec, RoleSpec, Subject, SubjectKind};
pub use token::{JwtTokenSigner, SessionTokens, SignedToken, TokenConfig, TokenError, TokenVerifier};
pub use user::{User, UserSpec};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info};

use dashgate_auth::{
    verify_credential, verify_decoy_credential, JwtTokenSigner, SessionTokens, SignedToken, TokenError, TokenKind,
    User,
};

use crate::store::{SharedStore, StoreError, UserStore};

/// Externally visible message of every credential failure.
pub const INVALID_CREDENTIALS: &str = "wrong login or password";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown login, user without credential, or secret mismatch.
    #[error("wrong login or password")]
    InvalidCredentials,

    #[error("invalid refresh token: {0}")]
    InvalidRefreshToken(#[source] TokenError),

    #[error("internal store failure")]
    Store(#[source] StoreError),

    #[error("unable to issue session tokens")]
    Signing(#[source] TokenError),
}

impl AuthError {
    /// Whether the failure was caused by the caller.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials | AuthError::InvalidRefreshToken(_))
    }
}

/// Authenticates credentials and issues session token pairs.
///
/// Cookie encoding is the transport's concern; the issuer only returns the
/// structured tokens.
#[derive(Clone)]
pub struct SessionIssuer {
    users: SharedStore<User>,
    signer: Arc<JwtTokenSigner>,
}

impl SessionIssuer {
    pub fn new(users: SharedStore<User>, signer: Arc<JwtTokenSigner>) -> Self {
        Self { users, signer }
    }

    pub fn signer(&self) -> &Arc<JwtTokenSigner> {
        &self.signer
    }

    pub fn authenticate(&self, login: &str, secret: &str) -> Result<SessionTokens, AuthError> {
        self.authenticate_at(login, secret, Utc::now())
    }

    /// Same as [`Self::authenticate`] with an explicit issuance time.
    pub fn authenticate_at(&self, login: &str, secret: &str, now: DateTime<Utc>) -> Result<SessionTokens, AuthError> {
        let user = match self.users.get_user(login) {
            Ok(user) => user,
            Err(err) if err.is_not_found() => {
                verify_decoy_credential(secret);
                debug!(login, "login rejected: unknown user");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => {
                error!(login, error = %err, "user lookup failed during login");
                return Err(AuthError::Store(err));
            }
        };

        let Some(stored) = user.spec.password.as_deref() else {
            verify_decoy_credential(secret);
            debug!(login, "login rejected: user has no credential");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_credential(stored, secret) {
            debug!(login, "login rejected: credential mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.signer.mint_pair(login, now).map_err(|err| {
            error!(login, error = %err, "token signing failed");
            AuthError::Signing(err)
        })?;

        info!(login, expires_at = %tokens.access_token.expires_at, "session issued");
        Ok(tokens)
    }

    /// Mint a new access token from a refresh token. No store lookup.
    pub fn refresh_access(&self, refresh_token: &str) -> Result<SignedToken, AuthError> {
        self.refresh_access_at(refresh_token, Utc::now())
    }

    pub fn refresh_access_at(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<SignedToken, AuthError> {
        let claims = self
            .signer
            .verify_at(refresh_token, TokenKind::Refresh, now)
            .map_err(|err| {
                debug!(error = %err, "refresh token rejected");
                AuthError::InvalidRefreshToken(err)
            })?;

        let access = self
            .signer
            .sign(&claims.sub, TokenKind::Access, now)
            .map_err(AuthError::Signing)?;
        debug!(login = %claims.sub, "access token refreshed");
        Ok(access)
    }
}

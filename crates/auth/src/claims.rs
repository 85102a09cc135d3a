use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Which half of the session pair a token is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived, authorizes requests.
    Access,
    /// Longer-lived, only used to mint new access tokens.
    Refresh,
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// JWT claims model (transport-agnostic).
///
/// The capability is self-contained: nothing here requires a store lookup to
/// be trusted once the signature checks out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the user login.
    pub sub: String,

    /// Token kind, so a refresh token can't be replayed as an access token.
    pub typ: TokenKind,

    /// Issued-at (unix seconds).
    pub iat: i64,

    /// Expiration (unix seconds).
    pub exp: i64,

    /// Unique token id.
    pub jti: Uuid,
}

impl JwtClaims {
    pub fn issued_at(&self) -> Result<DateTime<Utc>, TokenValidationError> {
        timestamp(self.iat)
    }

    pub fn expires_at(&self) -> Result<DateTime<Utc>, TokenValidationError> {
        timestamp(self.exp)
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, TokenValidationError> {
    DateTime::<Utc>::from_timestamp(secs, 0).ok_or(TokenValidationError::TimestampOutOfRange(secs))
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("token timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
}

/// Deterministically validate the time window of JWT claims.
///
/// Signature verification happens in [`crate::JwtTokenSigner::verify`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    claims.issued_at()?;
    claims.expires_at()?;
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    let now = now.timestamp();
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

//! Session token signing and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::claims::{validate_claims, JwtClaims, TokenKind, TokenValidationError};

/// Lifetimes of the two halves of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenConfig {
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenConfig {
    /// The refresh lifetime must be strictly longer than the access lifetime.
    pub fn new(access_ttl: Duration, refresh_ttl: Duration) -> Result<Self, TokenError> {
        if access_ttl <= Duration::zero() {
            return Err(TokenError::InvalidConfig("access token lifetime must be positive".to_string()));
        }
        if refresh_ttl <= access_ttl {
            return Err(TokenError::InvalidConfig(
                "refresh token lifetime must be longer than access token lifetime".to_string(),
            ));
        }
        Ok(Self { access_ttl, refresh_ttl })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::hours(24),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token configuration: {0}")]
    InvalidConfig(String),

    #[error("unable to sign token: {0}")]
    Signing(String),

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    #[error("expected a {expected} token, got a {actual} token")]
    WrongKind { expected: TokenKind, actual: TokenKind },
}

/// A freshly minted token with its validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedToken {
    pub token: String,
    pub kind: TokenKind,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SignedToken {
    pub fn validity(&self) -> Duration {
        self.expires_at - self.issued_at
    }
}

/// Access + refresh tokens minted by one authentication event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: SignedToken,
    pub refresh_token: SignedToken,
}

/// Token verification contract consumed by request middleware.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, expected: TokenKind) -> Result<JwtClaims, TokenError>;
}

/// HS256 signer for session tokens.
#[derive(Clone)]
pub struct JwtTokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    config: TokenConfig,
}

impl core::fmt::Debug for JwtTokenSigner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JwtTokenSigner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JwtTokenSigner {
    pub fn new_hs256(secret: &[u8], config: TokenConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            config,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Sign a token of `kind` for `subject`, valid from `now`.
    pub fn sign(&self, subject: &str, kind: TokenKind, now: DateTime<Utc>) -> Result<SignedToken, TokenError> {
        let expires_at = now + self.config.ttl(kind);
        let claims = JwtClaims {
            sub: subject.to_string(),
            typ: kind,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::now_v7(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        let issued_at = claims.issued_at()?;
        let expires_at = claims.expires_at()?;
        Ok(SignedToken {
            token,
            kind,
            subject: claims.sub,
            issued_at,
            expires_at,
        })
    }

    /// Mint both halves of a session. Either both are returned or none.
    pub fn mint_pair(&self, subject: &str, now: DateTime<Utc>) -> Result<SessionTokens, TokenError> {
        let access_token = self.sign(subject, TokenKind::Access, now)?;
        let refresh_token = self.sign(subject, TokenKind::Refresh, now)?;
        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    /// Verify signature, expiry and kind of a token.
    pub fn verify_at(&self, token: &str, expected: TokenKind, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against `now` below.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<JwtClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        if claims.typ != expected {
            return Err(TokenError::WrongKind {
                expected,
                actual: claims.typ,
            });
        }
        validate_claims(&claims, now)?;
        Ok(claims)
    }
}

impl TokenVerifier for JwtTokenSigner {
    fn verify(&self, token: &str, expected: TokenKind) -> Result<JwtClaims, TokenError> {
        self.verify_at(token, expected, Utc::now())
    }
}

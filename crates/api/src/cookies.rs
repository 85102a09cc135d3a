//! Session cookie encoding.
//!
//! The access token is split in two: `jwtPayload` (header.payload) stays
//! readable by the browser, `jwtSignature` is http-only. The refresh token
//! lives in an http-only cookie scoped to the refresh route.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use dashgate_auth::{SessionTokens, SignedToken};

pub const PAYLOAD_COOKIE: &str = "jwtPayload";
pub const SIGNATURE_COOKIE: &str = "jwtSignature";
pub const REFRESH_COOKIE: &str = "jwtRefreshToken";

pub const REFRESH_PATH: &str = "/api/auth/refresh";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub secure: bool,
}

impl CookieSettings {
    /// Add cookies for both halves of a freshly issued session.
    pub fn add_session(&self, jar: CookieJar, tokens: &SessionTokens) -> CookieJar {
        let jar = self.add_access(jar, &tokens.access_token);
        jar.add(self.build(REFRESH_COOKIE, tokens.refresh_token.token.clone(), &tokens.refresh_token, REFRESH_PATH, true))
    }

    /// Add the two access-token cookies.
    pub fn add_access(&self, jar: CookieJar, access: &SignedToken) -> CookieJar {
        let Some((unsigned, signature)) = access.token.rsplit_once('.') else {
            return jar;
        };
        jar.add(self.build(PAYLOAD_COOKIE, unsigned.to_string(), access, "/", false))
            .add(self.build(SIGNATURE_COOKIE, signature.to_string(), access, "/", true))
    }

    fn build(
        &self,
        name: &'static str,
        value: String,
        token: &SignedToken,
        path: &'static str,
        http_only: bool,
    ) -> Cookie<'static> {
        Cookie::build((name, value))
            .path(path)
            .http_only(http_only)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(time::Duration::seconds(token.validity().num_seconds()))
            .build()
    }
}

/// Reassemble an access token from its two cookies.
pub fn access_token_from(jar: &CookieJar) -> Option<String> {
    let payload = jar.get(PAYLOAD_COOKIE)?.value();
    let signature = jar.get(SIGNATURE_COOKIE)?.value();
    if payload.is_empty() || signature.is_empty() {
        return None;
    }
    Some(format!("{payload}.{signature}"))
}

pub fn refresh_token_from(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

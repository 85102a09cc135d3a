//! Process configuration read from `DASHGATE_*` environment variables.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use dashgate_auth::{TokenConfig, TokenError};
use dashgate_observability::LogFormat;

const DEV_JWT_SECRET: &str = "dashgate-dev-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} requires {1} to be set as well")]
    Incomplete(&'static str, &'static str),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Administrator created at startup when both credentials are configured.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub login: String,
    pub password: String,
}

impl core::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// `true` when no secret was configured and the dev default is in use.
    pub jwt_secret_is_default: bool,
    pub tokens: TokenConfig,
    pub secure_cookies: bool,
    pub admin: Option<AdminCredentials>,
    pub log_format: LogFormat,
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret_is_default", &self.jwt_secret_is_default)
            .field("tokens", &self.tokens)
            .field("secure_cookies", &self.secure_cookies)
            .field("admin", &self.admin)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset and empty values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("DASHGATE_BIND_ADDR") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| ConfigError::InvalidValue {
                key: "DASHGATE_BIND_ADDR",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let (jwt_secret, jwt_secret_is_default) = match get("DASHGATE_JWT_SECRET") {
            Some(secret) => (secret, false),
            None => (DEV_JWT_SECRET.to_string(), true),
        };

        let access = seconds(get("DASHGATE_ACCESS_TOKEN_TTL_SECS"), "DASHGATE_ACCESS_TOKEN_TTL_SECS", 900)?;
        let refresh = seconds(get("DASHGATE_REFRESH_TOKEN_TTL_SECS"), "DASHGATE_REFRESH_TOKEN_TTL_SECS", 86_400)?;
        let tokens = TokenConfig::new(access, refresh)?;

        let secure_cookies = match get("DASHGATE_SECURE_COOKIES") {
            Some(raw) => parse_bool("DASHGATE_SECURE_COOKIES", &raw)?,
            None => false,
        };

        let admin = match (get("DASHGATE_ADMIN_LOGIN"), get("DASHGATE_ADMIN_PASSWORD")) {
            (Some(login), Some(password)) => Some(AdminCredentials { login, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Incomplete("DASHGATE_ADMIN_LOGIN", "DASHGATE_ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Incomplete("DASHGATE_ADMIN_PASSWORD", "DASHGATE_ADMIN_LOGIN")),
        };

        let log_format = match get("DASHGATE_LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| {
                ConfigError::InvalidValue {
                    key: "DASHGATE_LOG_FORMAT",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => LogFormat::Json,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            jwt_secret_is_default,
            tokens,
            secure_cookies,
            admin,
            log_format,
        })
    }

    /// Test/dev configuration with the given secret and default lifetimes.
    pub fn for_secret(secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            jwt_secret: secret.into(),
            jwt_secret_is_default: false,
            tokens: TokenConfig::default(),
            secure_cookies: false,
            admin: None,
            log_format: LogFormat::Json,
        }
    }

    pub fn with_admin(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.admin = Some(AdminCredentials {
            login: login.into(),
            password: password.into(),
        });
        self
    }
}

fn seconds(raw: Option<String>, key: &'static str, default: i64) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::seconds(default));
    };
    raw.trim()
        .parse::<i64>()
        .map(Duration::seconds)
        .map_err(|e| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
        assert!(cfg.jwt_secret_is_default);
        assert_eq!(cfg.tokens.access_ttl(), Duration::seconds(900));
        assert_eq!(cfg.tokens.refresh_ttl(), Duration::seconds(86_400));
        assert!(!cfg.secure_cookies);
        assert!(cfg.admin.is_none());
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("DASHGATE_BIND_ADDR", "127.0.0.1:9000"),
            ("DASHGATE_JWT_SECRET", "s3cret"),
            ("DASHGATE_ACCESS_TOKEN_TTL_SECS", "60"),
            ("DASHGATE_REFRESH_TOKEN_TTL_SECS", "120"),
            ("DASHGATE_SECURE_COOKIES", "true"),
            ("DASHGATE_ADMIN_LOGIN", "root"),
            ("DASHGATE_ADMIN_PASSWORD", "pw"),
            ("DASHGATE_LOG_FORMAT", "pretty"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert!(!cfg.jwt_secret_is_default);
        assert_eq!(cfg.tokens.access_ttl(), Duration::seconds(60));
        assert!(cfg.secure_cookies);
        assert_eq!(cfg.admin.unwrap().login, "root");
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn refresh_must_outlive_access() {
        let err = config(&[
            ("DASHGATE_ACCESS_TOKEN_TTL_SECS", "600"),
            ("DASHGATE_REFRESH_TOKEN_TTL_SECS", "600"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Token(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(config(&[("DASHGATE_BIND_ADDR", "nowhere")]).is_err());
        assert!(config(&[("DASHGATE_SECURE_COOKIES", "maybe")]).is_err());
        assert!(config(&[("DASHGATE_ACCESS_TOKEN_TTL_SECS", "ten")]).is_err());
        assert!(matches!(
            config(&[("DASHGATE_ADMIN_LOGIN", "root")]),
            Err(ConfigError::Incomplete(..))
        ));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let cfg = config(&[("DASHGATE_JWT_SECRET", "top-secret"), ("DASHGATE_ADMIN_LOGIN", "root"), ("DASHGATE_ADMIN_PASSWORD", "hunter2")])
            .unwrap();
        let out = format!("{cfg:?}");
        assert!(!out.contains("top-secret"));
        assert!(!out.contains("hunter2"));
    }
}

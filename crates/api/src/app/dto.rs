use serde::{Deserialize, Serialize};

use dashgate_auth::{PermissionSet, SignedToken};
use dashgate_infra::Query;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// `?namePrefix=` filter of list routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub name_prefix: Option<String>,
}

impl ListParams {
    pub fn into_query(self, project: Option<&str>) -> Query {
        Query {
            project: project.map(str::to_string),
            name_prefix: self.name_prefix.filter(|p| !p.is_empty()),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: SignedToken,
}

#[derive(Debug, Serialize)]
pub struct PermissionsResponse {
    pub login: String,
    pub permissions: PermissionSet,
}

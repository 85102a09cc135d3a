//! Entity metadata shared by every persisted resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

const MAX_NAME_LEN: usize = 75;

/// Identity and bookkeeping fields of an entity.
///
/// `name` + `project` is the identity of the entity. An empty `project` means
/// the entity lives in the global scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,

    #[serde(default)]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: DateTime<Utc>,

    /// Incremented on every successful update.
    #[serde(default)]
    pub version: u64,
}

impl Metadata {
    pub fn new(project: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project: project.into(),
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
            version: 0,
        }
    }

    pub fn global(name: impl Into<String>) -> Self {
        Self::new(String::new(), name)
    }

    pub fn is_global(&self) -> bool {
        self.project.is_empty()
    }

    /// Stamp creation: both timestamps set to now, version reset.
    pub fn create_now(&mut self) {
        let now = Utc::now();
        self.created_at = now;
        self.updated_at = now;
        self.version = 0;
    }

    /// Carry immutable fields forward from the stored record and stamp the update.
    pub fn update_from(&mut self, previous: &Metadata) {
        self.created_at = previous.created_at;
        self.version = previous.version + 1;
        self.updated_at = Utc::now();
    }
}

/// Validate a resource name (or project name).
///
/// Names are 1..=75 chars of ASCII alphanumerics, `-`, `_` or `.`.
pub fn validate_name(name: &str) -> DomainResult<()> {
    if name.is_empty() {
        return Err(DomainError::invalid_id("name cannot be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(DomainError::invalid_id(format!(
            "name '{name}' exceeds {MAX_NAME_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(DomainError::invalid_id(format!(
            "name '{name}' contains illegal characters"
        )));
    }
    Ok(())
}

//! List query for the entity store.

use serde::{Deserialize, Serialize};

use dashgate_core::Metadata;

/// Filter criteria for `EntityStore::list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Restrict to one project (`Some("")` = global entities only).
    pub project: Option<String>,
    /// Keep only names starting with this prefix.
    pub name_prefix: Option<String>,
}

impl Query {
    /// Every entity, every project.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn project(project: impl Into<String>) -> Self {
        Self {
            project: Some(project.into()),
            name_prefix: None,
        }
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    pub fn matches(&self, metadata: &Metadata) -> bool {
        if let Some(project) = &self.project {
            if &metadata.project != project {
                return false;
            }
        }
        match &self.name_prefix {
            Some(prefix) => metadata.name.starts_with(prefix.as_str()),
            None => true,
        }
    }
}

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use dashgate_auth::PermissionSet;

/// Immutable, fully resolved permission mapping published by one refresh.
///
/// Snapshots are never mutated after publication; a refresh builds a new one
/// and swaps it in.
#[derive(Debug, Clone, Default)]
pub struct PermissionSnapshot {
    users: HashMap<String, PermissionSet>,
    generation: u64,
    built_at: Option<DateTime<Utc>>,
}

impl PermissionSnapshot {
    pub(crate) fn new(users: HashMap<String, PermissionSet>, generation: u64, built_at: DateTime<Utc>) -> Self {
        Self {
            users,
            generation,
            built_at: Some(built_at),
        }
    }

    /// Permissions of `login`; empty when the principal has no bindings.
    pub fn permissions(&self, login: &str) -> Option<&PermissionSet> {
        self.users.get(login)
    }

    pub fn principals(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    /// 0 for the initial empty snapshot, then increments per successful refresh.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }
}

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Verb of a permission statement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    /// Matches every action.
    #[serde(rename = "*")]
    Wildcard,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Wildcard => "*",
        }
    }

    pub fn matches(&self, requested: Action) -> bool {
        *self == Action::Wildcard || *self == requested
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A permission statement granted by a role: one action on one resource kind.
///
/// Resource kinds are opaque strings (e.g. "Dashboard"). The special kind `"*"`
/// matches every kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub action: Action,
    pub kind: Cow<'static, str>,
}

impl Permission {
    pub fn new(action: Action, kind: impl Into<Cow<'static, str>>) -> Self {
        Self {
            action,
            kind: kind.into(),
        }
    }

    /// Permission granting everything.
    pub fn wildcard() -> Self {
        Self::new(Action::Wildcard, "*")
    }

    pub fn is_wildcard_kind(&self) -> bool {
        self.kind == "*"
    }

    pub fn matches(&self, action: Action, kind: &str) -> bool {
        self.action.matches(action) && (self.is_wildcard_kind() || self.kind == kind)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.action, self.kind)
    }
}

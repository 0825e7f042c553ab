use serde::{Deserialize, Serialize};

/// The caller's identity for the lifetime of a client session.
///
/// Only the presence of a non-empty username matters to authorization; the
/// identity is never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    username: Option<String>,
}

impl SessionIdentity {
    pub fn anonymous() -> Self {
        Self { username: None }
    }

    pub fn signed_in(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// `true` iff a non-empty username is present.
    pub fn is_authenticated(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }
}

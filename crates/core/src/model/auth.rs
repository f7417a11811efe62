use serde::{Deserialize, Serialize};

/// Ephemeral authentication status. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl AuthSession {
    /// Session state after a successful sign-in.
    #[must_use]
    pub fn signed_in() -> Self {
        Self {
            is_authenticated: true,
            is_loading: false,
            error: None,
        }
    }
}

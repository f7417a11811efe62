use std::sync::Arc;

use crate::model::AuthSession;

use super::intent::AuthIntent;

/// Auth slice reducer. Signing out clears loading and error state as well.
#[must_use]
pub fn reduce(state: &Arc<AuthSession>, intent: &AuthIntent) -> Arc<AuthSession> {
    let next = match intent {
        AuthIntent::SetAuthenticated(true) => AuthSession::signed_in(),
        AuthIntent::SetAuthenticated(false) => AuthSession::default(),
        AuthIntent::SetLoading(is_loading) => AuthSession {
            is_loading: *is_loading,
            ..(**state).clone()
        },
        AuthIntent::SetError(error) => AuthSession {
            error: error
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_owned),
            is_loading: false,
            ..(**state).clone()
        },
    };
    if next == **state {
        Arc::clone(state)
    } else {
        Arc::new(next)
    }
}

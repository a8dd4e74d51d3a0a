use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

/// Mutable session state behind the store's lock. The raw token never
/// leaves this struct; views only see the derived snapshot.
#[derive(Debug)]
pub(crate) struct SessionState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    /// True from construction until the first bootstrap pass finishes,
    /// successfully or not. Views hold their splash screen on it.
    pub loading: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            token: None,
            user: None,
            loading: true,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            // Always derived from the resolved user, never stored.
            is_authenticated: self.user.is_some(),
            user: self.user.clone(),
            loading: self.loading,
        }
    }
}

/// What the view layer binds to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
    pub loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_requires_a_resolved_user() {
        let mut state = SessionState::new();
        assert!(!state.snapshot().is_authenticated);
        assert!(state.snapshot().loading);

        // A token alone is not enough until its user resolves.
        state.token = Some("tok".to_string());
        assert!(!state.snapshot().is_authenticated);

        state.user = Some(UserProfile {
            id: "u1".to_string(),
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        });
        assert!(state.snapshot().is_authenticated);
    }
}

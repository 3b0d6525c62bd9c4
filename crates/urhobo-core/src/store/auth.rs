//! Sign-in / auth slice.

use super::StoreEffect;

/// Authentication status plus the sign-in form bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub email: String,
    pub submission_started: bool,
    pub error: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Tokens from a successful login or from bootstrap.
    SetAuthData { access: String, refresh: String },
    /// Partial update of the sign-in form fields.
    UpdateSignIn {
        email: Option<String>,
        submission_started: Option<bool>,
        error: Option<Option<String>>,
    },
    Logout,
    ResetSignIn,
}

pub fn reduce(state: &mut AuthState, action: AuthAction) -> Vec<StoreEffect> {
    match action {
        AuthAction::SetAuthData { access, refresh } => {
            state.access_token = Some(access.clone());
            state.refresh_token = Some(refresh.clone());
            state.is_authenticated = true;
            state.error = None;
            vec![StoreEffect::PersistAuth { access, refresh }]
        }
        AuthAction::UpdateSignIn {
            email,
            submission_started,
            error,
        } => {
            if let Some(email) = email {
                state.email = email;
            }
            if let Some(started) = submission_started {
                state.submission_started = started;
            }
            if let Some(error) = error {
                state.error = error;
            }
            vec![]
        }
        AuthAction::Logout => {
            state.access_token = None;
            state.refresh_token = None;
            state.is_authenticated = false;
            state.email.clear();
            state.error = None;
            vec![StoreEffect::ClearPersistedSession]
        }
        AuthAction::ResetSignIn => {
            *state = AuthState::default();
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_auth_data_authenticates_and_persists() {
        let mut state = AuthState {
            error: Some("Login failed".to_string()),
            ..Default::default()
        };
        let effects = reduce(
            &mut state,
            AuthAction::SetAuthData {
                access: "a".to_string(),
                refresh: "r".to_string(),
            },
        );
        assert!(state.is_authenticated);
        assert_eq!(state.access_token.as_deref(), Some("a"));
        assert_eq!(state.error, None);
        assert_eq!(
            effects,
            vec![StoreEffect::PersistAuth {
                access: "a".to_string(),
                refresh: "r".to_string()
            }]
        );
    }

    #[test]
    fn test_logout_clears_everything() {
        let mut state = AuthState {
            email: "a@b.com".to_string(),
            access_token: Some("a".to_string()),
            refresh_token: Some("r".to_string()),
            is_authenticated: true,
            ..Default::default()
        };
        let effects = reduce(&mut state, AuthAction::Logout);
        assert!(!state.is_authenticated);
        assert!(state.access_token.is_none());
        assert!(state.refresh_token.is_none());
        assert!(state.email.is_empty());
        assert_eq!(effects, vec![StoreEffect::ClearPersistedSession]);
    }

    #[test]
    fn test_update_sign_in_is_partial() {
        let mut state = AuthState {
            email: "keep@b.com".to_string(),
            ..Default::default()
        };
        reduce(
            &mut state,
            AuthAction::UpdateSignIn {
                email: None,
                submission_started: Some(true),
                error: Some(Some("boom".to_string())),
            },
        );
        assert_eq!(state.email, "keep@b.com");
        assert!(state.submission_started);
        assert_eq!(state.error.as_deref(), Some("boom"));
    }
}

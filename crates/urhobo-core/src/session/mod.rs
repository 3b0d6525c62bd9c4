//! Shared session: application state plus its persisted scope.
//!
//! `SessionHandle` is the context object handed to every component. It
//! serializes writes through one lock, runs reducers, and executes the
//! resulting `StoreEffect`s against `SessionStorage`.

pub mod storage;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use storage::SessionStorage;
use storage::{ACCESS_TOKEN_KEY, PENDING_EMAIL_KEY, REFRESH_TOKEN_KEY, USER_KEY};

use crate::api::types::User;
use crate::store::{self, Action, AppState, AuthAction, StoreEffect, UserAction};

/// Outcome of restoring a persisted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// Tokens and user restored; the store is authenticated.
    Restored,
    /// Nothing (or only part of the session) was persisted.
    Anonymous,
    /// The persisted user could not be parsed; all session keys were removed.
    Reset,
    /// Bootstrap already ran for this handle.
    AlreadyDone,
}

struct Inner {
    state: AppState,
    storage: SessionStorage,
}

pub struct SessionHandle {
    inner: Mutex<Inner>,
    bootstrapped: AtomicBool,
}

impl SessionHandle {
    pub fn new(storage: SessionStorage) -> Self {
        Self::with_state(AppState::default(), storage)
    }

    pub fn with_state(state: AppState, storage: SessionStorage) -> Self {
        Self {
            inner: Mutex::new(Inner { state, storage }),
            bootstrapped: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one action through the reducers and executes its effects.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let mut inner = self.lock();
        let effects = store::reduce(&mut inner.state, action.into());
        for effect in effects {
            apply_effect(&mut inner.storage, effect);
        }
    }

    /// Runs several actions under one lock.
    pub fn dispatch_all(&self, actions: impl IntoIterator<Item = Action>) {
        let mut inner = self.lock();
        for action in actions {
            let effects = store::reduce(&mut inner.state, action);
            for effect in effects {
                apply_effect(&mut inner.storage, effect);
            }
        }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> AppState {
        self.lock().state.clone()
    }

    /// Reads the state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.lock().state)
    }

    pub fn access_token(&self) -> Option<String> {
        self.lock().state.auth.access_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().state.auth.is_authenticated
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock().state.user.user.clone()
    }

    /// Logout plus user clear: the reaction to an expired authorization.
    ///
    /// Removes all three persisted session keys.
    pub fn force_logout(&self) {
        tracing::info!("authorization expired, clearing session");
        self.dispatch_all([AuthAction::Logout.into(), UserAction::ClearUser.into()]);
    }

    /// Restores the session from storage. Runs at most once per handle.
    pub fn bootstrap(&self) -> Bootstrap {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return Bootstrap::AlreadyDone;
        }

        let mut inner = self.lock();
        let (Some(access), Some(refresh), Some(user_json)) = (
            inner.storage.get(ACCESS_TOKEN_KEY).map(str::to_string),
            inner.storage.get(REFRESH_TOKEN_KEY).map(str::to_string),
            inner.storage.get(USER_KEY).map(str::to_string),
        ) else {
            return Bootstrap::Anonymous;
        };

        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => {
                let actions: [Action; 2] = [
                    AuthAction::SetAuthData { access, refresh }.into(),
                    UserAction::SetUser(user).into(),
                ];
                for action in actions {
                    let effects = store::reduce(&mut inner.state, action);
                    for effect in effects {
                        apply_effect(&mut inner.storage, effect);
                    }
                }
                tracing::debug!("session restored");
                Bootstrap::Restored
            }
            Err(e) => {
                tracing::debug!(error = %e, "persisted user unreadable, resetting session");
                if let Err(e) = inner.storage.clear_session() {
                    tracing::warn!(error = %e, "failed to clear session");
                }
                Bootstrap::Reset
            }
        }
    }

    /// Remembers the email awaiting sign-up verification.
    pub fn remember_pending_email(&self, email: &str) {
        if let Err(e) = self.lock().storage.set(PENDING_EMAIL_KEY, email) {
            tracing::warn!(error = %e, "failed to persist pending email");
        }
    }

    pub fn pending_email(&self) -> Option<String> {
        self.lock()
            .storage
            .get(PENDING_EMAIL_KEY)
            .map(str::to_string)
    }

    /// Reads a raw persisted value.
    pub fn stored(&self, key: &str) -> Option<String> {
        self.lock().storage.get(key).map(str::to_string)
    }
}

/// Storage failures are logged, never surfaced: the in-memory state stays
/// authoritative.
fn apply_effect(storage: &mut SessionStorage, effect: StoreEffect) {
    let result = match effect {
        StoreEffect::PersistAuth { access, refresh } => storage
            .set(ACCESS_TOKEN_KEY, &access)
            .and_then(|()| storage.set(REFRESH_TOKEN_KEY, &refresh)),
        StoreEffect::PersistUser(json) => storage.set(USER_KEY, &json),
        StoreEffect::ClearPersistedSession => storage.clear_session(),
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "session storage write failed");
    }
}

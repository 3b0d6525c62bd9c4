//! Application state composition.
//!
//! ```text
//! AppState
//! ├── auth: AuthState         (tokens, sign-in form)
//! ├── user: UserState         (current profile)
//! ├── language: LanguageState (active interface language)
//! └── word: WordState         (word of day, search, detail)
//! ```
//!
//! Reducers are pure: they mutate their slice and return `StoreEffect`s.
//! Persistence is executed by `SessionHandle`, never by a reducer.

pub mod auth;
pub mod language;
pub mod user;
pub mod word;

pub use auth::{AuthAction, AuthState};
pub use language::{LanguageAction, LanguageState};
pub use user::{UserAction, UserState};
pub use word::{SearchPanel, WordAction, WordState};

/// Single source of truth for the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub auth: AuthState,
    pub user: UserState,
    pub language: LanguageState,
    pub word: WordState,
}

/// Actions routed to exactly one slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    User(UserAction),
    Language(LanguageAction),
    Word(WordAction),
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

impl From<UserAction> for Action {
    fn from(action: UserAction) -> Self {
        Action::User(action)
    }
}

impl From<LanguageAction> for Action {
    fn from(action: LanguageAction) -> Self {
        Action::Language(action)
    }
}

impl From<WordAction> for Action {
    fn from(action: WordAction) -> Self {
        Action::Word(action)
    }
}

/// Persistence requests emitted by reducers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEffect {
    PersistAuth { access: String, refresh: String },
    /// Serialized user JSON.
    PersistUser(String),
    /// Remove access token, refresh token and user together.
    ClearPersistedSession,
}

/// Routes an action to its slice reducer.
pub fn reduce(state: &mut AppState, action: Action) -> Vec<StoreEffect> {
    match action {
        Action::Auth(action) => auth::reduce(&mut state.auth, action),
        Action::User(action) => user::reduce(&mut state.user, action),
        Action::Language(action) => language::reduce(&mut state.language, action),
        Action::Word(action) => word::reduce(&mut state.word, action),
    }
}

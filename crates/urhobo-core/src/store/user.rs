//! Current-user slice.

use super::StoreEffect;
use crate::api::types::User;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    SetUser(User),
    ClearUser,
}

pub fn reduce(state: &mut UserState, action: UserAction) -> Vec<StoreEffect> {
    match action {
        UserAction::SetUser(user) => {
            let effects = match serde_json::to_string(&user) {
                Ok(json) => vec![StoreEffect::PersistUser(json)],
                Err(e) => {
                    tracing::warn!(error = %e, "user not persisted");
                    vec![]
                }
            };
            state.user = Some(user);
            effects
        }
        UserAction::ClearUser => {
            state.user = None;
            vec![]
        }
    }
}

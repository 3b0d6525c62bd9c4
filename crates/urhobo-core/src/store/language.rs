//! Active interface language.

use super::StoreEffect;
use crate::config::Language;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LanguageState {
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageAction {
    SetLanguage(Language),
    ToggleLanguage,
}

pub fn reduce(state: &mut LanguageState, action: LanguageAction) -> Vec<StoreEffect> {
    state.language = match action {
        LanguageAction::SetLanguage(language) => language,
        LanguageAction::ToggleLanguage => state.language.toggled(),
    };
    vec![]
}

//! Language command handlers.

use anyhow::{Context, Result};
use urhobo_core::config::{Config, Language};
use urhobo_core::store::LanguageAction;

use crate::cli::App;

pub fn show(app: &App) {
    let language = app.session.read(|state| state.language.language);
    println!("{language}");
}

pub fn set(app: &App, language: Language) -> Result<()> {
    apply(app, LanguageAction::SetLanguage(language))
}

pub fn toggle(app: &App) -> Result<()> {
    apply(app, LanguageAction::ToggleLanguage)
}

/// Changes the language in the store, then persists the result.
fn apply(app: &App, action: LanguageAction) -> Result<()> {
    app.session.dispatch(action);
    let language = app.session.read(|state| state.language.language);
    Config::save_language(language).context("save language")?;
    println!("Language set to {language}");
    Ok(())
}

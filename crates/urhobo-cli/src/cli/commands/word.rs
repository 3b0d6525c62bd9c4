//! Word of the day.

use anyhow::Result;
use urhobo_core::account;
use urhobo_core::api::types::WordOfDay;
use urhobo_core::guard::Route;

use crate::cli::App;

pub async fn word_of_day(app: &App) -> Result<()> {
    // Shown on the landing page, or on home once signed in.
    let route = if app.session.is_authenticated() {
        Route::Home
    } else {
        Route::Landing
    };
    app.enter(route).await?;

    let word = match account::word_of_day(&app.api).await {
        Ok(word) => word,
        Err(e) => {
            eprintln!("Warning: {e}");
            app.session
                .read(|state| state.word.word_of_day.clone())
                .unwrap_or_else(account::fallback_word)
        }
    };
    print_word(&word);
    Ok(())
}

fn print_word(word: &WordOfDay) {
    println!("{}", word.word);
    if !word.meaning.is_empty() {
        println!("  {}", word.meaning);
    }
    if let Some(photo) = &word.photo {
        println!("  {} ({})", photo.url, photo.kind);
    }
}

//! Search and word detail command handlers.

use anyhow::Result;
use urhobo_core::api::types::{SearchResult, Synonym, WordRecord};
use urhobo_core::guard::Route;
use urhobo_core::search::detail::paired_meanings;
use urhobo_core::search::{DetailView, Navigate, SearchSession, detail_view, open_detail};

use crate::cli::App;

pub async fn suggest(app: &App, query: &str, open: bool) -> Result<()> {
    app.enter(Route::Home).await?;

    let mut search = SearchSession::new(app.api.clone(), &app.config.search);
    search.input(query);
    search.settle().await;

    let results = search.results();
    if results.is_empty() {
        println!("No suggestions for \"{}\".", query.trim());
    } else {
        for result in &results {
            print_suggestion(result);
        }
    }

    if open && let Some(Navigate::WordDisplay { term }) = search.submit() {
        println!();
        return word(app, &term).await;
    }
    Ok(())
}

pub async fn word(app: &App, term: &str) -> Result<()> {
    app.enter(Route::WordDisplay).await?;

    // The error is recorded in the store and rendered below.
    let _ = open_detail(&app.api, term).await;

    app.session.read(|state| match detail_view(&state.word) {
        DetailView::Loading => Ok(()),
        DetailView::Error(message) => Err(anyhow::anyhow!("{message}")),
        DetailView::Records([]) => {
            println!("No entry found for \"{}\".", term.trim());
            Ok(())
        }
        DetailView::Records(records) => {
            for record in records {
                print_record(record);
            }
            Ok(())
        }
    })
}

fn print_suggestion(result: &SearchResult) {
    match result.definitions.first() {
        Some(definition) if !definition.definition.is_empty() => {
            println!("{}  {}", result.word, definition.definition);
        }
        _ => println!("{}", result.word),
    }
}

fn print_record(record: &WordRecord) {
    println!("{} ({})", record.word, record.language);
    for (index, (meaning, translation)) in paired_meanings(record).enumerate() {
        let pos = meaning.part_of_speech.join(", ");
        if pos.is_empty() {
            println!("  {}.", index + 1);
        } else {
            println!("  {}. [{pos}]", index + 1);
        }
        for definition in &meaning.definitions {
            println!("     {definition}");
        }
        for example in &meaning.examples {
            println!("     e.g. {example}");
        }
        if let Some(translation) = translation {
            println!("     → {}", translation.word);
            for definition in &translation.definitions {
                println!("       {definition}");
            }
        }
        if !meaning.synonyms.is_empty() {
            let synonyms: Vec<&str> = meaning.synonyms.iter().map(Synonym::word).collect();
            println!("     synonyms: {}", synonyms.join(", "));
        }
    }
}

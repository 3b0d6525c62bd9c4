//! Word-of-day, search and detail slice.

use std::collections::HashSet;

use super::StoreEffect;
use crate::api::types::{SearchResponse, SearchResult, WordOfDay};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordState {
    pub word_of_day: Option<WordOfDay>,
    pub search_query: String,
    /// Unique by `word`, in backend relevance order.
    pub search_results: Vec<SearchResult>,
    pub detailed_word: Option<SearchResponse>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// What the search panel shows. Exactly one source drives it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchPanel<'a> {
    Hidden,
    Loading,
    Error(&'a str),
    Results(&'a [SearchResult]),
}

impl WordState {
    /// Loading wins over error, error over results.
    pub fn panel(&self) -> SearchPanel<'_> {
        if self.is_loading {
            SearchPanel::Loading
        } else if let Some(error) = self.error.as_deref() {
            SearchPanel::Error(error)
        } else if self.search_results.is_empty() {
            SearchPanel::Hidden
        } else {
            SearchPanel::Results(&self.search_results)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WordAction {
    SetWordOfDay(WordOfDay),
    SetSearchQuery(String),
    SetSearchResults(Vec<SearchResult>),
    SetLoading(bool),
    SetError(Option<String>),
    ClearSearch,
    SetDetailedWord(Option<SearchResponse>),
}

pub fn reduce(state: &mut WordState, action: WordAction) -> Vec<StoreEffect> {
    match action {
        WordAction::SetWordOfDay(word) => {
            state.word_of_day = Some(word);
            state.error = None;
        }
        WordAction::SetSearchQuery(query) => {
            if query.trim().is_empty() {
                state.search_results.clear();
            }
            state.search_query = query;
        }
        WordAction::SetSearchResults(results) => {
            state.search_results = dedup_by_word(results);
            state.error = None;
        }
        WordAction::SetLoading(loading) => state.is_loading = loading,
        WordAction::SetError(error) => state.error = error,
        WordAction::ClearSearch => {
            state.search_results.clear();
            state.search_query.clear();
            state.error = None;
        }
        WordAction::SetDetailedWord(detail) => state.detailed_word = detail,
    }
    vec![]
}

/// Keeps the first occurrence of each word string, preserving order.
pub fn dedup_by_word(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|result| seen.insert(result.word.clone()))
        .collect()
}

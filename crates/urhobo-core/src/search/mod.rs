//! Search: debounced suggestions, navigation, and word detail.
//!
//! `SearchEngine` is the pure half: it turns input into `WordAction`s and a
//! `SearchEffect` describing the fetch to run. `SearchSession` runs those
//! effects on tokio and feeds results back through the engine.

pub mod detail;
pub mod request_id;
pub mod session;

use std::time::Duration;

pub use detail::{DetailView, detail_view, open_detail};
pub use request_id::{LatestOnly, RequestId};
pub use session::SearchSession;

use crate::api::ApiResult;
use crate::api::types::SearchResult;
use crate::store::{WordAction, WordState};

/// Fetch requested by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEffect {
    /// Nothing to fetch.
    None,
    /// Fetch suggestions for `query` after `delay`, tagged with `id`.
    Schedule {
        id: RequestId,
        query: String,
        delay: Duration,
    },
}

/// Where the caller should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigate {
    WordDisplay { term: String },
}

/// Query handling and latest-only result application.
#[derive(Debug)]
pub struct SearchEngine {
    requests: LatestOnly,
    debounce: Duration,
}

impl SearchEngine {
    pub fn new(debounce: Duration) -> Self {
        Self {
            requests: LatestOnly::default(),
            debounce,
        }
    }

    /// Records a query change.
    ///
    /// A blank query clears the results right away and supersedes any
    /// pending fetch; otherwise a debounced fetch is scheduled.
    pub fn set_query(&mut self, query: &str) -> (Vec<WordAction>, SearchEffect) {
        let actions = vec![WordAction::SetSearchQuery(query.to_string())];
        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.requests.cancel();
            return (actions, SearchEffect::None);
        }

        let id = self.requests.begin();
        let effect = SearchEffect::Schedule {
            id,
            query: trimmed.to_string(),
            delay: self.debounce,
        };
        (actions, effect)
    }

    /// Applies a suggestion result if `id` is still the latest request.
    ///
    /// Failed fetches leave the current results in place.
    pub fn apply_suggestions(
        &mut self,
        id: RequestId,
        result: ApiResult<Vec<SearchResult>>,
    ) -> Vec<WordAction> {
        if !self.requests.finish_if_active(id) {
            tracing::debug!(?id, "discarding stale suggestions");
            return vec![];
        }
        match result {
            Ok(results) => vec![WordAction::SetSearchResults(results)],
            Err(e) => {
                tracing::debug!(error = %e, "suggestion fetch failed");
                vec![]
            }
        }
    }

    /// True while a scheduled fetch has not been applied or superseded.
    pub fn is_pending(&self) -> bool {
        self.requests.has_active()
    }

    /// Enter on the search box: first suggestion, else the typed text.
    pub fn submit(state: &WordState) -> Option<Navigate> {
        let query = state.search_query.trim();
        if query.is_empty() {
            return None;
        }
        let term = state
            .search_results
            .first()
            .map_or(query, |result| result.word.as_str());
        Some(Navigate::WordDisplay {
            term: term.to_string(),
        })
    }

    pub fn select(result: &SearchResult) -> Navigate {
        Navigate::WordDisplay {
            term: result.word.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::store::word;

    fn result(id: i64, word: &str) -> SearchResult {
        SearchResult {
            id,
            word: word.to_string(),
            ..Default::default()
        }
    }

    fn apply(state: &mut WordState, actions: Vec<WordAction>) {
        for action in actions {
            word::reduce(state, action);
        }
    }

    fn scheduled(effect: SearchEffect) -> RequestId {
        match effect {
            SearchEffect::Schedule { id, .. } => id,
            SearchEffect::None => panic!("expected a scheduled fetch"),
        }
    }

    #[test]
    fn test_query_schedules_debounced_fetch() {
        let mut engine = SearchEngine::new(Duration::from_millis(50));
        let (actions, effect) = engine.set_query("  ame ");
        assert_eq!(actions, vec![WordAction::SetSearchQuery("  ame ".to_string())]);
        assert!(matches!(
            effect,
            SearchEffect::Schedule { ref query, delay, .. }
                if query == "ame" && delay == Duration::from_millis(50)
        ));
        assert!(engine.is_pending());
    }

    #[test]
    fn test_empty_query_clears_without_fetch() {
        let mut engine = SearchEngine::new(Duration::ZERO);
        let mut state = WordState {
            search_query: "am".to_string(),
            search_results: vec![result(1, "ame")],
            ..Default::default()
        };
        let (actions, effect) = engine.set_query("");
        apply(&mut state, actions);
        assert_eq!(effect, SearchEffect::None);
        assert!(state.search_results.is_empty());
        assert!(!engine.is_pending());
    }

    #[test]
    fn test_out_of_order_results_are_discarded() {
        let mut engine = SearchEngine::new(Duration::ZERO);
        let mut state = WordState::default();

        let first = scheduled(engine.set_query("a").1);
        let second = scheduled(engine.set_query("am").1);

        apply(
            &mut state,
            engine.apply_suggestions(second, Ok(vec![result(1, "ame")])),
        );
        apply(
            &mut state,
            engine.apply_suggestions(first, Ok(vec![result(2, "abo")])),
        );
        assert_eq!(state.search_results, vec![result(1, "ame")]);
    }

    #[test]
    fn test_results_after_clear_are_discarded() {
        let mut engine = SearchEngine::new(Duration::ZERO);
        let mut state = WordState::default();
        let id = scheduled(engine.set_query("a").1);
        apply(&mut state, engine.set_query("").0);

        let actions = engine.apply_suggestions(id, Ok(vec![result(1, "abo")]));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_failed_fetch_keeps_results() {
        let mut engine = SearchEngine::new(Duration::ZERO);
        let id = scheduled(engine.set_query("a").1);
        let actions = engine.apply_suggestions(id, Err(ApiError::network()));
        assert!(actions.is_empty());
        assert!(!engine.is_pending());
    }

    #[test]
    fn test_applied_results_are_unique_by_word() {
        let mut engine = SearchEngine::new(Duration::ZERO);
        let mut state = WordState::default();
        let id = scheduled(engine.set_query("o").1);
        apply(
            &mut state,
            engine.apply_suggestions(
                id,
                Ok(vec![result(1, "omo"), result(2, "ovo"), result(3, "omo")]),
            ),
        );
        let words: Vec<&str> = state.search_results.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["omo", "ovo"]);
    }

    #[test]
    fn test_submit_prefers_first_result() {
        let mut state = WordState {
            search_query: "am".to_string(),
            search_results: vec![result(1, "ame"), result(2, "amo")],
            ..Default::default()
        };
        assert_eq!(
            SearchEngine::submit(&state),
            Some(Navigate::WordDisplay {
                term: "ame".to_string()
            })
        );

        state.search_results.clear();
        assert_eq!(
            SearchEngine::submit(&state),
            Some(Navigate::WordDisplay {
                term: "am".to_string()
            })
        );

        state.search_query = "  ".to_string();
        assert_eq!(SearchEngine::submit(&state), None);
    }

    #[test]
    fn test_select_uses_result_word() {
        assert_eq!(
            SearchEngine::select(&result(7, "ovo")),
            Navigate::WordDisplay {
                term: "ovo".to_string()
            }
        );
    }
}

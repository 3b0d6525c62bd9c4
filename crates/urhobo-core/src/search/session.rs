//! Async runtime for the suggestion dropdown.
//!
//! Every keystroke supersedes the previous one: its pending timer (and the
//! fetch behind it, if already started) is cancelled, and whatever still
//! arrives late is discarded by the engine's request id check.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{Navigate, RequestId, SearchEffect, SearchEngine};
use crate::api::types::SearchResult;
use crate::api::{ApiClient, ApiResult};
use crate::config::SearchConfig;
use crate::store::Action;

struct SuggestionsReady {
    id: RequestId,
    result: ApiResult<Vec<SearchResult>>,
}

pub struct SearchSession {
    api: ApiClient,
    engine: SearchEngine,
    pending: Option<CancellationToken>,
    tx: mpsc::Sender<SuggestionsReady>,
    rx: mpsc::Receiver<SuggestionsReady>,
}

impl SearchSession {
    pub fn new(api: ApiClient, config: &SearchConfig) -> Self {
        let (tx, rx) = mpsc::channel(16);
        Self {
            api,
            engine: SearchEngine::new(config.debounce()),
            pending: None,
            tx,
            rx,
        }
    }

    /// Handles a query change. Must be called inside a tokio runtime.
    pub fn input(&mut self, query: &str) {
        if let Some(cancel) = self.pending.take() {
            cancel.cancel();
        }

        let (actions, effect) = self.engine.set_query(query);
        self.api
            .session()
            .dispatch_all(actions.into_iter().map(Action::from));

        let SearchEffect::Schedule { id, query, delay } = effect else {
            return;
        };

        let cancel = CancellationToken::new();
        self.pending = Some(cancel.clone());
        let api = self.api.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => return,
                () = tokio::time::sleep(delay) => {}
            }
            let result = tokio::select! {
                () = cancel.cancelled() => return,
                result = api.autocomplete(&query) => result,
            };
            let _ = tx.send(SuggestionsReady { id, result }).await;
        });
    }

    /// True while a fetch is scheduled or in flight.
    pub fn is_pending(&self) -> bool {
        self.engine.is_pending()
    }

    /// Applies every result that has already arrived.
    ///
    /// Returns how many were applied (stale ones are not counted).
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(ready) = self.rx.try_recv() {
            applied += usize::from(self.apply(ready));
        }
        applied
    }

    /// Waits for the pending fetch to resolve and applies it.
    ///
    /// Returns `false` right away when nothing is pending.
    pub async fn settle(&mut self) -> bool {
        while self.engine.is_pending() {
            let Some(ready) = self.rx.recv().await else {
                return false;
            };
            if self.apply(ready) {
                return true;
            }
        }
        false
    }

    /// Current (de-duplicated) suggestions.
    pub fn results(&self) -> Vec<SearchResult> {
        self.api.session().read(|state| state.word.search_results.clone())
    }

    /// Enter on the search box.
    pub fn submit(&self) -> Option<Navigate> {
        self.api
            .session()
            .read(|state| SearchEngine::submit(&state.word))
    }

    fn apply(&mut self, ready: SuggestionsReady) -> bool {
        let actions = self.engine.apply_suggestions(ready.id, ready.result);
        let applied = !actions.is_empty();
        self.api
            .session()
            .dispatch_all(actions.into_iter().map(Action::from));
        applied
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        if let Some(cancel) = self.pending.take() {
            cancel.cancel();
        }
    }
}

//! Word detail: full records for one term.

use crate::api::types::{Meaning, SearchResponse, Translation, WordRecord};
use crate::api::{ApiClient, ApiResult};
use crate::store::{WordAction, WordState};

/// What the detail page shows. Loading and error hide the records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailView<'a> {
    Loading,
    Error(&'a str),
    Records(&'a [WordRecord]),
}

pub fn detail_view(state: &WordState) -> DetailView<'_> {
    if state.is_loading {
        DetailView::Loading
    } else if let Some(error) = state.error.as_deref() {
        DetailView::Error(error)
    } else {
        DetailView::Records(
            state
                .detailed_word
                .as_ref()
                .map(|detail| detail.records.as_slice())
                .unwrap_or_default(),
        )
    }
}

/// Fetches full records for `term` into the store.
///
/// # Errors
/// Returns the backend error after recording it and clearing the detail.
pub async fn open_detail(api: &ApiClient, term: &str) -> ApiResult<SearchResponse> {
    let session = api.session();
    session.dispatch_all([
        WordAction::SetLoading(true).into(),
        WordAction::SetError(None).into(),
    ]);

    let result = api.search(term.trim()).await;
    match &result {
        Ok(response) => {
            tracing::debug!(term, records = response.records.len(), "detail loaded");
            session.dispatch_all([
                WordAction::SetDetailedWord(Some(response.clone())).into(),
                WordAction::SetLoading(false).into(),
            ]);
        }
        Err(e) => {
            session.dispatch_all([
                WordAction::SetError(Some(e.message.clone())).into(),
                WordAction::SetDetailedWord(None).into(),
                WordAction::SetLoading(false).into(),
            ]);
        }
    }
    result
}

/// Each meaning with the translation at the same position.
pub fn paired_meanings(
    record: &WordRecord,
) -> impl Iterator<Item = (&Meaning, Option<&Translation>)> {
    record
        .meanings
        .iter()
        .enumerate()
        .map(|(index, meaning)| (meaning, record.counterpart(index)))
}

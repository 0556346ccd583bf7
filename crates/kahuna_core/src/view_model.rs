use crate::{DetailState, FetchFailure, FetchState, ResultItem, SearchParams, StreamId};

/// Everything the presentation layer reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub query: String,
    pub since: String,
    pub stream_id: Option<StreamId>,
    pub params: Option<SearchParams>,
    pub fetch_state: FetchState,
    pub items: Vec<ResultItem>,
    pub last_error: Option<FetchFailure>,
    pub detail: DetailState,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn item_uris(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.uri.as_str()).collect()
    }
}

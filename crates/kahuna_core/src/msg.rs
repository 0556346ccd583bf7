use crate::{
    FetchFailure, FetchKind, NavigationState, RequestId, ResultItem, SearchParams, StreamId,
    ViewportSignal,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Navigation was entered; re-seed the search form without emitting edits.
    FormSynced(NavigationState),
    /// User edited the query text box.
    QueryEdited(String),
    /// User edited the since filter text box.
    SinceEdited(String),
    /// The merged navigation parameters changed.
    ParamsChanged(SearchParams),
    /// The viewport sensor reported a new signal.
    ViewportMeasured(ViewportSignal),
    /// Engine completion for a search issued by `stream_id`.
    SearchCompleted {
        stream_id: StreamId,
        kind: FetchKind,
        result: Result<Vec<ResultItem>, FetchFailure>,
    },
    /// User opened a single image.
    ImageRequested { image_id: String },
    /// Engine completion for an image lookup.
    ImageLoaded {
        request_id: RequestId,
        result: Result<ResultItem, FetchFailure>,
    },
    /// User left the detail view.
    ImageClosed,
}

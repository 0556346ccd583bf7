use crate::{FetchKind, NavigationUpdate, RequestId, SearchRequest, StreamId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Push a partial update into the navigation state (URL).
    Navigate(NavigationUpdate),
    Search {
        stream_id: StreamId,
        kind: FetchKind,
        request: SearchRequest,
    },
    FindImage {
        request_id: RequestId,
        image_id: String,
    },
}

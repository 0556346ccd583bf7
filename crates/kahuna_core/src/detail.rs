use crate::{FetchFailure, ResultItem};

/// Identifies one image lookup; only the latest one may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl RequestId {
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Closed,
    Loading {
        request_id: RequestId,
        image_id: String,
    },
    Loaded(ResultItem),
    Failed {
        image_id: String,
        failure: FetchFailure,
    },
}

use std::collections::HashSet;
use std::fmt;

use kahuna_logging::{kahuna_debug, kahuna_warn};

use crate::{ResultItem, SearchParams, Timestamp};

/// Generation number of a result stream. Every params change allocates a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StreamId(u64);

impl StreamId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    FetchingInitial,
    Ready,
    FetchingMore,
    /// An append returned nothing new; only a params change restarts loading.
    Exhausted,
    /// The initial fetch failed and there is nothing to show.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    More,
}

/// One call to the catalog search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub since: Option<Timestamp>,
    /// Exclusive upper bound: only strictly older items are wanted.
    pub until: Option<Timestamp>,
    pub page_size: u32,
}

/// Accumulated results for exactly one [`SearchParams`] snapshot.
///
/// Items are unique by `uri` and ordered newest first. At most one fetch is
/// in flight; `fetch_state` is the guard.
#[derive(Debug, Clone)]
pub struct ResultStream {
    id: StreamId,
    params: SearchParams,
    items: Vec<ResultItem>,
    seen: HashSet<String>,
    fetch_state: FetchState,
}

impl ResultStream {
    pub(crate) fn new(id: StreamId, params: SearchParams) -> Self {
        Self {
            id,
            params,
            items: Vec::new(),
            seen: HashSet::new(),
            fetch_state: FetchState::Idle,
        }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetch_state
    }

    pub fn oldest(&self) -> Option<&ResultItem> {
        self.items.last()
    }

    /// Whether a completion of `kind` is the one this stream is waiting for.
    pub fn awaiting(&self, kind: FetchKind) -> bool {
        matches!(
            (self.fetch_state, kind),
            (FetchState::FetchingInitial, FetchKind::Initial)
                | (FetchState::FetchingMore, FetchKind::More)
        )
    }

    pub(crate) fn begin_initial(&mut self, page_size: u32) -> SearchRequest {
        self.fetch_state = FetchState::FetchingInitial;
        SearchRequest {
            query: self.params.query.clone(),
            since: self.params.since.clone(),
            until: None,
            page_size,
        }
    }

    pub(crate) fn apply_initial(&mut self, mut page: Vec<ResultItem>) -> usize {
        // Stable, so a page already in server order is untouched.
        page.sort_by(|a, b| b.upload_time.cmp(&a.upload_time));
        self.items.clear();
        self.seen.clear();
        for item in page {
            if self.seen.insert(item.uri.clone()) {
                self.items.push(item);
            }
        }
        self.fetch_state = FetchState::Ready;
        self.items.len()
    }

    /// Start an append fetch for items older than the oldest one held.
    /// Returns `None` while another fetch is pending, once exhausted, or when
    /// there is nothing to page from.
    pub(crate) fn begin_more(&mut self, page_size: u32) -> Option<SearchRequest> {
        if self.fetch_state != FetchState::Ready {
            return None;
        }
        let until = self.oldest()?.upload_time.clone();
        self.fetch_state = FetchState::FetchingMore;
        Some(SearchRequest {
            query: self.params.query.clone(),
            since: self.params.since.clone(),
            until: Some(until),
            page_size,
        })
    }

    /// Append the unseen part of `page`. Zero net-new items exhausts the stream.
    pub(crate) fn apply_more(&mut self, page: Vec<ResultItem>) -> usize {
        let fetched = page.len();
        let mut floor = match self.oldest() {
            Some(oldest) => oldest.upload_time.clone(),
            None => {
                self.fetch_state = FetchState::Ready;
                return 0;
            }
        };

        let mut added = 0;
        for item in page {
            if item.upload_time > floor {
                kahuna_warn!(
                    "stream {}: dropping out-of-order item {} ({} newer than {})",
                    self.id,
                    item.uri,
                    item.upload_time,
                    floor
                );
                continue;
            }
            if !self.seen.insert(item.uri.clone()) {
                continue;
            }
            floor = item.upload_time.clone();
            self.items.push(item);
            added += 1;
        }

        kahuna_debug!(
            "stream {}: appended {} of {} fetched items",
            self.id,
            added,
            fetched
        );
        self.fetch_state = if added == 0 {
            FetchState::Exhausted
        } else {
            FetchState::Ready
        };
        added
    }

    pub(crate) fn fail(&mut self) {
        self.fetch_state = match self.fetch_state {
            FetchState::FetchingInitial => FetchState::Failed,
            FetchState::FetchingMore => FetchState::Ready,
            other => other,
        };
    }
}

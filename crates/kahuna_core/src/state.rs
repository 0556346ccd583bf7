use kahuna_logging::{kahuna_debug, kahuna_info};

use crate::view_model::AppViewModel;
use crate::{
    DetailState, FetchFailure, FetchState, NavigationState, RequestId, ResultItem, ResultStream,
    SearchForm, SearchParams, SearchRequest, StreamId, ViewportSignal,
};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone)]
pub struct AppState {
    form: SearchForm,
    stream: Option<ResultStream>,
    last_stream_id: StreamId,
    viewport: ViewportSignal,
    page_size: u32,
    detail: DetailState,
    last_request_id: RequestId,
    last_error: Option<FetchFailure>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A zero page size falls back to [`DEFAULT_PAGE_SIZE`].
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            form: SearchForm::default(),
            stream: None,
            last_stream_id: StreamId::default(),
            viewport: ViewportSignal::default(),
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            detail: DetailState::Closed,
            last_request_id: RequestId::default(),
            last_error: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            query: self.form.query().to_string(),
            since: self.form.since().to_string(),
            stream_id: self.stream.as_ref().map(ResultStream::id),
            params: self.stream.as_ref().map(|stream| stream.params().clone()),
            fetch_state: self.fetch_state(),
            items: self.items().to_vec(),
            last_error: self.last_error.clone(),
            detail: self.detail.clone(),
            dirty: self.dirty,
        }
    }

    pub fn stream(&self) -> Option<&ResultStream> {
        self.stream.as_ref()
    }

    pub fn items(&self) -> &[ResultItem] {
        self.stream.as_ref().map_or(&[][..], ResultStream::items)
    }

    pub fn fetch_state(&self) -> FetchState {
        self.stream
            .as_ref()
            .map_or(FetchState::Idle, ResultStream::fetch_state)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn viewport(&self) -> ViewportSignal {
        self.viewport
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    pub fn last_error(&self) -> Option<&FetchFailure> {
        self.last_error.as_ref()
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn form_mut(&mut self) -> &mut SearchForm {
        &mut self.form
    }

    pub(crate) fn sync_form(&mut self, navigation: &NavigationState) {
        self.form = SearchForm::from_navigation(navigation);
        self.mark_dirty();
    }

    pub(crate) fn set_viewport(&mut self, signal: ViewportSignal) {
        self.viewport = signal;
    }

    /// Whether `params` should abandon the current stream. Identical params
    /// only restart a stream whose initial fetch failed.
    pub(crate) fn needs_new_stream(&self, params: &SearchParams) -> bool {
        match &self.stream {
            Some(stream) => {
                stream.params() != params || stream.fetch_state() == FetchState::Failed
            }
            None => true,
        }
    }

    /// Abandon the current stream and start a fresh one keyed to `params`.
    pub(crate) fn start_stream(&mut self, params: SearchParams) -> (StreamId, SearchRequest) {
        let id = self.last_stream_id.next();
        self.last_stream_id = id;
        if let Some(previous) = &self.stream {
            kahuna_debug!(
                "abandoning stream {} in state {:?} with {} items",
                previous.id(),
                previous.fetch_state(),
                previous.items().len()
            );
        }
        kahuna_info!(
            "stream {}: query={:?} since={:?}",
            id,
            params.query,
            params.since.as_ref().map(|since| since.as_str())
        );
        let mut stream = ResultStream::new(id, params);
        let request = stream.begin_initial(self.page_size);
        self.stream = Some(stream);
        // The old signal described the abandoned content.
        self.viewport = ViewportSignal::default();
        self.last_error = None;
        self.mark_dirty();
        (id, request)
    }

    /// The current stream, but only if it is `id`.
    pub(crate) fn stream_mut(&mut self, id: StreamId) -> Option<&mut ResultStream> {
        self.stream.as_mut().filter(|stream| stream.id() == id)
    }

    pub(crate) fn begin_more(&mut self) -> Option<(StreamId, SearchRequest)> {
        let page_size = self.page_size;
        let stream = self.stream.as_mut()?;
        let request = stream.begin_more(page_size)?;
        self.dirty = true;
        Some((stream.id(), request))
    }

    pub(crate) fn set_error(&mut self, failure: Option<FetchFailure>) {
        self.last_error = failure;
        self.mark_dirty();
    }

    pub(crate) fn open_detail(&mut self, image_id: String) -> RequestId {
        let request_id = self.last_request_id.next();
        self.last_request_id = request_id;
        self.detail = DetailState::Loading {
            request_id,
            image_id,
        };
        self.mark_dirty();
        request_id
    }

    /// Applies a lookup result if it answers the pending request.
    pub(crate) fn apply_detail(
        &mut self,
        request_id: RequestId,
        result: Result<ResultItem, FetchFailure>,
    ) -> bool {
        let image_id = match &self.detail {
            DetailState::Loading {
                request_id: pending,
                image_id,
            } if *pending == request_id => image_id.clone(),
            _ => return false,
        };
        self.detail = match result {
            Ok(item) => DetailState::Loaded(item),
            Err(failure) => DetailState::Failed { image_id, failure },
        };
        self.mark_dirty();
        true
    }

    pub(crate) fn close_detail(&mut self) {
        if self.detail != DetailState::Closed {
            self.detail = DetailState::Closed;
            self.mark_dirty();
        }
    }
}

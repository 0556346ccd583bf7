use std::collections::HashMap;
use std::time::Duration;

use kahuna_core::{
    Effect, FailureKind, FetchFailure, FetchKind, Msg, NavigationUpdate, RequestId, ResultItem,
    SearchRequest, StreamId,
};
use kahuna_engine::{ApiError, EngineEvent, EngineHandle, ImageResource, SearchOptions, Ticket};
use kahuna_logging::{kahuna_debug, kahuna_info, kahuna_warn};

/// What a ticket was issued for, so its completion can be routed back.
#[derive(Debug, Clone, Copy)]
enum Pending {
    Search { stream_id: StreamId, kind: FetchKind },
    Find { request_id: RequestId },
}

/// Executes core effects on the engine and turns engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
    pending: HashMap<Ticket, Pending>,
    last_ticket: Ticket,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            pending: HashMap::new(),
            last_ticket: 0,
        }
    }

    /// Sends IO effects to the engine and hands navigation updates back to
    /// the caller, which owns the navigation state.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<NavigationUpdate> {
        let mut navigation = Vec::new();
        for effect in effects {
            match effect {
                Effect::Navigate(update) => navigation.push(update),
                Effect::Search {
                    stream_id,
                    kind,
                    request,
                } => {
                    let ticket = self.issue(Pending::Search { stream_id, kind });
                    kahuna_info!(
                        "Search ticket={} stream={} kind={:?} until={:?}",
                        ticket,
                        stream_id,
                        kind,
                        request.until.as_ref().map(|until| until.as_str())
                    );
                    let (query, options) = search_options(request);
                    self.engine.search(ticket, query, options);
                }
                Effect::FindImage {
                    request_id,
                    image_id,
                } => {
                    let ticket = self.issue(Pending::Find { request_id });
                    kahuna_info!("FindImage ticket={} id={}", ticket, image_id);
                    self.engine.find(ticket, image_id);
                }
            }
        }
        navigation
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn try_next_msg(&mut self) -> Option<Msg> {
        while let Some(event) = self.engine.try_recv() {
            if let Some(msg) = self.translate(event) {
                return Some(msg);
            }
        }
        None
    }

    pub fn next_msg_timeout(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        self.translate(event)
    }

    fn issue(&mut self, pending: Pending) -> Ticket {
        self.last_ticket += 1;
        self.pending.insert(self.last_ticket, pending);
        self.last_ticket
    }

    fn translate(&mut self, event: EngineEvent) -> Option<Msg> {
        let (ticket, pending) = match &event {
            EngineEvent::SearchCompleted { ticket, .. } | EngineEvent::FindCompleted { ticket, .. } => {
                (*ticket, self.pending.remove(ticket))
            }
        };
        let Some(pending) = pending else {
            kahuna_warn!("engine event for unknown ticket {}", ticket);
            return None;
        };

        match (pending, event) {
            (Pending::Search { stream_id, kind }, EngineEvent::SearchCompleted { result, .. }) => {
                let result = result
                    .map(|images| images.into_iter().map(to_result_item).collect())
                    .map_err(to_failure);
                Some(Msg::SearchCompleted {
                    stream_id,
                    kind,
                    result,
                })
            }
            (Pending::Find { request_id }, EngineEvent::FindCompleted { result, .. }) => {
                Some(Msg::ImageLoaded {
                    request_id,
                    result: result.map(to_result_item).map_err(to_failure),
                })
            }
            (pending, _) => {
                kahuna_debug!("ticket {} completed with mismatched event for {:?}", ticket, pending);
                None
            }
        }
    }
}

fn search_options(request: SearchRequest) -> (String, SearchOptions) {
    let options = SearchOptions {
        since: request.since.map(|since| since.as_str().to_string()),
        until: request.until.map(|until| until.as_str().to_string()),
        page_size: request.page_size,
    };
    (request.query, options)
}

pub(crate) fn to_result_item(image: ImageResource) -> ResultItem {
    ResultItem::new(image.uri, image.upload_time).with_metadata(image.raw)
}

pub(crate) fn to_failure(err: ApiError) -> FetchFailure {
    let kind = match &err {
        ApiError::Status { status } | ApiError::Decode { status, .. } => {
            FailureKind::Api { status: *status }
        }
        ApiError::NotFound { .. } => FailureKind::NotFound,
        ApiError::InvalidBaseUri { .. }
        | ApiError::Network(_)
        | ApiError::Timeout(_)
        | ApiError::TooLarge { .. } => FailureKind::Network,
    };
    FetchFailure::new(kind, err.to_string())
}

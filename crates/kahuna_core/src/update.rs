use kahuna_logging::{kahuna_debug, kahuna_warn};

use crate::{AppState, Effect, FetchFailure, FetchKind, Msg, ResultItem, StreamId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FormSynced(navigation) => {
            state.sync_form(&navigation);
            Vec::new()
        }
        Msg::QueryEdited(text) => {
            let edit = state.form_mut().edit_query(text);
            if edit.is_some() {
                state.mark_dirty();
            }
            edit.map(Effect::Navigate).into_iter().collect()
        }
        Msg::SinceEdited(text) => {
            let edit = state.form_mut().edit_since(text);
            if edit.is_some() {
                state.mark_dirty();
            }
            edit.map(Effect::Navigate).into_iter().collect()
        }
        Msg::ParamsChanged(params) => {
            if !state.needs_new_stream(&params) {
                return (state, Vec::new());
            }
            let (stream_id, request) = state.start_stream(params);
            vec![Effect::Search {
                stream_id,
                kind: FetchKind::Initial,
                request,
            }]
        }
        Msg::ViewportMeasured(signal) => {
            state.set_viewport(signal);
            if signal.wants_more() {
                request_more(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::SearchCompleted {
            stream_id,
            kind,
            result,
        } => search_completed(&mut state, stream_id, kind, result),
        Msg::ImageRequested { image_id } => {
            let request_id = state.open_detail(image_id.clone());
            vec![Effect::FindImage {
                request_id,
                image_id,
            }]
        }
        Msg::ImageLoaded { request_id, result } => {
            if !state.apply_detail(request_id, result) {
                kahuna_debug!("discarding stale image lookup {:?}", request_id);
            }
            Vec::new()
        }
        Msg::ImageClosed => {
            state.close_detail();
            Vec::new()
        }
    };

    (state, effects)
}

fn search_completed(
    state: &mut AppState,
    stream_id: StreamId,
    kind: FetchKind,
    result: Result<Vec<ResultItem>, FetchFailure>,
) -> Vec<Effect> {
    let Some(stream) = state
        .stream_mut(stream_id)
        .filter(|stream| stream.awaiting(kind))
    else {
        kahuna_debug!("discarding stale {:?} completion for stream {}", kind, stream_id);
        return Vec::new();
    };

    match result {
        Ok(page) => {
            match kind {
                FetchKind::Initial => {
                    let count = stream.apply_initial(page);
                    kahuna_debug!("stream {}: initial page with {} items", stream_id, count);
                }
                FetchKind::More => {
                    stream.apply_more(page);
                }
            }
            state.set_error(None);
            // Chained fill: keep loading while the content leaves slack space.
            if state.viewport().has_slack_space {
                request_more(state)
            } else {
                Vec::new()
            }
        }
        Err(failure) => {
            kahuna_warn!(
                "stream {}: {:?} fetch failed: {}",
                stream_id,
                kind,
                failure
            );
            stream.fail();
            state.set_error(Some(failure));
            Vec::new()
        }
    }
}

fn request_more(state: &mut AppState) -> Vec<Effect> {
    match state.begin_more() {
        Some((stream_id, request)) => vec![Effect::Search {
            stream_id,
            kind: FetchKind::More,
            request,
        }],
        None => Vec::new(),
    }
}

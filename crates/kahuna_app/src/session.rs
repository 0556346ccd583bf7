use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use kahuna_core::{
    update, AppState, AppViewModel, Geometry, Msg, NavigationState, ViewportSensor,
};
use kahuna_engine::{ApiError, EngineHandle, MediaApi, ReqwestMediaApi};
use kahuna_logging::kahuna_debug;

use crate::config::{AppConfig, ConfigError};
use crate::effects::EffectRunner;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("media api client: {0}")]
    Api(#[from] ApiError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// One browsing session: the presentation boundary of the client.
///
/// The host forwards user edits and container geometry in, pumps engine
/// completions, and renders [`Session::view`]. All state changes go through
/// the core `update` function on the caller's thread.
pub struct Session {
    state: AppState,
    navigation: NavigationState,
    sensor: ViewportSensor,
    runner: EffectRunner,
}

impl Session {
    /// Session against the HTTP media API named in `config`.
    pub fn connect(config: &AppConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let api = ReqwestMediaApi::new(config.api_settings())?;
        Self::with_api(config, Arc::new(api))
    }

    pub fn with_api(config: &AppConfig, api: Arc<dyn MediaApi>) -> Result<Self, SessionError> {
        let engine = EngineHandle::new(api)?;
        Ok(Self {
            state: AppState::with_page_size(config.page_size),
            navigation: NavigationState::new(),
            sensor: ViewportSensor::new(config.bottom_tolerance()),
            runner: EffectRunner::new(engine),
        })
    }

    /// Enter the results view from a URL query string (`query=..&since=..`).
    pub fn open_results(&mut self, query_string: &str) {
        self.navigation = NavigationState::from_query_string(query_string);
        self.dispatch(Msg::FormSynced(self.navigation.clone()));
        self.sensor.reset();
        self.dispatch(Msg::ParamsChanged(self.navigation.params()));
    }

    pub fn edit_query(&mut self, text: impl Into<String>) {
        self.dispatch(Msg::QueryEdited(text.into()));
    }

    pub fn edit_since(&mut self, text: impl Into<String>) {
        self.dispatch(Msg::SinceEdited(text.into()));
    }

    /// Feed a fresh measurement of the scroll container.
    pub fn report_geometry(&mut self, geometry: Geometry) {
        if let Some(signal) = self.sensor.measure(geometry) {
            self.dispatch(Msg::ViewportMeasured(signal));
        }
    }

    pub fn open_image(&mut self, image_id: impl Into<String>) {
        self.dispatch(Msg::ImageRequested {
            image_id: image_id.into(),
        });
    }

    pub fn close_image(&mut self) {
        self.dispatch(Msg::ImageClosed);
    }

    /// Apply every engine completion that has already arrived.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(msg) = self.runner.try_next_msg() {
            self.dispatch(msg);
            applied += 1;
        }
        applied
    }

    /// Block until one engine completion is applied or `timeout` elapses.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            if self.runner.in_flight() == 0 {
                return false;
            }
            if let Some(msg) = self.runner.next_msg_timeout(remaining) {
                self.dispatch(msg);
                return true;
            }
        }
        false
    }

    /// Keep applying completions until nothing is in flight.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.runner.in_flight() > 0 {
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                return false;
            };
            self.wait_for_event(remaining);
        }
        true
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    /// Returns whether the view changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            // After a failed fetch an unchanged geometry must still reach the
            // core, or a viewport with slack space never retries.
            if matches!(&msg, Msg::SearchCompleted { result: Err(_), .. }) {
                self.sensor.reset();
            }
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;

            for change in self.runner.run(effects) {
                let before = self.navigation.params();
                self.navigation.apply(&change);
                let after = self.navigation.params();
                kahuna_debug!("navigate {:?} -> ?{}", change, self.navigation.to_query_string());
                if after != before {
                    self.sensor.reset();
                    inbox.push_back(Msg::ParamsChanged(after));
                }
            }
        }
    }
}

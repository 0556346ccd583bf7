//! Kahuna core: pure result-stream state machine and view-model helpers.
mod detail;
mod effect;
mod failure;
mod item;
mod msg;
mod params;
mod state;
mod stream;
mod update;
mod view_model;
pub mod viewport;

pub use detail::{DetailState, RequestId};
pub use effect::Effect;
pub use failure::{FailureKind, FetchFailure};
pub use item::{ResultItem, Timestamp};
pub use msg::Msg;
pub use params::{NavigationState, NavigationUpdate, SearchForm, SearchParams};
pub use state::{AppState, DEFAULT_PAGE_SIZE};
pub use stream::{FetchKind, FetchState, ResultStream, SearchRequest, StreamId};
pub use update::update;
pub use view_model::AppViewModel;
pub use viewport::{BottomTolerance, Geometry, ViewportSensor, ViewportSignal};

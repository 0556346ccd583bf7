//! Kahuna engine: media API client and background request execution.
mod api;
mod engine;
mod types;

pub use api::{ApiSettings, MediaApi, ReqwestMediaApi, SearchOptions, DEFAULT_PAGE_SIZE};
pub use engine::EngineHandle;
pub use types::{ApiError, EngineEvent, ImageResource, Ticket};

use serde::Deserialize;

pub type Ticket = u64;

/// One image resource as returned by the media API.
///
/// `uri` and `upload_time` are lifted out of the payload; `raw` keeps the
/// full JSON object untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResource {
    pub uri: String,
    pub upload_time: String,
    pub raw: serde_json::Value,
}

#[derive(Deserialize)]
struct WireImage {
    uri: String,
    data: WireImageData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireImageData {
    upload_time: String,
}

impl ImageResource {
    pub(crate) fn from_value(raw: serde_json::Value, status: u16) -> Result<Self, ApiError> {
        let wire = WireImage::deserialize(&raw).map_err(|err| ApiError::Decode {
            status,
            message: err.to_string(),
        })?;
        Ok(Self {
            uri: wire.uri,
            upload_time: wire.data.upload_time,
            raw,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("invalid media api uri {uri}: {message}")]
    InvalidBaseUri { uri: String, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("media api responded with status {status}")]
    Status { status: u16 },
    #[error("image {id} not found")]
    NotFound { id: String },
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("malformed response (status {status}): {message}")]
    Decode { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SearchCompleted {
        ticket: Ticket,
        result: Result<Vec<ImageResource>, ApiError>,
    },
    FindCompleted {
        ticket: Ticket,
        result: Result<ImageResource, ApiError>,
    },
}

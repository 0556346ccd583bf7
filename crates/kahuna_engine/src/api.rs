use std::time::Duration;

use futures_util::StreamExt;
use kahuna_logging::{kahuna_debug, kahuna_warn};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::{ApiError, ImageResource};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_uri: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl ApiSettings {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Bounds for one search page. `until` is exclusive on the server side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub since: Option<String>,
    pub until: Option<String>,
    pub page_size: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            since: None,
            until: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The remote media catalog. Every call is a fresh round trip.
#[async_trait::async_trait]
pub trait MediaApi: Send + Sync {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<ImageResource>, ApiError>;

    async fn find(&self, id: &str) -> Result<ImageResource, ApiError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ReqwestMediaApi {
    base: Url,
    client: reqwest::Client,
    max_bytes: u64,
}

impl ReqwestMediaApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_uri).map_err(|err| ApiError::InvalidBaseUri {
            uri: settings.base_uri.clone(),
            message: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUri {
                uri: settings.base_uri,
                message: "not a hierarchical url".into(),
            });
        }

        // The cookie store carries the session credentials across requests.
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .cookie_store(true)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        Ok(Self {
            base,
            client,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn search_url(&self, query: &str, options: &SearchOptions) -> Url {
        let mut url = self.images_url(&[]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Some(since) = &options.since {
                pairs.append_pair("since", since);
            }
            if let Some(until) = &options.until {
                pairs.append_pair("until", until);
            }
            pairs.append_pair("length", &options.page_size.to_string());
        }
        url
    }

    pub fn find_url(&self, id: &str) -> Url {
        self.images_url(&[id])
    }

    fn images_url(&self, extra: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("images").extend(extra);
        }
        url
    }

    async fn get(&self, url: Url) -> Result<(StatusCode, Vec<u8>), ApiError> {
        kahuna_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(ApiError::TooLarge {
                    max_bytes: self.max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(ApiError::TooLarge {
                    max_bytes: self.max_bytes,
                    actual: Some(next_len),
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok((status, bytes))
    }
}

#[async_trait::async_trait]
impl MediaApi for ReqwestMediaApi {
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<ImageResource>, ApiError> {
        let (status, body) = self.get(self.search_url(query, options)).await?;
        if !status.is_success() {
            kahuna_warn!("search {:?} failed with status {}", query, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let status = status.as_u16();
        let response: SearchResponse = decode(&body, status)?;
        response
            .data
            .into_iter()
            .map(|raw| ImageResource::from_value(raw, status))
            .collect()
    }

    async fn find(&self, id: &str) -> Result<ImageResource, ApiError> {
        let (status, body) = self.get(self.find_url(id)).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { id: id.to_string() });
        }
        if !status.is_success() {
            kahuna_warn!("find {} failed with status {}", id, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let status = status.as_u16();
        let raw: serde_json::Value = decode(&body, status)?;
        ImageResource::from_value(raw, status)
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8], status: u16) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::Decode {
        status,
        message: err.to_string(),
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout(err.to_string());
    }
    ApiError::Network(err.to_string())
}

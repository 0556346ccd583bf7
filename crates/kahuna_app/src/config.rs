//! Session configuration loaded from RON.
//!
//! ```ron
//! (
//!     media_api_uri: "https://api.media.example.org",
//!     page_size: 20,
//!     bottom_tolerance_px: 1.0,
//!     log_level: "debug",
//!     log_file: Some("kahuna.log"),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use kahuna_core::{BottomTolerance, DEFAULT_PAGE_SIZE};
use kahuna_engine::ApiSettings;
use kahuna_logging::LogTarget;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid media api uri {uri:?}: {message}")]
    InvalidMediaApiUri { uri: String, message: String },
    #[error("page size must be positive")]
    InvalidPageSize,
    #[error("bottom tolerance must be a finite, non-negative pixel count (got {0})")]
    InvalidTolerance(f64),
    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub media_api_uri: String,
    pub page_size: u32,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_response_bytes: u64,
    /// Zero means exact bottom detection.
    pub bottom_tolerance_px: f64,
    pub log_level: String,
    /// Terminal logging when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            media_api_uri: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            max_response_bytes: 5 * 1024 * 1024,
            bottom_tolerance_px: 0.0,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn new(media_api_uri: impl Into<String>) -> Self {
        Self {
            media_api_uri: media_api_uri.into(),
            ..Self::default()
        }
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let uri = url::Url::parse(&self.media_api_uri).map_err(|err| {
            ConfigError::InvalidMediaApiUri {
                uri: self.media_api_uri.clone(),
                message: err.to_string(),
            }
        })?;
        if !matches!(uri.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidMediaApiUri {
                uri: self.media_api_uri.clone(),
                message: format!("unsupported scheme {}", uri.scheme()),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        if !self.bottom_tolerance_px.is_finite() || self.bottom_tolerance_px < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.bottom_tolerance_px));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_response_bytes,
            ..ApiSettings::new(self.media_api_uri.clone())
        }
    }

    pub fn bottom_tolerance(&self) -> BottomTolerance {
        BottomTolerance::new(self.bottom_tolerance_px)
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn log_targets(&self) -> Vec<LogTarget> {
        match &self.log_file {
            Some(path) => vec![LogTarget::File(path.clone())],
            None => vec![LogTarget::Terminal],
        }
    }
}

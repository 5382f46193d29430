/// Centralized error types for the bar collector
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    // Provider (fetch) errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid bar data: {0}")]
    InvalidBarData(String),

    #[error("Deserialization failed: {0}")]
    DeserializationError(#[from] serde_json::Error),

    // Remote store errors
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Store I/O failed: {0}")]
    StoreIoError(String),

    #[error("Invalid watermark: {0}")]
    InvalidWatermark(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // File I/O errors
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CollectorError>;

impl CollectorError {
    /// Check if error is recoverable (the cycle is skipped, the next timer fire retries)
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CollectorError::ConfigError(_))
    }

    /// Get error code for logging/monitoring
    pub fn error_code(&self) -> &str {
        match self {
            CollectorError::HttpError(_) => "NET_001",
            CollectorError::ProviderError(_) => "FETCH_001",
            CollectorError::InvalidBarData(_) => "DATA_001",
            CollectorError::DeserializationError(_) => "DATA_002",
            CollectorError::AuthenticationFailed(_) => "AUTH_001",
            CollectorError::StoreIoError(_) => "STORE_001",
            CollectorError::InvalidWatermark(_) => "STORE_002",
            CollectorError::ConfigError(_) => "CFG_001",
            CollectorError::FileError(_) => "FILE_001",
        }
    }
}

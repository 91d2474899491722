use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to load data: {0}")]
    DataLoad(String),

    #[error("Playlist persistence error: {0}")]
    Playlist(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Cache(_)
            | AppError::DataLoad(_)
            | AppError::Playlist(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Failure categories for calls against the metadata API.
///
/// These never reach a caller of `MetadataProvider`: each provider call maps them
/// onto its own sentinel value.
#[derive(thiserror::Error, Debug, Clone)]
pub enum EnrichmentError {
    #[error("request timed out")]
    Timeout,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("API returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response missing field `{0}`")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for EnrichmentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            EnrichmentError::Timeout
        } else if e.is_decode() {
            EnrichmentError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            EnrichmentError::Status(status.as_u16())
        } else {
            EnrichmentError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for EnrichmentError {
    fn from(e: serde_json::Error) -> Self {
        EnrichmentError::Malformed(e.to_string())
    }
}

impl EnrichmentError {
    /// Short label used as a structured logging field
    pub fn category(&self) -> &'static str {
        match self {
            EnrichmentError::Timeout => "timeout",
            EnrichmentError::Transport(_) => "transport",
            EnrichmentError::Status(_) => "status",
            EnrichmentError::Malformed(_) => "malformed",
            EnrichmentError::MissingField(_) => "missing_field",
        }
    }
}

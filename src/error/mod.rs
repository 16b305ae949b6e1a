// Error types for the appointment parser
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Client input problem. Displayed without a prefix so it can be handed
    /// back to the caller verbatim.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Gemini API error: {0}")]
    GeminiApi(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SchedulerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SchedulerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `detail` field of the error body.
    pub fn detail(&self) -> String {
        match self {
            SchedulerError::InvalidRequest(message) => message.clone(),
            other => format!("An error occurred: {}", other),
        }
    }
}

// Convert SchedulerError to HTTP responses for Axum
impl IntoResponse for SchedulerError {
    fn into_response(self) -> Response {
        let body = json!({ "detail": self.detail() });
        (self.status_code(), axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

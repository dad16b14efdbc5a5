use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Algolia error {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("Algolia request failed: {0}")]
    TransportError(String),
}

/// Failures on the tool-call path.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool {0} not found")]
    NotFound(String),

    #[error("Invalid arguments for tool {tool}: {message}")]
    InvalidParams { tool: String, message: String },

    #[error(transparent)]
    Failed(#[from] AppError),
}

impl ToolError {
    pub fn invalid(tool: &str, message: impl Into<String>) -> Self {
        ToolError::InvalidParams {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::ConfigError(msg) => {
                tracing::warn!(error = %msg, "Configuration error");
            }
            AppError::UpstreamError { status, .. } => {
                tracing::error!(status, "Upstream search error");
            }
            AppError::TransportError(e) => {
                tracing::error!(error = %e, "Upstream transport error");
            }
        }

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::TransportError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

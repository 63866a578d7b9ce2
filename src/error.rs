use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Errors surfaced at the API boundary. Every variant maps to a status and a
/// JSON `{"error": ...}` body; storage faults are logged server-side and
/// never leak their cause to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{message}")]
    Storage {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn storage(message: &'static str, source: StoreError) -> Self {
        Self::Storage { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let ApiError::Storage { message, source } = &self {
            error!("{message}: {source}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use idle_chat::DispatchError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Chat setup failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::AgentNotFound(_) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": self.to_string() }))).into_response()
            }
            ApiError::Dispatch(ref e) => {
                tracing::error!(error = %e, "Error in chat API");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

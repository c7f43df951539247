use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skillswap_core::GraphError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Graph(e) => match e {
                GraphError::ValidationFailed(_) | GraphError::InvalidOperation(_) => {
                    StatusCode::BAD_REQUEST
                }
                GraphError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                GraphError::NotFound(_) => StatusCode::NOT_FOUND,
                GraphError::Conflict(_) => StatusCode::CONFLICT,
                GraphError::Store(_) | GraphError::Blob(_) | GraphError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use uuid::Uuid;

use savora_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("Content not found: {0}")]
    ContentNotFound(Uuid),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Registration is closed")]
    RegistrationClosed,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::ProfileNotFound(_) | ServerError::ContentNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ServerError::EmailTaken => (StatusCode::CONFLICT, self.to_string()),
            ServerError::RegistrationClosed => (StatusCode::FORBIDDEN, self.to_string()),
            ServerError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "Record not found".to_string())
            }
            ServerError::Store(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

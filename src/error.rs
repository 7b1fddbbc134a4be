use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio_postgres::error::SqlState;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Store(tokio_postgres::Error),
}

impl From<tokio_postgres::Error> for ServiceError {
    fn from(e: tokio_postgres::Error) -> Self {
        // `name` is the only unique column and `category_id` the only foreign
        // key, so constraint violations can be classified without inspecting
        // the constraint name.
        match e.code() {
            Some(code) if *code == SqlState::UNIQUE_VIOLATION => {
                Self::Conflict("A category with this name already exists".to_string())
            }
            Some(code) if *code == SqlState::FOREIGN_KEY_VIOLATION => {
                Self::Validation("Category does not exist".to_string())
            }
            _ => Self::Store(e),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(msg) | Self::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Store(e) => {
                tracing::error!("store operation failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

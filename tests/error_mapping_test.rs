//! Every service error maps to one status code and a `{"error": <message>}`
//! body at the handler boundary.

use axum::{http::StatusCode, response::IntoResponse};

use notes_app::error::ServiceError;

async fn status_and_error(err: ServiceError) -> (StatusCode, String) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, body["error"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn validation_maps_to_400() {
    let (status, message) =
        status_and_error(ServiceError::Validation("Title and content are required".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "Title and content are required");
}

#[tokio::test]
async fn not_found_maps_to_404() {
    let (status, message) =
        status_and_error(ServiceError::NotFound("Note not found".into())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message, "Note not found");
}

#[tokio::test]
async fn conflict_maps_to_400() {
    let (status, message) = status_and_error(ServiceError::Conflict(
        "A category with this name already exists".into(),
    ))
    .await;

    // The original API reported duplicate names as a plain bad request.
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "A category with this name already exists");
}

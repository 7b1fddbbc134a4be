//! End-to-end tests of the REST surface against a live PostgreSQL instance.
//! Each test builds the full router and drives it with `oneshot` requests.
//! The suite needs `PG_DSN` to point at a scratch database and skips itself
//! when the variable is unset.

use std::{
    env,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use notes_app::{app, repository::Repository, service::NoteService};

async fn test_app() -> Option<Router> {
    let Ok(dsn) = env::var("PG_DSN") else {
        eprintln!("PG_DSN not set, skipping REST API test");
        return None;
    };

    let mut repo = Repository::new(dsn)
        .await
        .expect("failed to connect to test database");
    repo.migrate().await.expect("failed to migrate");

    Some(app(Arc::new(NoteService::new(Arc::new(repo)))))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Option<Value>) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    };

    (status, body)
}

// Category names are unique at the database level and the scratch database
// survives across runs.
fn unique_name(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!(
        "{prefix}-{}-{}-{nanos}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

fn error_of(body: &Option<Value>) -> &str {
    body.as_ref().unwrap()["error"].as_str().unwrap()
}

fn timestamp(note: &Value, field: &str) -> DateTime<Utc> {
    note[field]
        .as_str()
        .unwrap()
        .parse()
        .expect("timestamp must be RFC 3339")
}

#[tokio::test]
async fn create_then_get_roundtrip() {
    let Some(app) = test_app().await else { return };

    let (status, body) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({"title": "Groceries", "content": "milk, eggs"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let created = body.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert!(created["categoryId"].is_null());
    assert!(created["category"].is_null());

    let (status, body) = send(&app, "GET", &format!("/api/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let fetched = body.unwrap();
    assert_eq!(fetched["title"], "Groceries");
    assert_eq!(fetched["content"], "milk, eggs");
    assert_eq!(fetched["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn create_with_empty_title_rejected() {
    let Some(app) = test_app().await else { return };

    let (status, body) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({"title": "", "content": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Title and content are required");

    // Whitespace-only fields are rejected the same way.
    let (status, _) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({"title": "x", "content": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_only_title_preserves_other_fields() {
    let Some(app) = test_app().await else { return };

    let (_, body) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({"title": "before", "content": "original content"})),
    )
    .await;
    let created = body.unwrap();
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/notes/{id}"),
        Some(json!({"title": "after"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let updated = body.unwrap();
    assert_eq!(updated["title"], "after");
    assert_eq!(updated["content"], "original content");
    assert!(updated["categoryId"].is_null());
    assert!(
        timestamp(&updated, "updatedAt") > timestamp(&created, "updatedAt"),
        "updated timestamp must strictly increase"
    );
}

#[tokio::test]
async fn update_with_no_fields_rejected() {
    let Some(app) = test_app().await else { return };

    let (_, body) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({"title": "t", "content": "c"})),
    )
    .await;
    let id = body.unwrap()["id"].as_i64().unwrap();

    let (status, body) = send(&app, "PUT", &format!("/api/notes/{id}"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "At least one field must be provided");

    // A blank title counts as not supplied.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/notes/{id}"),
        Some(json!({"title": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_missing_note_returns_404() {
    let Some(app) = test_app().await else { return };

    let (status, body) = send(
        &app,
        "PUT",
        "/api/notes/999999999",
        Some(json!({"title": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_of(&body), "Note not found");
}

#[tokio::test]
async fn delete_then_get_returns_404() {
    let Some(app) = test_app().await else { return };

    let (_, body) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({"title": "doomed", "content": "c"})),
    )
    .await;
    let id = body.unwrap()["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/api/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none(), "delete must return an empty body");

    let (status, _) = send(&app, "GET", &format!("/api/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/api/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_category_rejected() {
    let Some(app) = test_app().await else { return };

    let name = unique_name("Work");

    let (status, _) = send(&app, "POST", "/api/categories", Some(json!({"name": name}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/categories", Some(json!({"name": name}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "A category with this name already exists");

    let (_, body) = send(&app, "GET", "/api/categories", None).await;
    let count = body
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["name"] == name.as_str())
        .count();
    assert_eq!(count, 1, "store must contain exactly one category with the name");
}

#[tokio::test]
async fn blank_category_name_rejected() {
    let Some(app) = test_app().await else { return };

    let (status, body) = send(&app, "POST", "/api/categories", Some(json!({"name": "  "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Category name is required");
}

#[tokio::test]
async fn note_category_can_be_set_and_cleared() {
    let Some(app) = test_app().await else { return };

    let name = unique_name("Personal");
    let (_, body) = send(&app, "POST", "/api/categories", Some(json!({"name": name}))).await;
    let category_id = body.unwrap()["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({"title": "t", "content": "c", "categoryId": category_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let created = body.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["categoryId"].as_i64().unwrap(), category_id);
    assert_eq!(created["category"]["name"], name.as_str());

    // An explicit null detaches the category.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/notes/{id}"),
        Some(json!({"categoryId": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let updated = body.unwrap();
    assert!(updated["categoryId"].is_null());
    assert!(updated["category"].is_null());
    assert_eq!(updated["content"], "c");
}

#[tokio::test]
async fn unknown_category_on_create_rejected() {
    let Some(app) = test_app().await else { return };

    let (status, body) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({"title": "t", "content": "c", "categoryId": 999999999})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Category does not exist");
}

#[tokio::test]
async fn notes_listed_most_recently_updated_first() {
    let Some(app) = test_app().await else { return };

    let (_, body) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({"title": "older", "content": "c"})),
    )
    .await;
    let first = body.unwrap()["id"].as_i64().unwrap();

    let (_, body) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({"title": "newer", "content": "c"})),
    )
    .await;
    let second = body.unwrap()["id"].as_i64().unwrap();

    // Touching the older note moves it back to the front.
    let (_, _) = send(
        &app,
        "PUT",
        &format!("/api/notes/{first}"),
        Some(json!({"content": "touched"})),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/notes", None).await;
    let notes = body.unwrap();
    let ids: Vec<i64> = notes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect();

    let pos_first = ids.iter().position(|&id| id == first).unwrap();
    let pos_second = ids.iter().position(|&id| id == second).unwrap();
    assert!(pos_first < pos_second);
}

pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use std::sync::Arc;

use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use handlers::rest;
use service::NoteService;

/// Assembles the full application router. The JSON API lives under `/api`;
/// everything else falls through to the static client assets.
pub fn app(service: Arc<NoteService>) -> Router {
    // REST router config
    let api_router = Router::new()
        .route("/notes", post(rest::create_note))
        .route("/notes/{id}", put(rest::update_note))
        .route("/notes/{id}", delete(rest::delete_note))
        .route("/notes/{id}", get(rest::get_one_note))
        .route("/notes", get(rest::get_all_notes))
        .route("/categories", post(rest::create_category))
        .route("/categories", get(rest::get_all_categories))
        .with_state(service);

    Router::new()
        .nest("/api", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .fallback_service(ServeDir::new("public"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

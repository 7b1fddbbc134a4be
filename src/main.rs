use std::{env, sync::Arc};

use notes_app::{app, repository::Repository, service::NoteService};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Fetch env variables
    let database_dsn =
        env::var("PG_DSN").expect("database dsn must be provided as an ENV variable");
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());

    // Repository creation and migration
    let mut repo = Repository::new(database_dsn).await.unwrap_or_else(|e| {
        tracing::error!("Failed to establish database connection: {e}");
        panic!("failed to establish database connection: {e}");
    });

    repo.migrate().await.unwrap_or_else(|e| {
        tracing::error!("Failed to migrate database: {e}");
        panic!("failed to migrate database: {e}");
    });

    // Service creation; migrations were the only mutable user of the
    // repository, so it is shared without a lock from here on.
    let service = Arc::new(NoteService::new(Arc::new(repo)));

    // Router config
    let router = app(service);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind to address");

    tracing::info!("Started listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, router)
        .await
        .expect("failed to start server");
}

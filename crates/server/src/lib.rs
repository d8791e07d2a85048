//! HTTP API for the bug tracker.

pub mod error;
pub mod routes;

use axum::Router;
use db::DbService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    db: DbService,
}

impl AppState {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DbService {
        &self.db
    }
}

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(routes::bugs::router())
                .merge(routes::health::router()),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

use config::Config;
use services::OrganizationService;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub organizations: OrganizationService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: sqlx::SqlitePool, config: Config) -> Self {
        Self {
            organizations: OrganizationService::new(db.clone()),
            db,
            config: Arc::new(config),
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let org_routes = Router::new()
        .route(
            "/",
            get(routes::organizations::list_organizations)
                .post(routes::organizations::create_organization),
        )
        .route("/stats", get(routes::organizations::stats))
        .route("/active", get(routes::organizations::list_active))
        .route("/search", get(routes::organizations::search));

    Router::new()
        .nest("/api/organizations", org_routes)
        .route("/api/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

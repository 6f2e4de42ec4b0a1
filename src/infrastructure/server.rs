//! HTTP application assembly and serving

use axum::{Router, http::HeaderValue, response::Redirect, routing::get};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api_docs::ApiDoc;
use crate::infrastructure::AppState;
use crate::infrastructure::config::Config;

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let mut origins = Vec::new();
    for origin in &config.cors_allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(v) => origins.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }
    cors.allow_origin(origins)
}

/// Build the full application: API under `/api`, Swagger UI, CORS and request tracing.
pub fn build_router(db: DatabaseConnection, config: &Config) -> Router {
    let state = AppState::new(db);

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(|| async { Redirect::temporary("/api/docs") }))
        .nest("/api", api::api_router(state))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// Bind `host:port` from config and serve until the process stops.
pub async fn serve(db: DatabaseConnection, config: &Config) -> std::io::Result<()> {
    let app = build_router(db, config);
    let addr = config.bind_address();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Crafty server listening on {}", addr);

    axum::serve(listener, app).await
}

//! Router HTTP
//!
//! Capa fina sobre los controladores: extrae identidad y parámetros y
//! delega. Las rutas `/api/admin/*` exigen rol ADMIN.

pub mod driver_routes;
pub mod place_routes;
pub mod trip_routes;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Construye el router completo con CORS y trazas HTTP
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/api/admin/trips",
            trip_routes::create_admin_trip_router(state.clone()),
        )
        .nest(
            "/api/driver/trips",
            trip_routes::create_driver_trip_router(state.clone()),
        )
        .nest(
            "/api/admin/places",
            place_routes::create_admin_place_router(state.clone()),
        )
        .nest("/api/places", place_routes::create_place_router(state.clone()))
        .nest(
            "/api/admin/drivers",
            driver_routes::create_admin_driver_router(state.clone()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "storage": state.storage,
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

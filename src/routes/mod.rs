pub mod customer_routes;
pub mod dashboard_routes;
pub mod job_routes;
pub mod mechanic_routes;
pub mod part_routes;
pub mod schedule_routes;
pub mod service_routes;
pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Router completo de la API
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health))
        .nest("/api/customers", customer_routes::create_customer_router())
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/services", service_routes::create_service_router())
        .nest("/api/mechanics", mechanic_routes::create_mechanic_router())
        .nest("/api/parts", part_routes::create_part_router())
        .nest("/api/jobs", job_routes::create_job_router())
        .nest("/api/dashboard", dashboard_routes::create_dashboard_router())
        .nest("/api/schedule", schedule_routes::create_schedule_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

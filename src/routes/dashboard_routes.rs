use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::DashboardStats;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(get_stats))
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let controller = DashboardController::new(state.store.clone());
    Ok(Json(controller.stats().await?))
}

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::schedule_controller::ScheduleController;
use crate::dto::schedule_dto::{ScheduleQuery, WeekScheduleResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_schedule_router() -> Router<AppState> {
    Router::new().route("/", get(get_week))
}

/// Agenda semanal; `?date=YYYY-MM-DD` elige la semana, por defecto la actual
async fn get_week(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<WeekScheduleResponse>, AppError> {
    let controller = ScheduleController::new(state.store.clone(), state.config.week_starts_on);
    Ok(Json(controller.week(query.date).await?))
}

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::mechanic_controller::MechanicController;
use crate::dto::search_dto::SearchQuery;
use crate::dto::ApiResponse;
use crate::models::mechanic::{CreateMechanicRequest, Mechanic, UpdateMechanicRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_mechanic_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_mechanics).post(create_mechanic))
        .route("/:id", get(get_mechanic).put(update_mechanic).delete(delete_mechanic))
}

async fn list_mechanics(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Mechanic>>, AppError> {
    let controller = MechanicController::new(state.store.clone());
    Ok(Json(controller.list(query.q).await?))
}

async fn create_mechanic(
    State(state): State<AppState>,
    Json(request): Json<CreateMechanicRequest>,
) -> Result<Json<ApiResponse<Mechanic>>, AppError> {
    let controller = MechanicController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}

async fn get_mechanic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Mechanic>, AppError> {
    let controller = MechanicController::new(state.store.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_mechanic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMechanicRequest>,
) -> Result<Json<ApiResponse<Mechanic>>, AppError> {
    let controller = MechanicController::new(state.store.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_mechanic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MechanicController::new(state.store.clone());
    Ok(Json(controller.delete(id).await?))
}

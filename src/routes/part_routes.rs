use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::part_controller::PartController;
use crate::dto::search_dto::SearchQuery;
use crate::dto::ApiResponse;
use crate::models::part::{CreatePartRequest, PartResponse, UpdatePartRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_part_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_parts).post(create_part))
        .route("/:id", get(get_part).put(update_part).delete(delete_part))
}

async fn list_parts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PartResponse>>, AppError> {
    let controller = PartController::new(state.store.clone());
    Ok(Json(controller.list(query.q).await?))
}

async fn create_part(
    State(state): State<AppState>,
    Json(request): Json<CreatePartRequest>,
) -> Result<Json<ApiResponse<PartResponse>>, AppError> {
    let controller = PartController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}

async fn get_part(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PartResponse>, AppError> {
    let controller = PartController::new(state.store.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_part(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePartRequest>,
) -> Result<Json<ApiResponse<PartResponse>>, AppError> {
    let controller = PartController::new(state.store.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_part(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = PartController::new(state.store.clone());
    Ok(Json(controller.delete(id).await?))
}

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::service_controller::ServiceController;
use crate::dto::search_dto::SearchQuery;
use crate::dto::ApiResponse;
use crate::models::service::{CreateServiceRequest, Service, UpdateServiceRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_service_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/:id", get(get_service).put(update_service).delete(delete_service))
}

async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Service>>, AppError> {
    let controller = ServiceController::new(state.store.clone());
    Ok(Json(controller.list(query.q).await?))
}

async fn create_service(
    State(state): State<AppState>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<Json<ApiResponse<Service>>, AppError> {
    let controller = ServiceController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}

async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, AppError> {
    let controller = ServiceController::new(state.store.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateServiceRequest>,
) -> Result<Json<ApiResponse<Service>>, AppError> {
    let controller = ServiceController::new(state.store.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ServiceController::new(state.store.clone());
    Ok(Json(controller.delete(id).await?))
}

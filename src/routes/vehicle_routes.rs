use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::ApiResponse;
use crate::models::vehicle::{CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleWithHistory};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<VehicleWithHistory>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.list().await?))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleWithHistory>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.delete(id).await?))
}

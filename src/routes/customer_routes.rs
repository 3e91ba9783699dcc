use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::customer_controller::CustomerController;
use crate::dto::search_dto::SearchQuery;
use crate::dto::ApiResponse;
use crate::models::customer::{CreateCustomerRequest, Customer, CustomerWithVehicles, UpdateCustomerRequest};
use crate::models::vehicle::{NewVehicleRequest, Vehicle};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_customer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:id", get(get_customer).put(update_customer).delete(delete_customer))
        .route("/:id/vehicles", post(add_vehicle))
}

async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CustomerWithVehicles>>, AppError> {
    let controller = CustomerController::new(state.store.clone());
    Ok(Json(controller.list(query.q).await?))
}

async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    let controller = CustomerController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerWithVehicles>, AppError> {
    let controller = CustomerController::new(state.store.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    let controller = CustomerController::new(state.store.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CustomerController::new(state.store.clone());
    Ok(Json(controller.delete(id).await?))
}

async fn add_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NewVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let controller = CustomerController::new(state.store.clone());
    Ok(Json(controller.add_vehicle(id, request).await?))
}

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::invoice_controller::InvoiceController;
use crate::controllers::job_controller::JobController;
use crate::dto::invoice_dto::InvoiceResponse;
use crate::dto::ApiResponse;
use crate::models::job::{
    AddJobPartRequest, CreateJobRequest, Job, JobDetail, JobFilters, JobPart, JobSummary, UpdateJobRequest,
    UpdateJobStatusRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_job_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/:id", get(get_job).put(update_job).delete(delete_job))
        .route("/:id/status", patch(change_status))
        .route("/:id/invoice", get(get_invoice))
        .route("/:id/parts", post(add_part))
        .route("/:id/parts/:job_part_id", delete(remove_part))
}

async fn list_jobs(
    State(state): State<AppState>,
    Query(filters): Query<JobFilters>,
) -> Result<Json<Vec<JobSummary>>, AppError> {
    let controller = JobController::new(state.store.clone());
    Ok(Json(controller.list(filters.status).await?))
}

async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<Json<ApiResponse<Job>>, AppError> {
    let controller = JobController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}

async fn get_job(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<JobDetail>, AppError> {
    let controller = JobController::new(state.store.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateJobRequest>,
) -> Result<Json<ApiResponse<Job>>, AppError> {
    let controller = JobController::new(state.store.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateJobStatusRequest>,
) -> Result<Json<ApiResponse<Job>>, AppError> {
    let controller = JobController::new(state.store.clone());
    Ok(Json(controller.change_status(id, request).await?))
}

async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = JobController::new(state.store.clone());
    Ok(Json(controller.delete(id).await?))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let controller = InvoiceController::new(state.store.clone());
    Ok(Json(controller.get(id).await?))
}

async fn add_part(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddJobPartRequest>,
) -> Result<Json<ApiResponse<JobPart>>, AppError> {
    let controller = JobController::new(state.store.clone());
    Ok(Json(controller.add_part(id, request).await?))
}

async fn remove_part(
    State(state): State<AppState>,
    Path((id, job_part_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = JobController::new(state.store.clone());
    Ok(Json(controller.remove_part(id, job_part_id).await?))
}

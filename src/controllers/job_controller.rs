use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::job::{
    AddJobPartRequest, CreateJobRequest, Job, JobDetail, JobPart, JobSummary, UpdateJobRequest,
    UpdateJobStatusRequest,
};
use crate::repositories::{JobRepository, PartRepository};
use crate::services::job_lifecycle::{can_transition, transition, JobStatus};
use crate::store::RecordStore;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

pub struct JobController {
    repository: JobRepository,
    parts: PartRepository,
}

impl JobController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repository: JobRepository::new(store.clone()),
            parts: PartRepository::new(store),
        }
    }

    pub async fn list(&self, status: Option<JobStatus>) -> AppResult<Vec<JobSummary>> {
        self.repository.list(status).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<JobDetail> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Job", &id.to_string()))
    }

    pub async fn create(&self, request: CreateJobRequest) -> AppResult<ApiResponse<Job>> {
        request.validate()?;
        let job = self.repository.create(&request).await?;
        tracing::info!("🔧 Trabajo creado: {} para vehículo {}", job.id, job.vehicle_id);
        Ok(ApiResponse::success_with_message(
            job,
            "Trabajo creado exitosamente".to_string(),
        ))
    }

    pub async fn update(&self, id: Uuid, request: UpdateJobRequest) -> AppResult<ApiResponse<Job>> {
        request.validate()?;
        let job = self.repository.update(id, &request).await?;
        Ok(ApiResponse::success_with_message(
            job,
            "Trabajo actualizado exitosamente".to_string(),
        ))
    }

    /// Cambia el estado del trabajo y ajusta `completed_at`
    pub async fn change_status(&self, id: Uuid, request: UpdateJobStatusRequest) -> AppResult<ApiResponse<Job>> {
        let current = self
            .repository
            .find_job(id)
            .await?
            .ok_or_else(|| not_found_error("Job", &id.to_string()))?;

        if !can_transition(current.status, request.status) {
            return Err(bad_request_error(&format!(
                "Transición no permitida: {} -> {}",
                current.status, request.status
            )));
        }

        let next = transition(request.status, current.completed_at, Utc::now());
        let job = self.repository.apply_transition(id, &next).await?;
        tracing::info!("🔄 Trabajo {}: {} -> {}", id, current.status, job.status);

        Ok(ApiResponse::success_with_message(
            job,
            "Estado actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        self.repository.delete(id).await?;
        tracing::info!("🗑️ Trabajo eliminado: {}", id);
        Ok(ApiResponse::message("Trabajo eliminado exitosamente".to_string()))
    }

    /// Asocia una pieza al trabajo con el precio unitario vigente
    pub async fn add_part(&self, job_id: Uuid, request: AddJobPartRequest) -> AppResult<ApiResponse<JobPart>> {
        request.validate()?;

        if self.repository.find_job(job_id).await?.is_none() {
            return Err(not_found_error("Job", &job_id.to_string()));
        }
        let part = self
            .parts
            .find_by_id(request.part_id)
            .await?
            .ok_or_else(|| not_found_error("Part", &request.part_id.to_string()))?;

        let job_part = self
            .repository
            .add_part(job_id, part.id, request.quantity, part.unit_price)
            .await?;
        tracing::debug!(
            "Pieza {} x{} añadida al trabajo {} a {}",
            part.name,
            job_part.quantity,
            job_id,
            job_part.price_at_time
        );

        Ok(ApiResponse::success_with_message(
            job_part,
            "Pieza añadida al trabajo".to_string(),
        ))
    }

    pub async fn remove_part(&self, job_id: Uuid, job_part_id: Uuid) -> AppResult<ApiResponse<()>> {
        match self.repository.find_job_part(job_part_id).await? {
            Some(line) if line.job_id == job_id => {
                self.repository.remove_part(job_part_id).await?;
                Ok(ApiResponse::message("Pieza retirada del trabajo".to_string()))
            }
            _ => Err(not_found_error("JobPart", &job_part_id.to_string())),
        }
    }
}

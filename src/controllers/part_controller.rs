use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::part::{CreatePartRequest, PartResponse, UpdatePartRequest};
use crate::repositories::PartRepository;
use crate::store::RecordStore;
use crate::utils::errors::{not_found_error, AppResult};

pub struct PartController {
    repository: PartRepository,
}

impl PartController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repository: PartRepository::new(store),
        }
    }

    pub async fn list(&self, q: Option<String>) -> AppResult<Vec<PartResponse>> {
        let parts = self.repository.list(q.as_deref()).await?;
        Ok(parts.into_iter().map(PartResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<PartResponse> {
        self.repository
            .find_by_id(id)
            .await?
            .map(PartResponse::from)
            .ok_or_else(|| not_found_error("Part", &id.to_string()))
    }

    pub async fn create(&self, request: CreatePartRequest) -> AppResult<ApiResponse<PartResponse>> {
        request.validate()?;
        let part = self.repository.create(&request).await?;
        if part.is_low_stock() {
            tracing::warn!("📦 Pieza creada ya en stock bajo: {} ({})", part.name, part.quantity);
        }
        Ok(ApiResponse::success_with_message(
            part.into(),
            "Pieza creada exitosamente".to_string(),
        ))
    }

    pub async fn update(&self, id: Uuid, request: UpdatePartRequest) -> AppResult<ApiResponse<PartResponse>> {
        request.validate()?;
        let part = self.repository.update(id, &request).await?;
        Ok(ApiResponse::success_with_message(
            part.into(),
            "Pieza actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        self.repository.delete(id).await?;
        Ok(ApiResponse::message("Pieza eliminada exitosamente".to_string()))
    }
}

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::mechanic::{CreateMechanicRequest, Mechanic, UpdateMechanicRequest};
use crate::repositories::MechanicRepository;
use crate::store::RecordStore;
use crate::utils::errors::{not_found_error, AppResult};

pub struct MechanicController {
    repository: MechanicRepository,
}

impl MechanicController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repository: MechanicRepository::new(store),
        }
    }

    pub async fn list(&self, q: Option<String>) -> AppResult<Vec<Mechanic>> {
        self.repository.list(q.as_deref()).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Mechanic> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Mechanic", &id.to_string()))
    }

    pub async fn create(&self, request: CreateMechanicRequest) -> AppResult<ApiResponse<Mechanic>> {
        request.validate()?;
        let mechanic = self.repository.create(&request).await?;
        Ok(ApiResponse::success_with_message(
            mechanic,
            "Mecánico creado exitosamente".to_string(),
        ))
    }

    pub async fn update(&self, id: Uuid, request: UpdateMechanicRequest) -> AppResult<ApiResponse<Mechanic>> {
        request.validate()?;
        let mechanic = self.repository.update(id, &request).await?;
        Ok(ApiResponse::success_with_message(
            mechanic,
            "Mecánico actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        self.repository.delete(id).await?;
        Ok(ApiResponse::message("Mecánico eliminado exitosamente".to_string()))
    }
}

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::service::{CreateServiceRequest, Service, UpdateServiceRequest};
use crate::repositories::ServiceRepository;
use crate::store::RecordStore;
use crate::utils::errors::{not_found_error, AppResult};

pub struct ServiceController {
    repository: ServiceRepository,
}

impl ServiceController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repository: ServiceRepository::new(store),
        }
    }

    pub async fn list(&self, q: Option<String>) -> AppResult<Vec<Service>> {
        self.repository.list(q.as_deref()).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Service> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Service", &id.to_string()))
    }

    pub async fn create(&self, request: CreateServiceRequest) -> AppResult<ApiResponse<Service>> {
        request.validate()?;
        let service = self.repository.create(&request).await?;
        Ok(ApiResponse::success_with_message(
            service,
            "Servicio creado exitosamente".to_string(),
        ))
    }

    pub async fn update(&self, id: Uuid, request: UpdateServiceRequest) -> AppResult<ApiResponse<Service>> {
        request.validate()?;
        let service = self.repository.update(id, &request).await?;
        Ok(ApiResponse::success_with_message(
            service,
            "Servicio actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        self.repository.delete(id).await?;
        Ok(ApiResponse::message("Servicio eliminado exitosamente".to_string()))
    }
}

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::vehicle::{CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleWithHistory};
use crate::repositories::VehicleRepository;
use crate::store::RecordStore;
use crate::utils::errors::{not_found_error, AppResult};

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repository: VehicleRepository::new(store),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<VehicleWithHistory>> {
        self.repository.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<VehicleWithHistory> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;
        let vehicle = self.repository.create(&request).await?;
        tracing::info!("🚗 Vehículo creado: {} ({})", vehicle.license_plate, vehicle.id);
        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehículo creado exitosamente".to_string(),
        ))
    }

    pub async fn update(&self, id: Uuid, request: UpdateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;
        let vehicle = self.repository.update(id, &request).await?;
        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehículo actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        self.repository.delete(id).await?;
        tracing::info!("🗑️ Vehículo eliminado: {}", id);
        Ok(ApiResponse::message("Vehículo eliminado exitosamente".to_string()))
    }
}

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::customer::{CreateCustomerRequest, Customer, CustomerWithVehicles, UpdateCustomerRequest};
use crate::models::vehicle::{NewVehicleRequest, Vehicle};
use crate::repositories::{CustomerRepository, VehicleRepository};
use crate::store::RecordStore;
use crate::utils::errors::{not_found_error, AppResult};

pub struct CustomerController {
    repository: CustomerRepository,
    vehicles: VehicleRepository,
}

impl CustomerController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repository: CustomerRepository::new(store.clone()),
            vehicles: VehicleRepository::new(store),
        }
    }

    pub async fn list(&self, q: Option<String>) -> AppResult<Vec<CustomerWithVehicles>> {
        self.repository.list(q.as_deref()).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<CustomerWithVehicles> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Customer", &id.to_string()))
    }

    pub async fn create(&self, request: CreateCustomerRequest) -> AppResult<ApiResponse<Customer>> {
        request.validate()?;

        let customer = self.repository.create(&request).await?;
        tracing::info!(
            "👤 Cliente creado: {} ({}){}",
            customer.name,
            customer.id,
            if request.vehicle.is_some() { " con vehículo" } else { "" }
        );

        Ok(ApiResponse::success_with_message(
            customer,
            "Cliente creado exitosamente".to_string(),
        ))
    }

    pub async fn update(&self, id: Uuid, request: UpdateCustomerRequest) -> AppResult<ApiResponse<Customer>> {
        request.validate()?;
        let customer = self.repository.update(id, &request).await?;
        Ok(ApiResponse::success_with_message(
            customer,
            "Cliente actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        self.repository.delete(id).await?;
        tracing::info!("🗑️ Cliente eliminado: {}", id);
        Ok(ApiResponse::message("Cliente eliminado exitosamente".to_string()))
    }

    /// Añade un vehículo a un cliente existente
    pub async fn add_vehicle(&self, customer_id: Uuid, request: NewVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.validate()?;
        if self.repository.find_by_id(customer_id).await?.is_none() {
            return Err(not_found_error("Customer", &customer_id.to_string()));
        }

        let vehicle = self.vehicles.create_for_customer(customer_id, &request).await?;
        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehículo añadido exitosamente".to_string(),
        ))
    }
}

use std::sync::Arc;
use uuid::Uuid;

use super::{decode, decode_all};
use crate::models::to_row;
use crate::models::vehicle::{
    CreateVehicleRequest, NewVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleWithHistory,
};
use crate::store::{Collection, ListQuery, Order, RecordStore, Select};
use crate::utils::errors::AppResult;

pub struct VehicleRepository {
    store: Arc<dyn RecordStore>,
}

impl VehicleRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn with_history() -> Select {
        Select::all()
            .with("customer", Select::columns(&["name", "phone"]))
            .with(
                "jobs",
                Select::columns(&["id", "status", "completed_at", "total_cost", "notes"])
                    .with("service", Select::columns(&["name"])),
            )
    }

    fn decode_with_history(rows: Vec<crate::store::Row>) -> AppResult<Vec<VehicleWithHistory>> {
        let mut vehicles: Vec<VehicleWithHistory> = decode_all(Collection::Vehicles, rows)?;
        for vehicle in &mut vehicles {
            vehicle.sort_history();
        }
        Ok(vehicles)
    }

    /// Vehículos más recientes primero, con propietario e historial
    pub async fn list(&self) -> AppResult<Vec<VehicleWithHistory>> {
        let query = ListQuery::new(Self::with_history()).order_by(Order::desc("created_at"));
        let rows = self.store.list(Collection::Vehicles, &query).await?;
        Self::decode_with_history(rows)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<VehicleWithHistory>> {
        let row = self.store.get(Collection::Vehicles, id, &Self::with_history()).await?;
        Ok(Self::decode_with_history(row.into_iter().collect())?.pop())
    }

    pub async fn create(&self, request: &CreateVehicleRequest) -> AppResult<Vehicle> {
        let row = self.store.insert(Collection::Vehicles, to_row(request)).await?;
        decode(Collection::Vehicles, row)
    }

    /// Añade un vehículo a un cliente existente
    pub async fn create_for_customer(&self, customer_id: Uuid, request: &NewVehicleRequest) -> AppResult<Vehicle> {
        let mut row = to_row(request);
        row.insert("customer_id".to_string(), customer_id.to_string().into());
        let stored = self.store.insert(Collection::Vehicles, row).await?;
        decode(Collection::Vehicles, stored)
    }

    pub async fn update(&self, id: Uuid, request: &UpdateVehicleRequest) -> AppResult<Vehicle> {
        let row = self.store.update(Collection::Vehicles, id, to_row(request)).await?;
        decode(Collection::Vehicles, row)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.store.delete(Collection::Vehicles, id).await?;
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        Ok(self.store.count(Collection::Vehicles, &[]).await?)
    }
}

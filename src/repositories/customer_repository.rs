use std::sync::Arc;
use uuid::Uuid;

use super::{decode, decode_all};
use crate::models::customer::{CreateCustomerRequest, Customer, CustomerWithVehicles, UpdateCustomerRequest};
use crate::models::to_row;
use crate::services::search::customer_matches;
use crate::store::{ChildInsert, Collection, ListQuery, Order, RecordStore, Select};
use crate::utils::errors::AppResult;

pub struct CustomerRepository {
    store: Arc<dyn RecordStore>,
}

impl CustomerRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn with_vehicles() -> Select {
        Select::all().with("vehicles", Select::all())
    }

    /// Clientes por nombre, cada uno con sus vehículos, filtrados por `q`
    pub async fn list(&self, q: Option<&str>) -> AppResult<Vec<CustomerWithVehicles>> {
        let query = ListQuery::new(Self::with_vehicles()).order_by(Order::asc("name"));
        let rows = self.store.list(Collection::Customers, &query).await?;
        let customers: Vec<CustomerWithVehicles> = decode_all(Collection::Customers, rows)?;

        let q = q.unwrap_or_default();
        Ok(customers
            .into_iter()
            .filter(|c| {
                customer_matches(
                    q,
                    &c.customer.name,
                    c.customer.email.as_deref(),
                    c.customer.phone.as_deref(),
                )
            })
            .collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CustomerWithVehicles>> {
        self.store
            .get(Collection::Customers, id, &Self::with_vehicles())
            .await?
            .map(|row| decode(Collection::Customers, row))
            .transpose()
    }

    /// Alta de cliente; si trae vehículo se escriben ambos o ninguno
    pub async fn create(&self, request: &CreateCustomerRequest) -> AppResult<Customer> {
        let row = to_row(request);
        let stored = match &request.vehicle {
            Some(vehicle) => {
                let child = ChildInsert::new(Collection::Vehicles, "customer_id", vec![to_row(vehicle)]);
                self.store
                    .insert_with_children(Collection::Customers, row, vec![child])
                    .await?
            }
            None => self.store.insert(Collection::Customers, row).await?,
        };
        decode(Collection::Customers, stored)
    }

    pub async fn update(&self, id: Uuid, request: &UpdateCustomerRequest) -> AppResult<Customer> {
        let row = self.store.update(Collection::Customers, id, to_row(request)).await?;
        decode(Collection::Customers, row)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.store.delete(Collection::Customers, id).await?;
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        Ok(self.store.count(Collection::Customers, &[]).await?)
    }
}

use std::sync::Arc;
use uuid::Uuid;

use super::{decode, decode_all};
use crate::models::service::{CreateServiceRequest, Service, UpdateServiceRequest};
use crate::models::to_row;
use crate::services::search::matches_any;
use crate::store::{Collection, ListQuery, Order, RecordStore, Select};
use crate::utils::errors::AppResult;

pub struct ServiceRepository {
    store: Arc<dyn RecordStore>,
}

impl ServiceRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, q: Option<&str>) -> AppResult<Vec<Service>> {
        let query = ListQuery::new(Select::all()).order_by(Order::asc("name"));
        let rows = self.store.list(Collection::Services, &query).await?;
        let services: Vec<Service> = decode_all(Collection::Services, rows)?;

        let q = q.unwrap_or_default();
        Ok(services
            .into_iter()
            .filter(|s| matches_any(q, &[Some(s.name.as_str())]))
            .collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>> {
        self.store
            .get(Collection::Services, id, &Select::all())
            .await?
            .map(|row| decode(Collection::Services, row))
            .transpose()
    }

    pub async fn create(&self, request: &CreateServiceRequest) -> AppResult<Service> {
        let row = self.store.insert(Collection::Services, to_row(request)).await?;
        decode(Collection::Services, row)
    }

    pub async fn update(&self, id: Uuid, request: &UpdateServiceRequest) -> AppResult<Service> {
        let row = self.store.update(Collection::Services, id, to_row(request)).await?;
        decode(Collection::Services, row)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.store.delete(Collection::Services, id).await?;
        Ok(())
    }
}

use std::sync::Arc;
use uuid::Uuid;

use super::{decode, decode_all};
use crate::models::mechanic::{CreateMechanicRequest, Mechanic, UpdateMechanicRequest};
use crate::models::to_row;
use crate::services::search::matches_any;
use crate::store::{Collection, ListQuery, Order, RecordStore, Select};
use crate::utils::errors::AppResult;

pub struct MechanicRepository {
    store: Arc<dyn RecordStore>,
}

impl MechanicRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, q: Option<&str>) -> AppResult<Vec<Mechanic>> {
        let query = ListQuery::new(Select::all()).order_by(Order::asc("name"));
        let rows = self.store.list(Collection::Mechanics, &query).await?;
        let mechanics: Vec<Mechanic> = decode_all(Collection::Mechanics, rows)?;

        let q = q.unwrap_or_default();
        Ok(mechanics
            .into_iter()
            .filter(|m| matches_any(q, &[Some(m.name.as_str()), Some(m.specialization.as_str())]))
            .collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Mechanic>> {
        self.store
            .get(Collection::Mechanics, id, &Select::all())
            .await?
            .map(|row| decode(Collection::Mechanics, row))
            .transpose()
    }

    pub async fn create(&self, request: &CreateMechanicRequest) -> AppResult<Mechanic> {
        let row = self.store.insert(Collection::Mechanics, to_row(request)).await?;
        decode(Collection::Mechanics, row)
    }

    pub async fn update(&self, id: Uuid, request: &UpdateMechanicRequest) -> AppResult<Mechanic> {
        let row = self.store.update(Collection::Mechanics, id, to_row(request)).await?;
        decode(Collection::Mechanics, row)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.store.delete(Collection::Mechanics, id).await?;
        Ok(())
    }
}

use std::sync::Arc;
use uuid::Uuid;

use super::{decode, decode_all};
use crate::models::part::{CreatePartRequest, Part, UpdatePartRequest};
use crate::models::to_row;
use crate::services::inventory_rules::low_stock_filter;
use crate::services::search::matches_any;
use crate::store::{Collection, ListQuery, Order, RecordStore, Select};
use crate::utils::errors::AppResult;

pub struct PartRepository {
    store: Arc<dyn RecordStore>,
}

impl PartRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, q: Option<&str>) -> AppResult<Vec<Part>> {
        let query = ListQuery::new(Select::all()).order_by(Order::asc("name"));
        let rows = self.store.list(Collection::PartsInventory, &query).await?;
        let parts: Vec<Part> = decode_all(Collection::PartsInventory, rows)?;

        let q = q.unwrap_or_default();
        Ok(parts
            .into_iter()
            .filter(|p| matches_any(q, &[Some(p.name.as_str()), p.part_number.as_deref()]))
            .collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Part>> {
        self.store
            .get(Collection::PartsInventory, id, &Select::all())
            .await?
            .map(|row| decode(Collection::PartsInventory, row))
            .transpose()
    }

    pub async fn create(&self, request: &CreatePartRequest) -> AppResult<Part> {
        let row = self.store.insert(Collection::PartsInventory, to_row(request)).await?;
        decode(Collection::PartsInventory, row)
    }

    pub async fn update(&self, id: Uuid, request: &UpdatePartRequest) -> AppResult<Part> {
        let row = self
            .store
            .update(Collection::PartsInventory, id, to_row(request))
            .await?;
        decode(Collection::PartsInventory, row)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.store.delete(Collection::PartsInventory, id).await?;
        Ok(())
    }

    /// Piezas con cantidad <= punto de pedido
    pub async fn count_low_stock(&self) -> AppResult<i64> {
        Ok(self
            .store
            .count(Collection::PartsInventory, &[low_stock_filter()])
            .await?)
    }
}

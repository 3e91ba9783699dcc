use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::{decode, decode_all};
use crate::models::job::{
    CreateJobRequest, Job, JobDetail, JobForInvoice, JobPart, JobSummary, RecentJob, UpdateJobRequest,
};
use crate::models::to_row;
use crate::services::job_lifecycle::{JobStatus, Transition};
use crate::store::{Collection, Filter, ListQuery, Order, RecordStore, Row, Select};
use crate::utils::errors::AppResult;

pub struct JobRepository {
    store: Arc<dyn RecordStore>,
}

impl JobRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn summary_select() -> Select {
        Select::all()
            .with("vehicle", Select::columns(&["make", "model", "license_plate"]))
            .with("service", Select::columns(&["name"]))
            .with("mechanic", Select::columns(&["name"]))
    }

    fn detail_select() -> Select {
        Self::summary_select().with("parts", Select::all().with("part", Select::columns(&["name"])))
    }

    fn invoice_select() -> Select {
        Select::all()
            .with(
                "vehicle",
                Select::columns(&["year", "make", "model", "license_plate"]).with("customer", Select::all()),
            )
            .with("service", Select::all())
            .with("mechanic", Select::all())
            .with("parts", Select::all().with("part", Select::columns(&["name"])))
    }

    /// Trabajos más recientes primero, opcionalmente por estado
    pub async fn list(&self, status: Option<JobStatus>) -> AppResult<Vec<JobSummary>> {
        let mut query = ListQuery::new(Self::summary_select()).order_by(Order::desc("created_at"));
        if let Some(status) = status {
            query = query.filter(Filter::eq("status", status.as_str()));
        }
        let rows = self.store.list(Collection::Jobs, &query).await?;
        decode_all(Collection::Jobs, rows)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobDetail>> {
        self.store
            .get(Collection::Jobs, id, &Self::detail_select())
            .await?
            .map(|row| decode(Collection::Jobs, row))
            .transpose()
    }

    pub async fn find_job(&self, id: Uuid) -> AppResult<Option<Job>> {
        self.store
            .get(Collection::Jobs, id, &Select::all())
            .await?
            .map(|row| decode(Collection::Jobs, row))
            .transpose()
    }

    pub async fn find_for_invoice(&self, id: Uuid) -> AppResult<Option<JobForInvoice>> {
        self.store
            .get(Collection::Jobs, id, &Self::invoice_select())
            .await?
            .map(|row| decode(Collection::Jobs, row))
            .transpose()
    }

    /// Los trabajos nacen siempre en `pending`
    pub async fn create(&self, request: &CreateJobRequest) -> AppResult<Job> {
        let mut row = to_row(request);
        row.insert("status".to_string(), JobStatus::Pending.as_str().into());
        let stored = self.store.insert(Collection::Jobs, row).await?;
        decode(Collection::Jobs, stored)
    }

    pub async fn update(&self, id: Uuid, request: &UpdateJobRequest) -> AppResult<Job> {
        let row = self.store.update(Collection::Jobs, id, to_row(request)).await?;
        decode(Collection::Jobs, row)
    }

    pub async fn apply_transition(&self, id: Uuid, transition: &Transition) -> AppResult<Job> {
        let mut patch = Row::new();
        patch.insert("status".to_string(), transition.status.as_str().into());
        patch.insert(
            "completed_at".to_string(),
            transition
                .completed_at
                .map(|ts| Value::String(ts.to_rfc3339()))
                .unwrap_or(Value::Null),
        );
        let row = self.store.update(Collection::Jobs, id, patch).await?;
        decode(Collection::Jobs, row)
    }

    /// Borra el trabajo y, en cascada, sus líneas de piezas
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.store.delete(Collection::Jobs, id).await?;
        Ok(())
    }

    /// Trabajos abiertos (pendientes o en curso)
    pub async fn count_open(&self) -> AppResult<i64> {
        let open: Vec<Value> = JobStatus::ALL
            .iter()
            .filter(|s| s.is_open())
            .map(|s| Value::from(s.as_str()))
            .collect();
        Ok(self
            .store
            .count(Collection::Jobs, &[Filter::is_in("status", open)])
            .await?)
    }

    /// Número de trabajos creados desde `since` y suma de su coste total
    pub async fn created_since_totals(&self, since: DateTime<Utc>) -> AppResult<(i64, Decimal)> {
        let query = ListQuery::new(Select::columns(&["total_cost"]))
            .filter(Filter::gte("created_at", since.to_rfc3339()));
        let rows = self.store.list(Collection::Jobs, &query).await?;

        let count = rows.len() as i64;
        let revenue: Decimal = rows
            .iter()
            .filter_map(|row| row.get("total_cost"))
            .filter_map(crate::store::value::decimal_of)
            .sum();
        Ok((count, revenue))
    }

    /// Últimos trabajos creados con vehículo y cliente
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<RecentJob>> {
        let select = Select::columns(&["id", "status", "total_cost", "scheduled_date", "created_at"]).with(
            "vehicle",
            Select::columns(&["make", "model"]).with("customer", Select::columns(&["name"])),
        );
        let query = ListQuery::new(select)
            .order_by(Order::desc("created_at"))
            .limit(limit);
        let rows = self.store.list(Collection::Jobs, &query).await?;
        decode_all(Collection::Jobs, rows)
    }

    /// Trabajos programados en el rango semiabierto [from, to)
    pub async fn scheduled_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<JobSummary>> {
        let query = ListQuery::new(Self::summary_select())
            .filter(Filter::gte("scheduled_date", from.to_rfc3339()))
            .filter(Filter::lt("scheduled_date", to.to_rfc3339()))
            .order_by(Order::asc("scheduled_date"));
        let rows = self.store.list(Collection::Jobs, &query).await?;
        decode_all(Collection::Jobs, rows)
    }

    /// Asocia una pieza congelando su precio actual
    pub async fn add_part(&self, job_id: Uuid, part_id: Uuid, quantity: i32, unit_price: Decimal) -> AppResult<JobPart> {
        let mut row = Row::new();
        row.insert("job_id".to_string(), job_id.to_string().into());
        row.insert("part_id".to_string(), part_id.to_string().into());
        row.insert("quantity".to_string(), quantity.into());
        row.insert("price_at_time".to_string(), unit_price.to_string().into());
        let stored = self.store.insert(Collection::JobParts, row).await?;
        decode(Collection::JobParts, stored)
    }

    pub async fn find_job_part(&self, id: Uuid) -> AppResult<Option<JobPart>> {
        self.store
            .get(Collection::JobParts, id, &Select::all())
            .await?
            .map(|row| decode(Collection::JobParts, row))
            .transpose()
    }

    pub async fn remove_part(&self, job_part_id: Uuid) -> AppResult<()> {
        self.store.delete(Collection::JobParts, job_part_id).await?;
        Ok(())
    }
}

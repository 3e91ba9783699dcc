use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::sync::Arc;

use crate::dto::dashboard_dto::DashboardStats;
use crate::repositories::{CustomerRepository, JobRepository, PartRepository, VehicleRepository};
use crate::store::RecordStore;
use crate::utils::errors::{internal_error, AppResult};

const RECENT_JOBS_LIMIT: i64 = 10;

pub struct DashboardController {
    customers: CustomerRepository,
    vehicles: VehicleRepository,
    jobs: JobRepository,
    parts: PartRepository,
}

/// Primer instante del mes de `now` en UTC
fn start_of_month(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl DashboardController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            customers: CustomerRepository::new(store.clone()),
            vehicles: VehicleRepository::new(store.clone()),
            jobs: JobRepository::new(store.clone()),
            parts: PartRepository::new(store),
        }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let month_start = start_of_month(Utc::now()).ok_or_else(|| internal_error("fecha de inicio de mes inválida"))?;

        let (total_customers, total_vehicles, pending_jobs, critical_parts, (monthly_jobs, monthly_revenue), recent_jobs) =
            futures::try_join!(
                self.customers.count(),
                self.vehicles.count(),
                self.jobs.count_open(),
                self.parts.count_low_stock(),
                self.jobs.created_since_totals(month_start),
                self.jobs.recent(RECENT_JOBS_LIMIT),
            )?;

        tracing::debug!(
            "📊 Dashboard: {} clientes, {} vehículos, {} trabajos abiertos, {} piezas críticas",
            total_customers,
            total_vehicles,
            pending_jobs,
            critical_parts
        );

        Ok(DashboardStats {
            total_customers,
            total_vehicles,
            pending_jobs,
            critical_parts,
            monthly_jobs,
            monthly_revenue,
            recent_jobs,
        })
    }
}

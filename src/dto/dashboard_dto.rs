use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::job::RecentJob;

/// Métricas del panel principal
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_customers: i64,
    pub total_vehicles: i64,
    /// Pendientes o en curso
    pub pending_jobs: i64,
    /// Piezas con cantidad <= punto de pedido
    pub critical_parts: i64,
    /// Trabajos creados desde el día 1 del mes actual (UTC)
    pub monthly_jobs: i64,
    pub monthly_revenue: Decimal,
    pub recent_jobs: Vec<RecentJob>,
}

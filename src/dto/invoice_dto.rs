use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::services::job_lifecycle::JobStatus;

#[derive(Debug, Serialize)]
pub struct InvoiceCustomer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceVehicleInfo {
    pub year: i32,
    pub make: String,
    pub model: String,
    pub license_plate: String,
}

#[derive(Debug, Serialize)]
pub struct InvoiceService {
    pub name: String,
    pub base_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct InvoiceMechanic {
    pub name: String,
    pub hourly_rate: Option<Decimal>,
}

/// Línea de pieza facturada
#[derive(Debug, Serialize)]
pub struct InvoiceLine {
    pub part_name: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

/// Factura de un trabajo; importes redondeados a céntimos
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub invoice_number: String,
    pub job_id: Uuid,
    pub status: JobStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub customer: Option<InvoiceCustomer>,
    pub vehicle: Option<InvoiceVehicleInfo>,
    pub service: Option<InvoiceService>,
    pub mechanic: Option<InvoiceMechanic>,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

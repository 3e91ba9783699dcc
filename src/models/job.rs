//! Modelo de Job y sus líneas de piezas (JobPart)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::customer::Customer;
use super::mechanic::Mechanic;
use super::service::Service;
use super::NameOnly;
use crate::services::job_lifecycle::JobStatus;
use crate::utils::validation::validate_decimal_non_negative;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub service_id: Uuid,
    pub mechanic_id: Uuid,
    pub status: JobStatus,
    pub scheduled_date: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_cost: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Pieza usada en un trabajo; `price_at_time` queda congelado al asociarla
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobPart {
    pub id: Uuid,
    pub job_id: Uuid,
    pub part_id: Uuid,
    pub quantity: i32,
    pub price_at_time: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Vehículo resumido en listados de trabajos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobVehicle {
    pub make: String,
    pub model: String,
    pub license_plate: String,
}

/// Trabajo con vehículo, servicio y mecánico para listados y agenda
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    #[serde(flatten)]
    pub job: Job,
    pub vehicle: Option<JobVehicle>,
    pub service: Option<NameOnly>,
    pub mechanic: Option<NameOnly>,
}

/// Línea de pieza con el nombre de la pieza
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPartLine {
    #[serde(flatten)]
    pub job_part: JobPart,
    pub part: Option<NameOnly>,
}

/// Trabajo con sus líneas de piezas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub summary: JobSummary,
    #[serde(default)]
    pub parts: Vec<JobPartLine>,
}

/// Vehículo con su propietario, tal como aparece en la factura
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceVehicle {
    pub year: i32,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub customer: Option<Customer>,
}

/// Trabajo con todo lo necesario para facturar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobForInvoice {
    #[serde(flatten)]
    pub job: Job,
    pub vehicle: Option<InvoiceVehicle>,
    pub service: Option<Service>,
    pub mechanic: Option<Mechanic>,
    #[serde(default)]
    pub parts: Vec<JobPartLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentJobVehicle {
    pub make: String,
    pub model: String,
    pub customer: Option<NameOnly>,
}

/// Actividad reciente del dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentJob {
    pub id: Uuid,
    pub status: JobStatus,
    pub total_cost: Decimal,
    pub scheduled_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub vehicle: Option<RecentJobVehicle>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateJobRequest {
    pub vehicle_id: Uuid,
    pub service_id: Uuid,
    pub mechanic_id: Uuid,
    pub scheduled_date: DateTime<Utc>,

    #[serde(default)]
    #[validate(custom = "validate_decimal_non_negative")]
    pub total_cost: Decimal,

    pub notes: Option<String>,
}

/// Edición de un trabajo; el estado cambia solo por su propio endpoint
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateJobRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanic_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_decimal_non_negative")]
    pub total_cost: Option<Decimal>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobStatusRequest {
    pub status: JobStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddJobPartRequest {
    pub part_id: Uuid,

    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Filtros del listado de trabajos
#[derive(Debug, Default, Deserialize)]
pub struct JobFilters {
    pub status: Option<JobStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::to_row;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults_total_cost_to_zero() {
        let request: CreateJobRequest = serde_json::from_value(json!({
            "vehicle_id": Uuid::new_v4(),
            "service_id": Uuid::new_v4(),
            "mechanic_id": Uuid::new_v4(),
            "scheduled_date": "2024-05-15T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(request.total_cost, Decimal::ZERO);
        assert!(!to_row(&request).contains_key("status"));
    }

    #[test]
    fn test_job_part_quantity_must_be_positive() {
        let request = AddJobPartRequest {
            part_id: Uuid::new_v4(),
            quantity: 0,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_detail_decodes_nested_relations() {
        let id = Uuid::new_v4();
        let detail: JobDetail = serde_json::from_value(json!({
            "id": id,
            "vehicle_id": Uuid::new_v4(),
            "service_id": Uuid::new_v4(),
            "mechanic_id": Uuid::new_v4(),
            "status": "in_progress",
            "scheduled_date": "2024-05-15T09:00:00+00:00",
            "completed_at": null,
            "total_cost": "120.00",
            "notes": null,
            "created_at": "2024-05-01T09:00:00+00:00",
            "vehicle": { "make": "Seat", "model": "Ibiza", "license_plate": "1234ABC" },
            "service": { "name": "Frenos" },
            "mechanic": null,
            "parts": [{
                "id": Uuid::new_v4(),
                "job_id": id,
                "part_id": Uuid::new_v4(),
                "quantity": 2,
                "price_at_time": "25.00",
                "created_at": "2024-05-01T10:00:00+00:00",
                "part": { "name": "Pastillas" }
            }]
        }))
        .unwrap();
        assert_eq!(detail.summary.job.status, JobStatus::InProgress);
        assert!(detail.summary.mechanic.is_none());
        assert_eq!(detail.parts.len(), 1);
        assert_eq!(detail.parts[0].part.as_ref().unwrap().name, "Pastillas");
    }
}

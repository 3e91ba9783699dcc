//! Modelo de Vehicle
//!
//! Un vehículo pertenece siempre a un cliente y acumula su historial de
//! trabajos. La matrícula es única en todo el taller.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::NameOnly;
use crate::services::job_lifecycle::JobStatus;
use crate::utils::validation::{validate_not_blank, validate_vin};

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub vin: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Datos de un vehículo nuevo cuyo propietario viene dado por la ruta
/// o por el alta conjunta con el cliente
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewVehicleRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub make: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: String,

    #[validate(range(min = 1886, max = 2100))]
    pub year: i32,

    #[validate(length(min = 1, max = 20), custom = "validate_not_blank")]
    pub license_plate: String,

    #[validate(custom = "validate_vin")]
    pub vin: Option<String>,
}

/// Request para crear un vehículo indicando su cliente
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    pub customer_id: Uuid,

    #[serde(flatten)]
    #[validate]
    pub vehicle: NewVehicleRequest,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub make: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1886, max = 2100))]
    pub year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 20), custom = "validate_not_blank")]
    pub license_plate: Option<String>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_vin")]
    pub vin: Option<Option<String>>,
}

/// Propietario resumido en el listado de vehículos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleOwner {
    pub name: String,
    pub phone: Option<String>,
}

/// Entrada del historial de servicio de un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceHistoryEntry {
    pub id: Uuid,
    pub status: JobStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_cost: Decimal,
    pub notes: Option<String>,
    pub service: Option<NameOnly>,
}

/// Vehículo con propietario e historial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleWithHistory {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub customer: Option<VehicleOwner>,
    #[serde(default)]
    pub jobs: Vec<ServiceHistoryEntry>,
}

impl VehicleWithHistory {
    /// Ordena el historial por fecha de finalización, más reciente primero
    /// y los trabajos sin terminar al final
    pub fn sort_history(&mut self) {
        self.jobs.sort_by(|a, b| match (a.completed_at, b.completed_at) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }
}

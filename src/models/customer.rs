//! Modelo de Customer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::vehicle::{NewVehicleRequest, Vehicle};
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Cliente junto con sus vehículos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerWithVehicles {
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

/// Alta de cliente, opcionalmente con su primer vehículo
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[serde(default, skip_serializing)]
    #[validate]
    pub vehicle: Option<NewVehicleRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50))]
    pub phone: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub address: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::to_row;
    use serde_json::{json, Value};

    #[test]
    fn test_create_request_row_excludes_vehicle() {
        let request: CreateCustomerRequest = serde_json::from_value(json!({
            "name": "Ana",
            "vehicle": { "make": "Ford", "model": "Focus", "year": 2012, "license_plate": "B-1" }
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let row = to_row(&request);
        assert_eq!(row["name"], json!("Ana"));
        assert!(!row.contains_key("vehicle"));
    }

    #[test]
    fn test_nested_vehicle_is_validated() {
        let request: CreateCustomerRequest = serde_json::from_value(json!({
            "name": "Ana",
            "vehicle": { "make": "Ford", "model": "Focus", "year": 1700, "license_plate": "B-1" }
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let request: CreateCustomerRequest =
            serde_json::from_value(json!({ "name": "Ana", "email": "no-es-email" })).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_patch_only_carries_present_fields() {
        let request: UpdateCustomerRequest = serde_json::from_value(json!({ "phone": "555" })).unwrap();
        let row = to_row(&request);
        assert_eq!(row.len(), 1);
        assert_eq!(row["phone"], json!("555"));
    }

    #[test]
    fn test_update_patch_null_clears_field() {
        let request: UpdateCustomerRequest =
            serde_json::from_value(json!({ "email": null, "address": "Calle Mayor 1" })).unwrap();
        assert_eq!(request.email, Some(None));
        assert_eq!(request.phone, None);
        assert!(request.validate().is_ok());

        let row = to_row(&request);
        assert_eq!(row.len(), 2);
        assert_eq!(row["email"], Value::Null);
        assert_eq!(row["address"], json!("Calle Mayor 1"));
    }

    #[test]
    fn test_update_patch_still_validates_present_values() {
        let request: UpdateCustomerRequest = serde_json::from_value(json!({ "email": "no-es-email" })).unwrap();
        assert!(request.validate().is_err());
    }
}

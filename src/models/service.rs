//! Modelo de Service (catálogo de servicios del taller)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_decimal_non_negative, validate_not_blank};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub estimated_hours: Decimal,
    pub base_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom = "validate_decimal_non_negative")]
    pub estimated_hours: Decimal,

    #[validate(custom = "validate_decimal_non_negative")]
    pub base_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_decimal_non_negative")]
    pub estimated_hours: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_decimal_non_negative")]
    pub base_price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_negative_price_rejected() {
        let request: CreateServiceRequest = serde_json::from_value(json!({
            "name": "Cambio de aceite",
            "estimated_hours": "1.5",
            "base_price": "-10"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_decimals_accept_numbers_and_strings() {
        let request: CreateServiceRequest = serde_json::from_value(json!({
            "name": "Frenos",
            "estimated_hours": 2,
            "base_price": "100.00"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.base_price.to_string(), "100.00");
    }
}

//! Modelo de Mechanic

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_decimal_non_negative, validate_not_blank};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mechanic {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub hourly_rate: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateMechanicRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: String,

    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub specialization: String,

    #[validate(custom = "validate_decimal_non_negative")]
    pub hourly_rate: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateMechanicRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub specialization: Option<String>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_decimal_non_negative")]
    pub hourly_rate: Option<Option<Decimal>>,
}

//! Modelo de Part (inventario de piezas)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::services::inventory_rules::is_low_stock;
use crate::utils::validation::{validate_decimal_non_negative, validate_not_blank};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    pub id: Uuid,
    pub name: String,
    pub part_number: Option<String>,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub reorder_point: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Part {
    pub fn is_low_stock(&self) -> bool {
        is_low_stock(self.quantity, self.reorder_point)
    }
}

/// Pieza con su indicador de stock bajo
#[derive(Debug, Clone, Serialize)]
pub struct PartResponse {
    #[serde(flatten)]
    pub part: Part,
    pub low_stock: bool,
}

impl From<Part> for PartResponse {
    fn from(part: Part) -> Self {
        let low_stock = part.is_low_stock();
        Self { part, low_stock }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePartRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub part_number: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub quantity: i32,

    #[validate(custom = "validate_decimal_non_negative")]
    pub unit_price: Decimal,

    #[validate(range(min = 0))]
    pub reorder_point: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdatePartRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub part_number: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::models::nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_decimal_non_negative")]
    pub unit_price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub reorder_point: Option<i32>,
}

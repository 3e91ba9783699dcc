//! Utilidades de validación
//!
//! Validadores `custom` para `validator` y conversión de parámetros de
//! consulta.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

use crate::utils::errors::{bad_request_error, AppResult};

lazy_static! {
    /// 17 caracteres alfanuméricos, sin I, O ni Q
    pub static ref VIN_REGEX: Regex = Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap();
}

/// Validar VIN (ISO 3779)
pub fn validate_vin(value: &str) -> Result<(), ValidationError> {
    if VIN_REGEX.is_match(&value.to_uppercase()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("vin");
        error.add_param("value".into(), &value.to_string());
        Err(error)
    }
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Validar importes y horas no negativos
pub fn validate_decimal_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

/// Años aceptados en parámetros de fecha; fuera de aquí la aritmética de semanas desborda
const DATE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Convertir parámetro `YYYY-MM-DD`
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .filter(|date| DATE_YEARS.contains(&date.year()))
        .ok_or_else(|| bad_request_error(&format!("Fecha inválida '{}', formato esperado YYYY-MM-DD", value)))
}

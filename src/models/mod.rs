//! Modelos del sistema
//!
//! Entidades tal como las devuelve el record store (decimales como texto,
//! timestamps RFC 3339) y requests de escritura con sus validaciones.

pub mod customer;
pub mod job;
pub mod mechanic;
pub mod part;
pub mod service;
pub mod vehicle;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::store::Row;

/// Serializa un request a fila del store
pub fn to_row<T: Serialize>(value: &T) -> Row {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Row::new(),
    }
}

/// Campo anulable en un PATCH: ausente → `None`, `null` → `Some(None)`.
/// Va junto a `#[serde(default)]` para que la ausencia no llegue aquí.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Proyección mínima `{ name }` de una entidad relacionada
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NameOnly {
    pub name: String,
}

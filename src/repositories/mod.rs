//! Repositorios
//!
//! Acceso tipado por entidad sobre el record store. Cada repositorio
//! describe la forma de sus lecturas (`Select`) y decodifica las filas a
//! los modelos.

pub mod customer_repository;
pub mod job_repository;
pub mod mechanic_repository;
pub mod part_repository;
pub mod service_repository;
pub mod vehicle_repository;

pub use customer_repository::CustomerRepository;
pub use job_repository::JobRepository;
pub use mechanic_repository::MechanicRepository;
pub use part_repository::PartRepository;
pub use service_repository::ServiceRepository;
pub use vehicle_repository::VehicleRepository;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::store::{Collection, Row, StoreError};
use crate::utils::errors::AppResult;

/// Decodifica una fila del store al modelo `T`
pub(crate) fn decode<T: DeserializeOwned>(collection: Collection, row: Row) -> AppResult<T> {
    serde_json::from_value(Value::Object(row))
        .map_err(|e| StoreError::MalformedRow(format!("{}: {}", collection, e)).into())
}

pub(crate) fn decode_all<T: DeserializeOwned>(collection: Collection, rows: Vec<Row>) -> AppResult<Vec<T>> {
    rows.into_iter().map(|row| decode(collection, row)).collect()
}

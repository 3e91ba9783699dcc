//! Configuración del proyecto
//!
//! Variables de entorno del servidor y del pool de PostgreSQL.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::*;

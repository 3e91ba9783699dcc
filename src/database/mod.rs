//! Módulo de base de datos
//!
//! Conexión a PostgreSQL y migraciones del esquema

pub mod connection;

pub use connection::connect_and_migrate;

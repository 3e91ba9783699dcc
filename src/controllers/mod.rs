//! Controladores
//!
//! Orquestan validación, repositorios y reglas de negocio por funcionalidad.

pub mod customer_controller;
pub mod dashboard_controller;
pub mod invoice_controller;
pub mod job_controller;
pub mod mechanic_controller;
pub mod part_controller;
pub mod schedule_controller;
pub mod service_controller;
pub mod vehicle_controller;

//! Lógica de negocio pura: facturación, inventario, ciclo de vida de
//! trabajos, búsqueda y agenda semanal. Nada aquí toca el almacenamiento.

pub mod inventory_rules;
pub mod invoice_calculator;
pub mod job_lifecycle;
pub mod search;
pub mod week_schedule;

//! Utilidades del sistema
//!
//! Manejo de errores y validación comunes a controladores y modelos.

pub mod errors;
pub mod validation;

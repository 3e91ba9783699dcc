//! DTOs de la API: envoltorio de respuesta y vistas compuestas

pub mod api_response;
pub mod dashboard_dto;
pub mod invoice_dto;
pub mod schedule_dto;
pub mod search_dto;

pub use api_response::ApiResponse;

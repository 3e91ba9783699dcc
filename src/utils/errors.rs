//! Sistema de manejo de errores
//!
//! Este módulo define los errores de la aplicación y su conversión a
//! respuestas HTTP `{ error, message, details?, code }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

fn store_error_response(err: StoreError) -> (StatusCode, ErrorResponse) {
    match err {
        StoreError::NotFound { .. } => {
            tracing::warn!("Recurso no encontrado: {}", err);
            (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Not Found", err.to_string(), "NOT_FOUND"),
            )
        }
        StoreError::ForeignKeyViolation(_) | StoreError::UniqueViolation(_) => {
            tracing::warn!("Conflicto de integridad: {}", err);
            (
                StatusCode::CONFLICT,
                ErrorResponse::new("Conflict", err.to_string(), "CONFLICT"),
            )
        }
        StoreError::CheckViolation(_)
        | StoreError::InvalidValue { .. }
        | StoreError::MissingColumn { .. }
        | StoreError::ImmutableColumn { .. }
        | StoreError::UnknownColumn { .. }
        | StoreError::UnknownRelation { .. } => {
            tracing::warn!("Escritura rechazada por el store: {}", err);
            (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Validation Error", err.to_string(), "VALIDATION_ERROR"),
            )
        }
        StoreError::Database(_) | StoreError::MalformedRow(_) => {
            tracing::error!("Error del store: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    "DB_ERROR",
                )
                .with_details(json!({ "store_error": err.to_string() })),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Store(e) => store_error_response(e),

            AppError::Validation(e) => {
                tracing::warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "Validation Error",
                        "The provided data is invalid".to_string(),
                        "VALIDATION_ERROR",
                    )
                    .with_details(json!(e)),
                )
            }

            AppError::NotFound(msg) => {
                tracing::warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("Not Found", msg, "NOT_FOUND"),
                )
            }

            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Internal Server Error",
                        "An unexpected error occurred".to_string(),
                        "INTERNAL_ERROR",
                    )
                    .with_details(json!({ "internal_error": msg })),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

/// Función helper para crear errores internos
pub fn internal_error(message: &str) -> AppError {
    AppError::Internal(message.to_string())
}

use serde::Serialize;

/// Envoltorio común de las respuestas de la API
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: None,
        }
    }
}

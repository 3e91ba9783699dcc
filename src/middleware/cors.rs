//! Middleware de CORS
//!
//! En desarrollo, o sin `CORS_ORIGINS`, se acepta cualquier origen. En
//! otro caso solo los orígenes configurados.

use axum::http::{HeaderName, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::environment::EnvironmentConfig;

/// Capa de CORS según la configuración del entorno
pub fn cors_layer(config: &EnvironmentConfig) -> CorsLayer {
    if config.is_development() || config.cors_origins.is_empty() {
        CorsLayer::very_permissive()
    } else {
        cors_middleware_with_origins(&config.cors_origins)
    }
}

/// Crear middleware de CORS con orígenes específicos
pub fn cors_middleware_with_origins(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ Origen CORS inválido ignorado: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(Duration::from_secs(3600))
}

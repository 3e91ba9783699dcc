//! Configuración de variables de entorno
//!
//! Todas las variables tienen valor por defecto salvo las que solo necesita
//! el backend PostgreSQL (ver `DatabaseConfig`).

use anyhow::{anyhow, Context, Result};
use chrono::Weekday;
use std::env;
use std::str::FromStr;

use crate::services::week_schedule::parse_week_start;

/// Backend del record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("STORE_BACKEND desconocido: '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub store_backend: StoreBackend,
    pub week_starts_on: Weekday,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            store_backend: StoreBackend::Postgres,
            week_starts_on: Weekday::Sun,
        }
    }
}

impl EnvironmentConfig {
    /// Lee la configuración de las variables de entorno
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Lee la configuración de una fuente clave/valor arbitraria
    pub fn from_source<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid number, got '{}'", port))?,
            None => defaults.port,
        };

        let store_backend = match get("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.store_backend,
        };

        let week_starts_on = match get("WEEK_STARTS_ON") {
            Some(value) => {
                parse_week_start(&value).ok_or_else(|| anyhow!("WEEK_STARTS_ON inválido: '{}'", value))?
            }
            None => defaults.week_starts_on,
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            host: get("HOST").unwrap_or(defaults.host),
            cors_origins,
            store_backend,
            week_starts_on,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EnvironmentConfig::from_source(source(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.week_starts_on, Weekday::Sun);
        assert!(config.is_development());
        assert_eq!(config.server_url(), "0.0.0.0:3000");
    }

    #[test]
    fn test_reads_values() {
        let config = EnvironmentConfig::from_source(source(&[
            ("ENVIRONMENT", "production"),
            ("PORT", "8080"),
            ("STORE_BACKEND", "memory"),
            ("WEEK_STARTS_ON", "monday"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.week_starts_on, Weekday::Mon);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert!(!config.is_development());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(EnvironmentConfig::from_source(source(&[("PORT", "abc")])).is_err());
        assert!(EnvironmentConfig::from_source(source(&[("STORE_BACKEND", "redis")])).is_err());
        assert!(EnvironmentConfig::from_source(source(&[("WEEK_STARTS_ON", "someday")])).is_err());
    }
}

//! Configuración de base de datos
//!
//! Parámetros del pool de PostgreSQL con SQLx.

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::env;
use std::time::Duration;

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 5,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        }
    }

    /// DATABASE_URL es obligatoria; el resto tiene valores por defecto
    pub fn from_env() -> Result<Self> {
        let url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment variables")?;
        let mut config = Self::new(url);

        if let Ok(value) = env::var("DB_MAX_CONNECTIONS") {
            config.max_connections = value.parse().context("DB_MAX_CONNECTIONS must be a valid number")?;
        }
        if let Ok(value) = env::var("DB_MIN_CONNECTIONS") {
            config.min_connections = value.parse().context("DB_MIN_CONNECTIONS must be a valid number")?;
        }
        if let Ok(value) = env::var("DB_CONNECT_TIMEOUT_SECS") {
            let secs: u64 = value.parse().context("DB_CONNECT_TIMEOUT_SECS must be a valid number")?;
            config.connect_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_defaults() {
        let config = DatabaseConfig::new("postgresql://localhost/garage");
        assert_eq!(config.max_connections, 20);
        assert!(config.min_connections <= config.max_connections);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }
}

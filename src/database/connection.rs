//! Conexión a PostgreSQL
//!
//! Crea el pool y aplica las migraciones de `migrations/` al arrancar.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Crear el pool de conexiones y aplicar migraciones pendientes
pub async fn connect_and_migrate(config: &DatabaseConfig) -> Result<PgPool> {
    tracing::info!("🗄️ Conectando a PostgreSQL: {}", mask_database_url(&config.url));

    let pool = config
        .create_pool()
        .await
        .context("No se pudo conectar a PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Error aplicando migraciones")?;
    tracing::info!("✅ Migraciones aplicadas");

    Ok(pool)
}

/// Enmascara las credenciales de la URL de la base de datos para los logs
fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.find('@') else {
        return url.to_string();
    };
    match url.find("://") {
        Some(scheme_end) if scheme_end < at_pos => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}

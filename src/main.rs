use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use garage_dashboard::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use garage_dashboard::database::connect_and_migrate;
use garage_dashboard::routes::create_router;
use garage_dashboard::state::AppState;
use garage_dashboard::store::{MemoryRecordStore, PgRecordStore, RecordStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("garage_dashboard=debug,tower_http=info")),
        )
        .init();

    info!("🔧 Garage Dashboard API");
    info!("========================");

    let config = EnvironmentConfig::from_env()?;
    info!("🌍 Entorno: {}", config.environment);

    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = match connect_and_migrate(&db_config).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            Arc::new(PgRecordStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("⚠️ Usando almacenamiento en memoria, los datos se pierden al reiniciar");
            Arc::new(MemoryRecordStore::new())
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let server_url = config.server_url();
    let app = create_router(AppState::new(store, config));

    info!("🌐 Servidor iniciando en {}", server_url);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("👤 Clientes:");
    info!("   GET|POST /api/customers  ·  GET|PUT|DELETE /api/customers/:id");
    info!("   POST /api/customers/:id/vehicles - Añadir vehículo");
    info!("🚗 Vehículos:");
    info!("   GET|POST /api/vehicles  ·  GET|PUT|DELETE /api/vehicles/:id");
    info!("🛠️ Servicios y mecánicos:");
    info!("   GET|POST /api/services  ·  GET|PUT|DELETE /api/services/:id");
    info!("   GET|POST /api/mechanics  ·  GET|PUT|DELETE /api/mechanics/:id");
    info!("📦 Inventario:");
    info!("   GET|POST /api/parts  ·  GET|PUT|DELETE /api/parts/:id");
    info!("📋 Trabajos:");
    info!("   GET|POST /api/jobs  ·  GET|PUT|DELETE /api/jobs/:id");
    info!("   PATCH /api/jobs/:id/status - Cambiar estado");
    info!("   GET  /api/jobs/:id/invoice - Factura");
    info!("   POST /api/jobs/:id/parts  ·  DELETE /api/jobs/:id/parts/:job_part_id");
    info!("📊 GET /api/dashboard  ·  📅 GET /api/schedule?date=YYYY-MM-DD");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}

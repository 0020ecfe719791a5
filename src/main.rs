use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use trip_management::config::{DatabaseConfig, EnvironmentConfig};
use trip_management::database::{self, seed_default_drivers};
use trip_management::repositories::MemoryStore;
use trip_management::routes::create_router;
use trip_management::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚚 Trip Management API");
    info!("======================");

    let config = EnvironmentConfig::from_env()?;
    let seed = config.seed_default_drivers;

    let state = match DatabaseConfig::from_env()? {
        Some(db_config) => match database::connect(&db_config).await {
            Ok(pool) => AppState::with_postgres(pool, config),
            Err(e) => {
                error!("❌ Error conectando a la base de datos: {:#}", e);
                return Err(e);
            }
        },
        None => {
            warn!("⚠️ DATABASE_URL no definida; usando almacén en memoria (los datos no persisten)");
            AppState::in_memory(config, MemoryStore::new())
        }
    };

    if seed {
        let created = seed_default_drivers(state.drivers.as_ref()).await?;
        if created > 0 {
            info!("🌱 {} conductores iniciales creados", created);
        }
    }

    let addr: SocketAddr = state.config.server_url().parse()?;
    let app = create_router(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("🧭 Admin: /api/admin/trips, /api/admin/trips/dashboard");
    info!("📌 Admin: /api/admin/places, /api/admin/drivers");
    info!("🚗 Conductor: /api/driver/trips, /api/places");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("No se pudo instalar el handler de SIGTERM: {}", e);
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

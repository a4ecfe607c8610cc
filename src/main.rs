use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use fleet_routing::config::database::DatabaseConfig;
use fleet_routing::config::EnvironmentConfig;
use fleet_routing::database::DatabaseConnection;
use fleet_routing::routes::create_router;
use fleet_routing::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🚚 Fleet Routing - rutas, vehículos y conductores");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);

    let state = match config.database_url.clone() {
        Some(url) => {
            let db_connection = match DatabaseConnection::connect(&DatabaseConfig::from_url(url)).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            AppState::postgres(config.clone(), db_connection.pool().clone())
        }
        None => {
            warn!("⚠️ DATABASE_URL no definida, usando almacenamiento en memoria");
            AppState::in_memory(config.clone())
        }
    };

    let app = create_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en {}", config.server_url());
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🛣️ Rutas:");
    info!("   POST /routes - Crear ruta");
    info!("   GET  /routes - Listar rutas (?search=&status=&includeInactive=)");
    info!("   GET  /routes/:id - Obtener ruta");
    info!("   PATCH /routes/:id - Editar trayecto");
    info!("   POST /routes/:id/start|complete|cancel - Ciclo de vida");
    info!("   POST /routes/:id/activate|deactivate - Activación");
    info!("   DELETE /routes/:id - Eliminar ruta");
    info!("🚗 Vehículos: /vehicles (POST, GET, GET/PATCH/DELETE :id, activate/deactivate)");
    info!("🧑 Conductores: /driver (POST, GET, GET/PATCH/DELETE :id, activate/deactivate)");

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
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
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
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
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

use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use taller_backend::cache::{CacheConfig, RedisClient};
use taller_backend::config::EnvironmentConfig;
use taller_backend::controllers::auth_controller::AuthController;
use taller_backend::database::DatabaseConnection;
use taller_backend::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("taller_backend=debug,tower_http=info")),
        )
        .init();

    info!("🔧 Taller Backend - API de gestión de talleres");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if config.run_migrations {
        db_connection.run_migrations().await?;
    }

    let pool = db_connection.pool().clone();

    // Redis es opcional: sin él los catálogos se leen siempre de la base
    let cache = match CacheConfig::from_environment(&config) {
        Some(cache_config) => match RedisClient::new(cache_config).await {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("⚠️ Redis no disponible, se continúa sin cache: {}", e);
                None
            }
        },
        None => {
            info!("ℹ️ REDIS_URL no configurado, cache deshabilitado");
            None
        }
    };

    let app_state = AppState::new(pool, config.clone(), cache);

    if let Err(e) = AuthController::new(app_state.clone()).bootstrap_admin().await {
        error!("❌ No se pudo crear el administrador inicial: {}", e);
    }

    let app = create_app(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Usuario actual");
    info!("🏢 Administración: /api/branches, /api/users, /api/roles");
    info!("👥 Clientes y vehículos: /api/clients, /api/vehicles");
    info!("🔧 Taller: /api/mechanics, /api/work-statuses, /api/services");
    info!("📅 Seguimiento: /api/appointments, /api/opportunities");
    info!("📝 Recepción: /api/reception/receive-vehicle, /api/reception/today");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
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

use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use delivery_routes::config::{EnvironmentConfig, NotificationConfig};
use delivery_routes::repositories::InMemoryRouteRepository;
use delivery_routes::routes::create_app_router;
use delivery_routes::services::NotificationService;
use delivery_routes::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging; los registros del facade `log` entran al mismo subscriber
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚚 Delivery Routes - servicio de ciclo de vida de rutas");
    info!("=====================================================");

    let notification_config = NotificationConfig::from_env()?;
    if let Err(e) = notification_config.validate() {
        error!("❌ Configuración de notificaciones inválida: {}", e);
        return Err(e.into());
    }
    let notifier = NotificationService::from_config(&notification_config);

    let repository = Arc::new(InMemoryRouteRepository::new());
    let app_state = AppState::new(config.clone(), repository, Arc::new(notifier));
    let app = create_app_router(app_state);

    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS_ORIGINS vacío en producción: se aceptan todos los orígenes");
    }

    let addr = config.server_url();

    info!("🌐 Servidor iniciando en http://{} ({})", addr, config.environment);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    info!("   POST /routes - Crear ruta");
    info!("   GET  /routes?status= - Listar rutas");
    info!("   GET  /routes/:id - Obtener ruta");
    info!("   PUT  /routes/:id - Actualizar ruta");
    info!("   POST /routes/:id/purchases - Asignar compra");
    info!("   PUT  /routes/:id/purchases/:purchase_id - Estado de compra");
    info!("   POST /routes/:id/complete - Completar ruta");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(e) = axum::serve(listener, app)
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
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
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

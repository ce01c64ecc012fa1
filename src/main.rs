use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use coldchain_monitor::config::environment::EnvironmentConfig;
use coldchain_monitor::database::create_pool;
use coldchain_monitor::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use coldchain_monitor::routes;
use coldchain_monitor::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🧊 Cold-Chain Monitor - Risk Scoring Engine");
    info!("===========================================");

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let config = EnvironmentConfig::default();
    let addr: SocketAddr = config.server_url().parse()?;

    // En producción solo se admiten los orígenes configurados
    let cors = if config.is_production() && !config.cors_origins.is_empty() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/risk", routes::risk_routes::create_risk_router())
        .layer(cors)
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("⚠️  Endpoints de riesgo:");
    info!("   GET  /api/risk/vehicle/:id - Evaluar riesgo de vehículo");
    info!("   GET  /api/risk/trip/:id - Evaluar riesgo y ETA de viaje");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Cold-Chain Monitor funcionando correctamente",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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

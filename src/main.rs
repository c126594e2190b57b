//! Gateway entry point: configuration, tracing, adapter wiring, HTTP server.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use whatsapp_gateway::adapters::http::{gateway_router, GatewayState};
use whatsapp_gateway::adapters::storage::FileCredentialStore;
use whatsapp_gateway::adapters::wire::LoopbackWireClient;
use whatsapp_gateway::application::{LifecycleManager, MessageDispatcher};
use whatsapp_gateway::config::{AppConfig, ServerConfig};
use whatsapp_gateway::ports::{CredentialStore, WireClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server, config.is_production());

    // The loopback transport accepts and logs sends without delivering them.
    // A production protocol client plugs in through the same port.
    let wire: Arc<dyn WireClient> = Arc::new(LoopbackWireClient::new());
    warn!("wire transport: in-process loopback (messages are logged, not delivered)");

    let credentials: Arc<dyn CredentialStore> =
        Arc::new(FileCredentialStore::new(&config.messaging.auth_dir));

    let lifecycle = LifecycleManager::new(
        wire.clone(),
        credentials,
        config.messaging.session_options(),
    );
    let dispatcher = Arc::new(MessageDispatcher::new(wire, lifecycle.clone()));

    // Failures transition to `error` and self-schedule a retry, so startup
    // continues regardless.
    lifecycle.connect().await;

    let app = gateway_router(GatewayState::new(lifecycle.clone(), dispatcher))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(lifecycle))
        .await?;

    info!("gateway stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig, production: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));

    if production {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// CORS for the CRM frontends. Explicit origins when configured, permissive
/// otherwise (local development).
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = server.cors_origins_list();
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    // Wildcards cannot be combined with credentials, so explicit origins get
    // explicit methods and headers.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Resolves on SIGINT/SIGTERM, after best-effort session teardown.
async fn shutdown_signal(lifecycle: Arc<LifecycleManager>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received, ending wire session");
    lifecycle.shutdown().await;
}

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fwhub_api::config::ServerConfig;
use fwhub_api::router::build_app_router;
use fwhub_api::state::AppState;
use fwhub_core::trigger::profiles::JobProfiles;
use fwhub_core::trigger::script::ScriptJobTrigger;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fwhub_api=debug,fwhub_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let store = fwhub_db::open_store(config.database_url.as_deref()).await;
    tracing::info!(storage = store.kind().label(), "Storage backend selected");

    // --- Job trigger gateway ---
    let profiles = match &config.job_profiles_path {
        Some(path) => JobProfiles::load(path).expect("Failed to load job profiles"),
        None => JobProfiles::builtin(),
    };
    let job_trigger = ScriptJobTrigger::new(config.trigger_command.clone(), profiles)
        .with_working_directory(config.trigger_workdir.clone())
        .with_timeout(config.trigger_timeout());
    tracing::info!(
        command = ?config.trigger_command,
        timeout_secs = config.trigger_timeout_secs,
        "Job trigger gateway configured"
    );

    // --- App state ---
    let state = AppState {
        store: Arc::clone(&store),
        config: Arc::new(config.clone()),
        job_trigger: Arc::new(job_trigger),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    store.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

//! floodzy-server: Main Entry Point

use floodzy_core::config::{get_config, load_environment};
use floodzy_core::Settings;
use floodzy_web::{create_router, AppState};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = load_environment();
    init_tracing();

    if let Some(path) = env_file {
        info!("Loaded environment from {}", path);
    }

    let settings = Settings::from_env()?;
    info!(
        "Starting floodzy-server {} ({:?})",
        env!("CARGO_PKG_VERSION"),
        settings.run_mode
    );

    let state = Arc::new(AppState::new(settings)?);
    let app = create_router(state.clone());

    let addr = state.settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}/chatbot", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` overrides the default filter; `FLOODZY_LOG_FORMAT=json` for JSON lines
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,floodzy_web=debug"));
    let registry = tracing_subscriber::registry().with(filter);

    if get_config("FLOODZY_LOG_FORMAT", "compact").eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down...");
        },
    }
}

//! factuur API server
//!
//! # Usage
//!
//! ```bash
//! cargo run --features http --bin factuur-server
//!
//! FACTUUR_CONFIG=factuur.toml FACTUUR_SERVER__PORT=9000 cargo run --features http --bin factuur-server
//! ```
//!
//! # Environment Variables
//!
//! * `FACTUUR_CONFIG` - Optional settings file (TOML, JSON or YAML)
//! * `FACTUUR_DATA_DIR` - Directory holding the JSON documents (default: .)
//! * `FACTUUR_KEY_SCHEME` - `per_customer` or `per_company_customer`
//! * `FACTUUR_SERVER__HOST` / `FACTUUR_SERVER__PORT` - Bind address (default: 127.0.0.1:8080)
//! * `FACTUUR_SERVER__LOG_LEVEL` - Log filter, overridden by `RUST_LOG` (default: info)

use std::path::PathBuf;

use factuur::http::create_router;
use factuur::invoicing::InvoiceService;
use factuur::settings::Settings;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config_file = std::env::var_os("FACTUUR_CONFIG").map(PathBuf::from);
    let settings = Settings::load(config_file.as_deref())?;

    init_tracing(&settings.server.log_level);

    let addr = settings.server.addr();
    tracing::info!(
        %addr,
        data_dir = %settings.data_dir.display(),
        key_scheme = ?settings.key_scheme,
        "starting factuur server"
    );

    let app = create_router(InvoiceService::from_settings(settings));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}

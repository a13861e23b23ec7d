mod becs;
mod config;
mod db;
mod dns;
mod handlers;
mod models;
mod netbox;
mod notify;
mod oxidized;
mod router;
mod scheduler;
mod utils;

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use db::Store;
use notify::Notifier;
use scheduler::SyncScheduler;

/// Application state shared across handlers
pub struct AppState {
    pub store: Store,
    pub config: Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "element_sync=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::load();
    let notifier = Notifier::new(cfg.notify_webhook.clone());

    // The one boundary that turns a fatal error into an operator notification
    match run(cfg, notifier.clone()).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("Fatal error: {:#}", e);
            notifier.send("element-sync failed", &format!("{:#}", e)).await;
            Err(e)
        }
    }
}

async fn run(cfg: Config, notifier: Notifier) -> anyhow::Result<()> {
    tracing::info!("Starting element-sync");
    tracing::info!("Database: {}", cfg.db_path);
    tracing::info!("Listen: {}", cfg.listen_addr);
    tracing::info!("Default domain: {}", cfg.default_domain);

    // Initialize database
    let store = Store::with_pool_size(&cfg.db_path, cfg.db_max_connections).await?;
    tracing::info!("Database initialized (pool_size={})", cfg.db_max_connections);

    // Start the periodic sync loop
    let mut sync_scheduler = SyncScheduler::new(store.clone(), cfg.clone(), notifier);
    if cfg.sync_interval_secs > 0 {
        sync_scheduler.start();
    } else {
        tracing::info!("Periodic sync disabled (SYNC_INTERVAL_SECS=0)");
    }

    // Create app state and router
    let state = Arc::new(AppState {
        store,
        config: cfg.clone(),
    });
    let app = router::build(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("element-sync listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("element-sync shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

use tokio::time::{interval, Duration};

use crate::config::Config;
use crate::db::Store;
use crate::notify::Notifier;
use crate::{becs, dns, netbox};

/// Periodic sync driver. Runs every source sync and the DNS pipeline
/// sequentially on a fixed interval — one task, so writers for the same
/// source tag can never overlap.
pub struct SyncScheduler {
    store: Store,
    config: Config,
    notifier: Notifier,
    stop_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl SyncScheduler {
    pub fn new(store: Store, config: Config, notifier: Notifier) -> Self {
        Self {
            store,
            config,
            notifier,
            stop_tx: None,
        }
    }

    /// Start the sync loop. The first cycle runs immediately.
    pub fn start(&mut self) {
        let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel();
        self.stop_tx = Some(stop_tx);

        let store = self.store.clone();
        let config = self.config.clone();
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(config.sync_interval_secs));

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        run_all(&config, &store, &notifier).await;
                    }
                    _ = &mut stop_rx => {
                        tracing::info!("Sync scheduler stopped");
                        break;
                    }
                }
            }
        });
    }

    #[allow(dead_code)]
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// One full sync cycle. A failing stage is logged and reported to the
/// notifier; the remaining stages still run.
pub async fn run_all(config: &Config, store: &Store, notifier: &Notifier) {
    if !config.netbox_url.is_empty() {
        if let Err(e) = netbox::run_sync(config, store).await {
            tracing::error!("NetBox sync failed: {:#}", e);
            notifier.send("NetBox sync failed", &format!("{:#}", e)).await;
        }
    }

    if !config.becs_url.is_empty() {
        if let Err(e) = becs::run_sync(config, store).await {
            tracing::error!("BECS sync failed: {:#}", e);
            notifier.send("BECS sync failed", &format!("{:#}", e)).await;
        }
    }

    if let Err(e) = dns::run_pipeline(config, store).await {
        tracing::error!("DNS record generation failed: {:#}", e);
        notifier
            .send("DNS record generation failed", &format!("{:#}", e))
            .await;
    }
}

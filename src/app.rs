//! Main application.
//!
//! Wires the sync engine, the file watcher and the dispatcher together and
//! runs until a shutdown signal arrives.

use std::sync::Arc;

use tokio::signal;

use crate::config::Config;
use crate::header::supported_keys;
use crate::sync::{ensure_list_files, ensure_tree_file, report_missing, SyncEngine};
use crate::watcher::{Dispatcher, FileWatcher, WatcherConfig};
use crate::{Error, Result};

/// The header watcher application.
pub struct App {
    config: Config,
}

impl App {
    /// Create a new application.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run until shutdown signal.
    ///
    /// Startup order: ensure the tree file (fatal on failure) and the list
    /// files, warn about missing inclusion entries, start watching, then
    /// synchronize every listed file once and render the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree file cannot be created or the watcher
    /// cannot start.
    pub async fn run(self) -> Result<()> {
        let engine = Arc::new(self.start_up()?);

        let watcher = FileWatcher::new(&WatcherConfig {
            latency: self.config.watch_latency,
        });
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&engine),
            Arc::new(watcher.handle()),
        ));

        let on_batch = Arc::clone(&dispatcher);
        watcher.start(move |batch| on_batch.dispatch_batch(batch))?;
        dispatcher.register_roots(&engine.store().inclusion());

        tracing::info!(
            root = %self.config.root.display(),
            supported = ?supported_keys().collect::<Vec<_>>(),
            "Watching for changes"
        );

        let synced = initial_sync(Arc::clone(&engine)).await?;
        tracing::info!(files = synced, "Initial sync complete");

        shutdown_signal().await;

        watcher.stop();
        let stats = engine.stats();
        tracing::info!(
            written = stats.written,
            unchanged = stats.unchanged,
            debounced = stats.debounced,
            failed = stats.failed,
            "File watcher stopped"
        );
        Ok(())
    }

    fn start_up(&self) -> Result<SyncEngine> {
        ensure_tree_file(&self.config)?;
        ensure_list_files(&self.config);

        let engine = SyncEngine::new(self.config.clone());
        report_missing(engine.store(), &self.config.root);

        if engine.store().inclusion().is_empty() {
            tracing::info!(
                "No files listed in {}; add paths (one per line) to receive headers",
                self.config.watchlist_name()
            );
            tracing::info!(
                "Add regex patterns to {} to exclude paths",
                self.config.donotwatchlist_name()
            );
        }
        Ok(engine)
    }
}

/// Synchronize every listed file once, then render the tree.
///
/// Runs on the blocking pool; returns how many listed files exist.
async fn initial_sync(engine: Arc<SyncEngine>) -> Result<usize> {
    tokio::task::spawn_blocking(move || {
        let synced = engine.sync_listed().len();
        engine.refresh_tree();
        synced
    })
    .await
    .map_err(|e| Error::internal(format!("initial sync failed: {e}")))
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C).
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}

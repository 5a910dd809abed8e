//! Headerwatch - header and project-tree synchronizer
//!
//! Entry point for the watcher.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use headerwatch::observability::{init_tracing, TracingConfig};
use headerwatch::{App, Config, Error, Result};

/// Headerwatch - keeps file headers and the project tree in sync
#[derive(Parser, Debug)]
#[command(name = "headerwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project root to watch
    #[arg(short, long, env = "HEADERWATCH_ROOT", default_value = ".")]
    root: PathBuf,

    /// Inclusion-list file, relative to the root
    #[arg(long, env = "HEADERWATCH_WATCHLIST", default_value = ".watchlist")]
    watchlist: PathBuf,

    /// Exclusion-list file, relative to the root
    #[arg(long, env = "HEADERWATCH_DONOTWATCHLIST", default_value = ".donotwatchlist")]
    donotwatchlist: PathBuf,

    /// Tree file, relative to the root
    #[arg(long, env = "HEADERWATCH_TREE_FILE", default_value = ".cursorrules")]
    tree_file: PathBuf,

    /// Minimum gap between accepted events for one path, in milliseconds
    #[arg(long, env = "HEADERWATCH_EVENT_DEBOUNCE_MS", default_value = "100")]
    event_debounce_ms: u64,

    /// Minimum gap between header rewrites for one path, in milliseconds
    #[arg(long, env = "HEADERWATCH_REWRITE_DEBOUNCE_MS", default_value = "1000")]
    rewrite_debounce_ms: u64,

    /// Coalescing latency of the file event backend, in milliseconds
    #[arg(long, env = "HEADERWATCH_WATCH_LATENCY_MS", default_value = "50")]
    watch_latency_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HEADERWATCH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "HEADERWATCH_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
    });

    tracing::info!(
        "Headerwatch v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let root = cli.root.canonicalize().map_err(|e| {
        Error::config(format!("cannot resolve root {}: {e}", cli.root.display()))
    })?;

    let config = Config {
        root,
        watchlist: cli.watchlist,
        donotwatchlist: cli.donotwatchlist,
        tree_file: cli.tree_file,
        event_debounce: Duration::from_millis(cli.event_debounce_ms),
        rewrite_debounce: Duration::from_millis(cli.rewrite_debounce_ms),
        watch_latency: Duration::from_millis(cli.watch_latency_ms),
        log_level: cli.log_level,
    };

    tracing::debug!(?config, "Configuration loaded");
    config.validate()?;

    App::new(config).run().await
}

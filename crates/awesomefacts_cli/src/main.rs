//! AwesomeFacts server entry point.
//!
//! # Responsibility
//! - Read startup configuration from flags and environment.
//! - Initialize logging, open the configured backend, serve HTTP.

use anyhow::Context;
use awesomefacts_core::{
    core_version, default_log_level, init_logging, FactService, FactStore, LogTarget,
    StorageConfig, StorageKind,
};
use clap::Parser;
use log::{info, LevelFilter};
use std::net::SocketAddr;
use std::path::PathBuf;

const BIND_ADDRESS_DEFAULT: &str = "127.0.0.1:5000";

/// CRUD service for facts backed by a JSON file or SQLite.
#[derive(Parser, Debug)]
#[command(name = "awesomefacts")]
#[command(version)]
struct Cli {
    /// Storage backend: json|sqlite
    #[arg(long, env = "AWESOMEFACTS_BACKEND", default_value = "sqlite")]
    backend: StorageKind,

    /// Facts file (json) or database file (sqlite); defaults per backend
    #[arg(long, env = "AWESOMEFACTS_DATA_PATH")]
    data_path: Option<PathBuf>,

    /// HTTP bind address
    #[arg(long, env = "AWESOMEFACTS_BIND", default_value = BIND_ADDRESS_DEFAULT)]
    bind: SocketAddr,

    /// off|error|warn|info|debug|trace; defaults per build mode
    #[arg(long, env = "AWESOMEFACTS_LOG_LEVEL")]
    log_level: Option<LevelFilter>,

    /// Directory for rolling log files; stderr when unset
    #[arg(long, env = "AWESOMEFACTS_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn storage_config(&self) -> StorageConfig {
        let kind = self.backend;
        let path = self
            .data_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(kind.default_file_name()));
        StorageConfig::new(kind, path)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.unwrap_or_else(default_log_level);
    init_logging(level, LogTarget::from_dir(cli.log_dir.clone())).map_err(anyhow::Error::msg)?;

    let config = cli.storage_config();
    let store = FactStore::open(&config).with_context(|| {
        format!(
            "failed to open {} storage at `{}`",
            config.kind(),
            config.path().display()
        )
    })?;
    let app = awesomefacts_api::router(FactService::new(store));

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!(
        "event=server_start module=cli status=ok bind={} backend={} version={}",
        cli.bind,
        config.kind(),
        core_version()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    info!("event=server_stop module=cli status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=server_stop module=cli status=error error={err}");
    }
}

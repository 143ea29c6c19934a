mod cli;

use crate::cli::{Command, StorageBackendArg, CLI};
use anyhow::{bail, Context};
use clap::Parser;
use roundabout_gateway::{App, AppState};
use roundabout_ring::{Ring, RingService};
use roundabout_storage::{
    InMemoryContentRecords, InMemoryRingStore, MySqlContentRecords, MySqlOptions, MySqlRingStore,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    roundabout_telemetry::init(config.log_format.into(), DEFAULT_LOG_FILTER)?;

    match config.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config).await,
        Command::Migrate => {
            let store = mysql_store(&config).await?;
            store.migrate().await?;
            info!("schema is up to date");
            Ok(())
        }
        Command::Uninstall => {
            let store = mysql_store(&config).await?;
            let ring = RingService::new(store.clone(), MySqlContentRecords::new(store.pool().clone()));
            let removed = ring.purge().await?;
            store.uninstall().await?;
            info!(removed, "uninstalled");
            Ok(())
        }
    }
}

async fn mysql_store(config: &CLI) -> anyhow::Result<MySqlRingStore> {
    if config.storage != StorageBackendArg::Mysql {
        bail!("this command requires --storage mysql");
    }
    let dsn = config
        .mysql_dsn
        .as_deref()
        .context("mysql dsn is required when storage backend is mysql")?;

    let options = MySqlOptions::builder()
        .url(dsn)
        .max_connections(config.mysql_max_connections)
        .build();
    let store = MySqlRingStore::connect_with(&options).await?;
    Ok(store)
}

async fn serve(config: &CLI) -> anyhow::Result<()> {
    let ring: Arc<dyn Ring> = match config.storage {
        StorageBackendArg::InMemory => Arc::new(RingService::new(
            InMemoryRingStore::new(),
            InMemoryContentRecords::new(),
        )),
        StorageBackendArg::Mysql => {
            let store = mysql_store(config).await?;
            store.migrate().await?;
            let records = MySqlContentRecords::new(store.pool().clone());
            Arc::new(RingService::new(store, records))
        }
    };

    let state = AppState::new(ring, config.public_base_url.clone());
    let listener = TcpListener::bind(config.listen_addr).await?;

    info!(
        listen_addr = %listener.local_addr()?,
        storage_backend = %config.storage,
        public_base_url = %config.public_base_url,
        "starting gateway server"
    );

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

mod auth;
mod config;
mod engine;
mod monitoring;
mod notify;
mod store;
mod validation;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{debug, info};

use crate::auth::StaticAdminList;
use crate::config::Config;
use crate::engine::Engine;
use crate::monitoring::HttpProber;
use crate::notify::TracingSink;
use crate::store::{FileStore, RetentionLimits};

/// URL monitoring service with keep-alive pings and status alerts
#[derive(Debug, Parser)]
#[command(name = "upwatch", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the state file location from the config
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let cli = Cli::parse();

    let mut config = Config::from_config(cli.config.as_deref())
        .map_err(|error| anyhow!("failed to load configuration: {error:?}"))?;
    if let Some(data_file) = cli.data_file {
        config.storage.data_file = data_file;
    }
    config.validate().context("invalid configuration")?;
    debug!("{config}");

    let limits = RetentionLimits {
        max_records: config.history.max_records_per_target,
        max_record_age: Duration::from_secs(config.history.max_record_age_hours * 3600),
    };
    let store = Arc::new(FileStore::load(&config.storage.data_file, limits));

    let prober = Arc::new(HttpProber::new(
        config.monitoring.timeout_seconds,
        config.monitoring.max_redirects,
        (config.monitoring.accepted_status_min, config.monitoring.accepted_status_max),
    )?);
    let sink = Arc::new(TracingSink);
    let admins = Arc::new(StaticAdminList::new(config.admins.chat_ids.iter().copied()));

    let engine = Engine::start(&config, store, prober, sink, admins).await?;
    info!("upwatch service is running; press ctrl-c to stop");

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;

    engine.shutdown().await;
    Ok(())
}

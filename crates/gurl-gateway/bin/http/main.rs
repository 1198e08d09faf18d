mod cli;
mod telemetry;

use crate::cli::CLI;
use anyhow::Context;
use clap::Parser;
use gurl_core::SystemClock;
use gurl_gateway::{App, AppState};
use gurl_generator::RandomKeyGenerator;
use gurl_shortener::ShortenerService;
use gurl_storage::{ExpirySweeper, LinkStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    telemetry::init(config.log_format);

    let settings = config.link_settings();
    info!(
        listen_addr = %config.listen_addr,
        db_path = %config.db_path.display(),
        key_length = settings.key_length,
        separator_every = settings.separator_every,
        ttl = %settings.ttl,
        log_format = %config.log_format,
        "starting gurl"
    );

    let generator = RandomKeyGenerator::from_settings(&settings);
    let store = LinkStore::open(&config.db_path, settings, generator, SystemClock)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let store = Arc::new(store);

    let sweeper = ExpirySweeper::new(Arc::clone(&store)).spawn();
    let shortener = ShortenerService::new(store);
    let app = App::router(AppState::new(Arc::new(shortener), config.assume_tls));

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    sweeper.stop().await;
    info!("gurl stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

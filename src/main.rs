use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use sarkari_jobs::config::Settings;
use sarkari_jobs::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sarkari_jobs=info,tower_http=info")),
        )
        .init();

    let settings = Settings::new().context("reading SARKARI_* settings")?;
    let state = Arc::new(AppState::from_settings(settings)?);

    // a missing feed is not fatal; the board starts empty and can be refreshed
    match state.refresh().await {
        Ok(stats) => tracing::info!(
            "{} jobs from {} sources, {} posted today",
            stats.total_jobs,
            stats.total_sources,
            stats.today_jobs
        ),
        Err(err) => tracing::warn!("starting with an empty catalog: {err}"),
    }

    server::listen(state).await
}

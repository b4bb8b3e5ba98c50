pub mod handlers;
pub mod router;
pub mod state;

use anyhow::Context;

pub use router::build_routes;
pub use state::{AppState, SharedState};

pub async fn listen(state: SharedState) -> anyhow::Result<()> {
    let addr = state.settings.listen_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Listening at {}", addr);
    tokio::select! {
        r = axum::serve(listener, build_routes(state)) => {
            tracing::warn!("server ended unexpectedly: {:?}", &r)
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl+c interrupt, closing server");
        }
    }
    Ok(())
}

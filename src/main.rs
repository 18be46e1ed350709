use std::net::SocketAddr;

use agency_console::{auth::AuthGate, config, db::connect_db, handler};
use anyhow::Context;
use tokio::sync::watch;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = config::load().context("loading configuration")?;
    info!("Starting console in {:?} mode", cfg.env);

    let db = connect_db(cfg.seed_sample_data);
    tokio::spawn(log_changes("leads", db.leads.read().await.subscribe()));
    tokio::spawn(log_changes("clients", db.clients.read().await.subscribe()));

    let gate = AuthGate::new(cfg.access_token.clone());
    if gate.is_enabled() {
        info!("Access token required for console routes");
    }
    let app = handler::router(db, gate);

    let addr = SocketAddr::new(cfg.host, cfg.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!("Server is running on http://{}", addr);
    axum::serve(listener, app).await.context("serving http")?;

    Ok(())
}

async fn log_changes(collection: &'static str, mut revisions: watch::Receiver<u64>) {
    while revisions.changed().await.is_ok() {
        let revision = *revisions.borrow_and_update();
        debug!(collection, revision, "collection changed");
    }
}

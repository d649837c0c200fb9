//! # UnFiltered Binary
//!
//! The entry point that assembles the application from configuration.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use configs::{LogFormat, Settings};
use domains::Group;
use moderation_adapters::BlocklistModerator;
use services::{shared, ContentStore};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    let registry = tracing_subscriber::registry().with(filter);
    match settings.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// The store is volatile, so configured groups are recreated on every start.
fn seed_store(store: &mut ContentStore, settings: &Settings) {
    for seed in &settings.seed.groups {
        match store.add_group(Group::new(seed.name.clone(), seed.description.clone())) {
            Ok(group) => info!(group_id = %group.id, name = %group.name, "seeded group"),
            Err(e) => warn!(name = %seed.name, error = %e, "skipping seed group"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Configuration & logging
    let settings = Settings::load().context("loading configuration")?;
    init_tracing(&settings);
    let addr = settings.bind_address()?;

    // 2. Process-wide content store
    let mut store = ContentStore::new(settings.limits.clone());
    seed_store(&mut store, &settings);
    let store = shared(store);

    // 3. Moderation collaborator
    let moderator = Arc::new(BlocklistModerator::new(&settings.moderation));

    // 4. HTTP surface
    let app = router(AppState::new(store, moderator));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!("UnFiltered listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}

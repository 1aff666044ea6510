use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod metrics;
mod models;
mod settings;
mod store;
mod utils;

use settings::{ServiceConfig, StoreBackend};
use store::{CustomerStore, InMemoryCustomerStore, PgCustomerStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::load()?;

    // Structured logging; RUST_LOG overrides the configured filter
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .init();

    tracing::info!("🚀 Starting customer service");

    // === 1. Customer store ===
    let store: Arc<dyn CustomerStore> = match config.store.backend {
        StoreBackend::Postgres => Arc::new(PgCustomerStore::connect(&config.store).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; records are lost on shutdown");
            Arc::new(InMemoryCustomerStore::new())
        }
    };
    let store = web::Data::from(store);

    // === 2. Metrics ===
    let metrics = web::Data::new(metrics::Metrics::new()?);
    tracing::info!(
        "📊 Metrics registry created with {} metrics",
        metrics.registry().gather().len()
    );

    // === 3. HTTP server ===
    let (host, port) = config.bind_address();
    tracing::info!("📡 Listening on http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(store.clone())
            .app_data(metrics.clone())
            .configure(api::configure)
            .configure(metrics::configure)
    })
    .bind((host, port))?
    .run()
    .await?;

    tracing::info!("Customer service stopped");

    Ok(())
}

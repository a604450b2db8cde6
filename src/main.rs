use std::sync::Arc;

use ingress_guard::adapters::http::{app_router, AppServices};
use ingress_guard::adapters::{LoggingDispatcher, RedisLeaseStore};
use ingress_guard::config::AppConfig;
use ingress_guard::ports::LeaseStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    ingress_guard::init_tracing(&config.server);
    config.validate()?;

    for provider in config.missing_secrets() {
        tracing::warn!(provider, "Webhook secret not configured, deliveries will be refused");
    }

    let lease_store: Option<Arc<dyn LeaseStore>> = match config.lease_store.connection_url() {
        Some(url) => {
            let store: Arc<dyn LeaseStore> =
                Arc::new(RedisLeaseStore::new(url, config.lease_store.timeout())?);
            Some(store)
        }
        None => {
            tracing::warn!("No lease store configured, idempotency keys will not be enforced");
            None
        }
    };

    let app = app_router(
        &config,
        AppServices {
            lease_store,
            dispatcher: Arc::new(LoggingDispatcher::new()),
        },
    )?;

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Ingress guard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

use energy_api::config::{Config, SourceConfig};
use energy_api::source::{EnergySource, ProfileSource, StoreSource};
use energy_api::{api, db};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Starting energy-api");

    let cfg_path =
        std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/config.example.yaml".into());
    let cfg = Config::load(&cfg_path)?;
    info!("Configuration loaded");

    let source: Arc<dyn EnergySource> = match &cfg.source {
        SourceConfig::Live {
            database,
            lookback_secs,
        } => {
            let pool = db::connect(&database.url)?;
            info!("Store client ready (lookback {}s)", lookback_secs);
            Arc::new(StoreSource::new(pool, *lookback_secs))
        }
        SourceConfig::Demo => {
            info!("Demo mode: serving the static day profile");
            Arc::new(ProfileSource)
        }
    };

    let router = api::create_router(source, cfg.tariff);
    let addr = format!("{}:{}", cfg.api.host, cfg.api.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    info!("API server listening on {}", addr);

    let serve = axum::serve(listener, router);
    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Shutdown signal received");
    };

    if let Err(e) = serve.with_graceful_shutdown(shutdown).await {
        tracing::error!(error = %e, "API server error");
    }

    info!("Application shutdown complete");
    Ok(())
}

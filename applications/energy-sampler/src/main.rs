mod adc;
mod config;
mod db;
mod error;
mod rms;

use adc::Mcp3008;
use config::Config;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let cfg_path =
        std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/config.example.yaml".into());
    let cfg = Config::load(&cfg_path)?;
    info!("loaded config");

    let pool = db::connect(&cfg.database.url).await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    db::ensure_schema(&pool).await?;
    info!("connected to database");

    let mut adc = Mcp3008::open(cfg.sampler.spi_clock_hz)
        .map_err(|e| anyhow::anyhow!("failed to open ADC transport: {}", e))?;
    info!(
        clock_hz = cfg.sampler.spi_clock_hz,
        "ADC transport ready, starting energy monitor logging"
    );

    let interval = Duration::from_secs(cfg.sampler.interval_secs);
    let retry_delay = Duration::from_secs(cfg.sampler.retry_delay_secs);

    let sig = tokio::signal::ctrl_c();
    tokio::pin!(sig);
    loop {
        tokio::select! {
            biased;
            _ = &mut sig => {
                info!("shutdown requested");
                break;
            }
            res = sample_cycle(&mut adc, &cfg, &pool) => {
                match res {
                    Ok(r) => {
                        info!("logged {:.1} V | {:.2} A | {:.1} W", r.voltage, r.current, r.power);
                        tokio::time::sleep(interval).await;
                    }
                    Err(e) => {
                        // The point for this cycle is dropped; there is no
                        // buffering or retry queue.
                        warn!("cycle failed: {e}; retrying after delay");
                        tokio::time::sleep(retry_delay).await;
                    }
                }
            }
        }
    }

    Ok(())
}

async fn sample_cycle(
    adc: &mut Mcp3008,
    cfg: &Config,
    pool: &db::DbPool,
) -> Result<rms::RmsReading, error::AppError> {
    let reading = rms::measure(
        adc,
        &cfg.calibration,
        cfg.sampler.sample_count,
        cfg.sampler.voltage_channel,
        cfg.sampler.current_channel,
    )?;
    db::insert_reading(pool, &reading).await?;
    Ok(reading)
}

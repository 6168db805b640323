use super::{round2, EnergySource, HistorySeries, LiveSnapshot};
use crate::db::DbPool;
use crate::error::AppError;
use crate::period::Period;
use crate::repositories::EnergyRepository;
use async_trait::async_trait;

/// Live-store variant: everything is read back from the `energy_usage`
/// hypertable the sampler writes to.
pub struct StoreSource {
    pool: DbPool,
    lookback_secs: u64,
}

impl StoreSource {
    pub fn new(pool: DbPool, lookback_secs: u64) -> Self {
        Self {
            pool,
            lookback_secs,
        }
    }
}

#[async_trait]
impl EnergySource for StoreSource {
    async fn live(&self) -> Result<LiveSnapshot, AppError> {
        let reading = EnergyRepository::get_latest_within(&self.pool, self.lookback_secs).await?;
        Ok(match reading {
            Some(r) => LiveSnapshot {
                voltage: round2(r.voltage.unwrap_or(0.0)),
                current: round2(r.current.unwrap_or(0.0)),
                power: round2(r.power.unwrap_or(0.0)),
            },
            // Nothing recent enough: the sampler is idle or behind.
            None => LiveSnapshot::default(),
        })
    }

    async fn history(&self, period: Period) -> Result<HistorySeries, AppError> {
        let shape = period.shape();
        let buckets =
            EnergyRepository::get_power_buckets(&self.pool, shape.range, shape.window).await?;

        let mut labels = Vec::with_capacity(buckets.len());
        let mut values = Vec::with_capacity(buckets.len());
        let mut watt_sum = 0.0;
        for b in buckets {
            let power = b.power_w.unwrap_or(0.0);
            labels.push(shape.labels.format(b.bucket));
            values.push(round2(power));
            watt_sum += power;
        }

        // Each value is a mean over one window, so energy is the sum scaled
        // by the window width.
        let total_kwh = watt_sum * shape.window_hours / 1000.0;

        Ok(HistorySeries {
            labels,
            values,
            total_kwh,
        })
    }
}

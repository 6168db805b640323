use crate::error::AppError;
use crate::period::Period;
use async_trait::async_trait;

pub mod profile;
pub mod store;

pub use profile::{ProfileSource, DAILY_PROFILE_W};
pub use store::StoreSource;

/// Snapshot behind `/api/live`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LiveSnapshot {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
}

/// Aggregated series behind `/api/history`. `labels` and `values` are
/// parallel; `total_kwh` is the raw (unrounded) energy total for the period.
#[derive(Debug, Clone, Default)]
pub struct HistorySeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub total_kwh: f64,
}

/// Where dashboard data comes from: the live store, or the built-in demo
/// profile. One implementation is chosen at startup; handlers only see this.
#[async_trait]
pub trait EnergySource: Send + Sync {
    async fn live(&self) -> Result<LiveSnapshot, AppError>;
    async fn history(&self, period: Period) -> Result<HistorySeries, AppError>;
}

/// Round to two decimals, the display precision used across the API.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

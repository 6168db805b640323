use crate::config::Tariff;
use crate::source::{round2, LiveSnapshot};
use serde::Serialize;

pub const STATUS_NORMAL: &str = "Normal";
pub const STATUS_HIGH_LOAD: &str = "High Load";

#[derive(Debug, Serialize)]
pub struct LiveResponse {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    /// Projected cost of holding the current draw for one hour.
    pub cost_hour: f64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LiveResponse {
    pub fn from_snapshot(snap: LiveSnapshot, tariff: &Tariff) -> Self {
        let status = if snap.power > tariff.high_load_threshold_w {
            STATUS_HIGH_LOAD
        } else {
            STATUS_NORMAL
        };
        Self {
            voltage: snap.voltage,
            current: snap.current,
            power: snap.power,
            cost_hour: round2(snap.power / 1000.0 * tariff.rate_per_kwh),
            status,
            error: None,
        }
    }

    /// The endpoint never hard-fails: a broken source yields zeros plus the
    /// error text.
    pub fn unavailable(error: String) -> Self {
        Self {
            voltage: 0.0,
            current: 0.0,
            power: 0.0,
            cost_hour: 0.0,
            status: STATUS_NORMAL,
            error: Some(error),
        }
    }
}

use crate::config::Tariff;
use crate::source::{round2, HistorySeries};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct Summary {
    pub total_kwh: f64,
    pub total_cost: f64,
    pub total_carbon: f64,
}

impl Summary {
    /// Cost and carbon derive from the raw kWh figure, then everything is
    /// rounded to display precision.
    pub fn from_kwh(total_kwh: f64, tariff: &Tariff) -> Self {
        Self {
            total_kwh: round2(total_kwh),
            total_cost: round2(total_kwh * tariff.rate_per_kwh),
            total_carbon: round2(total_kwh * tariff.carbon_kg_per_kwh),
        }
    }
}

impl HistoryResponse {
    pub fn from_series(series: HistorySeries, tariff: &Tariff) -> Self {
        Self {
            summary: Summary::from_kwh(series.total_kwh, tariff),
            labels: series.labels,
            data: series.values,
            error: None,
        }
    }

    /// The endpoint never hard-fails: a broken source yields empty series and
    /// a zeroed summary plus the error text.
    pub fn unavailable(error: String) -> Self {
        Self {
            labels: Vec::new(),
            data: Vec::new(),
            summary: Summary::default(),
            error: Some(error),
        }
    }
}

use super::{round2, EnergySource, HistorySeries, LiveSnapshot};
use crate::error::AppError;
use crate::period::Period;
use async_trait::async_trait;
use chrono::{Local, Timelike};
use rand::Rng;

/// Reference one-day load curve, watts per hour slot: quiet overnight, a
/// breakfast spike, a flat afternoon, and the evening peak.
pub const DAILY_PROFILE_W: [f64; 24] = [
    120.0, 115.0, 110.0, 110.0, 120.0, 150.0, // night
    450.0, 850.0, 1100.0, 900.0, 400.0, 350.0, // morning
    300.0, 300.0, 320.0, 350.0, 400.0, 600.0, // afternoon
    1200.0, 1450.0, 1500.0, 1300.0, 900.0, 400.0, // evening
];

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Demo variant: plausible but non-authoritative series derived from the
/// fixed profile. Nothing here touches a store.
pub struct ProfileSource;

impl ProfileSource {
    pub fn daily_total_w() -> f64 {
        DAILY_PROFILE_W.iter().sum()
    }

    fn hourly_avg_w() -> f64 {
        Self::daily_total_w() / 24.0
    }
}

/// Relative noise applied to the hourly average for each synthesized bucket.
/// Coarser periods get wider bounds so the chart doesn't look machine-made.
pub fn noise_bound(period: Period) -> f64 {
    match period {
        Period::Today => 0.0,
        Period::Weekly => 0.10,
        Period::Monthly => 0.15,
        Period::Yearly => 0.20,
    }
}

#[async_trait]
impl EnergySource for ProfileSource {
    async fn live(&self) -> Result<LiveSnapshot, AppError> {
        let mut rng = rand::thread_rng();
        let hour = Local::now().hour() as usize;
        let power = DAILY_PROFILE_W[hour] + rng.gen_range(-15.0..=15.0);
        let voltage: f64 = 220.0 + rng.gen_range(-1.0..=1.0);
        Ok(LiveSnapshot {
            voltage: (voltage * 10.0).round() / 10.0,
            current: round2(power / voltage),
            power: (power * 10.0).round() / 10.0,
        })
    }

    async fn history(&self, period: Period) -> Result<HistorySeries, AppError> {
        let daily_kwh = Self::daily_total_w() / 1000.0;
        let avg = Self::hourly_avg_w();
        let bound = noise_bound(period);
        let mut rng = rand::thread_rng();
        let mut jitter = |count: usize| -> Vec<f64> {
            (0..count)
                .map(|_| (avg * rng.gen_range(1.0 - bound..=1.0 + bound)).round())
                .collect()
        };

        let (labels, values): (Vec<String>, Vec<f64>) = match period {
            Period::Today => (
                (0..24).map(|h| format!("{h:02}:00")).collect(),
                DAILY_PROFILE_W.to_vec(),
            ),
            Period::Weekly => (
                WEEKDAY_LABELS.iter().map(|s| s.to_string()).collect(),
                jitter(7),
            ),
            Period::Monthly => ((1..=30).map(|d| format!("Day {d}")).collect(), jitter(30)),
            Period::Yearly => (
                MONTH_LABELS.iter().map(|s| s.to_string()).collect(),
                jitter(12),
            ),
        };

        Ok(HistorySeries {
            labels,
            values,
            total_kwh: daily_kwh * period.shape().days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn labels_and_values_stay_parallel() {
        for period in Period::ALL {
            let series = ProfileSource.history(period).await.unwrap();
            assert_eq!(
                series.labels.len(),
                series.values.len(),
                "{}",
                period.as_str()
            );
            assert!(!series.labels.is_empty(), "{}", period.as_str());
        }
    }

    #[tokio::test]
    async fn bucket_counts_match_periods() {
        assert_eq!(ProfileSource.history(Period::Today).await.unwrap().labels.len(), 24);
        assert_eq!(ProfileSource.history(Period::Weekly).await.unwrap().labels.len(), 7);
        assert_eq!(ProfileSource.history(Period::Monthly).await.unwrap().labels.len(), 30);
        assert_eq!(ProfileSource.history(Period::Yearly).await.unwrap().labels.len(), 12);
    }

    #[tokio::test]
    async fn today_is_the_profile_verbatim() {
        let series = ProfileSource.history(Period::Today).await.unwrap();
        assert_eq!(series.values, DAILY_PROFILE_W.to_vec());
        assert_eq!(series.labels[0], "00:00");
        assert_eq!(series.labels[23], "23:00");
        assert_eq!(series.total_kwh, ProfileSource::daily_total_w() / 1000.0);
    }

    #[tokio::test]
    async fn synthesized_values_stay_inside_the_noise_bound() {
        let avg = ProfileSource::hourly_avg_w();
        for period in [Period::Weekly, Period::Monthly, Period::Yearly] {
            let bound = noise_bound(period);
            let series = ProfileSource.history(period).await.unwrap();
            for v in &series.values {
                // Half a watt of slack for the per-bucket rounding.
                assert!(
                    *v >= avg * (1.0 - bound) - 0.5 && *v <= avg * (1.0 + bound) + 0.5,
                    "{} outside {}% of {} for {}",
                    v,
                    bound * 100.0,
                    avg,
                    period.as_str()
                );
            }
        }
    }

    #[tokio::test]
    async fn totals_scale_with_period_days() {
        let daily = ProfileSource::daily_total_w() / 1000.0;
        for period in Period::ALL {
            let series = ProfileSource.history(period).await.unwrap();
            assert_eq!(series.total_kwh, daily * period.shape().days);
        }
    }

    #[tokio::test]
    async fn live_stays_near_the_profile_slot() {
        let snap = ProfileSource.live().await.unwrap();
        assert!((219.0..=221.0).contains(&snap.voltage));
        assert!(snap.power > 0.0);
        // current is derived, so V * I must land back on the power reading.
        assert!((snap.current * snap.voltage - snap.power).abs() < 5.0);
    }
}

use chrono::{DateTime, Utc};

/// History window selector from the dashboard period toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Today,
    Weekly,
    Monthly,
    Yearly,
}

/// How one period shapes a history query and its display labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryShape {
    /// Trailing range, as a Postgres interval literal.
    pub range: &'static str,
    /// Aggregation window, as a Postgres interval literal.
    pub window: &'static str,
    /// Window width in hours, for turning mean-power buckets into energy.
    pub window_hours: f64,
    /// Days covered, for scaling the demo profile's daily total.
    pub days: f64,
    pub labels: LabelGranularity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelGranularity {
    /// 14:00
    HourMinute,
    /// Feb 03
    MonthDay,
    /// February
    MonthName,
}

impl LabelGranularity {
    pub fn format(self, ts: DateTime<Utc>) -> String {
        match self {
            Self::HourMinute => ts.format("%H:%M").to_string(),
            Self::MonthDay => ts.format("%b %d").to_string(),
            Self::MonthName => ts.format("%B").to_string(),
        }
    }
}

const TODAY: QueryShape = QueryShape {
    range: "24 hours",
    window: "1 hour",
    window_hours: 1.0,
    days: 1.0,
    labels: LabelGranularity::HourMinute,
};

const WEEKLY: QueryShape = QueryShape {
    range: "7 days",
    window: "1 day",
    window_hours: 24.0,
    days: 7.0,
    labels: LabelGranularity::MonthDay,
};

const MONTHLY: QueryShape = QueryShape {
    range: "30 days",
    window: "1 day",
    window_hours: 24.0,
    days: 30.0,
    labels: LabelGranularity::MonthDay,
};

const YEARLY: QueryShape = QueryShape {
    range: "1 year",
    window: "1 month",
    window_hours: 730.0,
    days: 365.0,
    labels: LabelGranularity::MonthName,
};

impl Period {
    pub const ALL: [Period; 4] = [Period::Today, Period::Weekly, Period::Monthly, Period::Yearly];

    /// Total over arbitrary input: anything unrecognized reads as `Today`.
    pub fn parse(s: &str) -> Self {
        match s {
            "weekly" => Period::Weekly,
            "monthly" => Period::Monthly,
            "yearly" => Period::Yearly,
            _ => Period::Today,
        }
    }

    pub fn shape(self) -> &'static QueryShape {
        match self {
            Period::Today => &TODAY,
            Period::Weekly => &WEEKLY,
            Period::Monthly => &MONTHLY,
            Period::Yearly => &YEARLY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_is_total_with_today_fallback() {
        assert_eq!(Period::parse("today"), Period::Today);
        assert_eq!(Period::parse("weekly"), Period::Weekly);
        assert_eq!(Period::parse("monthly"), Period::Monthly);
        assert_eq!(Period::parse("yearly"), Period::Yearly);
        assert_eq!(Period::parse("fortnightly"), Period::Today);
        assert_eq!(Period::parse(""), Period::Today);
        assert_eq!(Period::parse("YEARLY"), Period::Today);
    }

    #[test]
    fn every_period_has_a_complete_shape() {
        for period in Period::ALL {
            let shape = period.shape();
            assert!(!shape.range.is_empty());
            assert!(!shape.window.is_empty());
            assert!(shape.window_hours > 0.0);
            assert!(shape.days > 0.0);
        }
    }

    #[test]
    fn fallback_shape_matches_today() {
        assert_eq!(Period::parse("garbage").shape(), Period::Today.shape());
    }

    #[test]
    fn labels_match_period_granularity() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 3, 14, 0, 0).unwrap();
        assert_eq!(Period::Today.shape().labels.format(ts), "14:00");
        assert_eq!(Period::Weekly.shape().labels.format(ts), "Feb 03");
        assert_eq!(Period::Monthly.shape().labels.format(ts), "Feb 03");
        assert_eq!(Period::Yearly.shape().labels.format(ts), "February");
    }
}

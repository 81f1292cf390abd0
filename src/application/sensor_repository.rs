// Repository trait for sensor data access
use crate::domain::series::TimeSeries;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

/// Historical window to fetch, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// `None` when the start falls outside the representable date range.
    pub fn ending_at(end: DateTime<Utc>, days: u32) -> Option<Self> {
        let start = end.checked_sub_signed(TimeDelta::try_days(days.into())?)?;
        Some(Self { start, end })
    }

    pub fn last_days(days: u32) -> Option<Self> {
        Self::ending_at(Utc::now(), days)
    }
}

#[async_trait]
pub trait SensorRepository: Send + Sync {
    /// Fetch the raw readings recorded by one data source within `window`.
    async fn fetch_readings(&self, source_id: &str, window: TimeWindow) -> anyhow::Result<TimeSeries>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_spans_whole_days() {
        let end = Utc.with_ymd_and_hms(2024, 5, 31, 12, 0, 0).unwrap();
        let window = TimeWindow::ending_at(end, 30).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        assert_eq!(window.end, end);
    }

    #[test]
    fn test_window_past_date_range_is_rejected() {
        assert!(TimeWindow::last_days(100_000_000).is_none());
        assert!(TimeWindow::last_days(u32::MAX).is_none());
        assert!(TimeWindow::last_days(365).is_some());
    }
}

// Sensor time series domain model
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sensor readings keyed by parameter name, in the order the profile maps them.
pub type SensorData = IndexMap<String, TimeSeries>;

/// A single timestamped reading. `value` is `None` when the source reported
/// the sample but no usable number for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<FixedOffset>,
    pub value: Option<f64>,
}

impl Reading {
    pub fn new(timestamp: DateTime<FixedOffset>, value: f64) -> Self {
        Self {
            timestamp,
            value: value.is_finite().then_some(value),
        }
    }

    pub fn missing(timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            timestamp,
            value: None,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries {
    readings: Vec<Reading>,
}

impl TimeSeries {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn into_readings(self) -> Vec<Reading> {
        self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Values of every reading that carries one, in series order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().filter_map(|r| r.value)
    }

    /// `(timestamp, value)` pairs of every reading that carries a value.
    pub fn points(&self) -> impl Iterator<Item = (DateTime<FixedOffset>, f64)> + '_ {
        self.readings
            .iter()
            .filter_map(|r| r.value.map(|v| (r.timestamp, v)))
    }

    pub fn missing_count(&self) -> usize {
        self.readings.iter().filter(|r| r.is_missing()).count()
    }
}

impl FromIterator<Reading> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    pub fn at_hour(hour: i64) -> DateTime<FixedOffset> {
        let utc = FixedOffset::east_opt(0).unwrap();
        utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + TimeDelta::hours(hour)
    }

    /// Hourly series starting 2024-05-01T00:00Z.
    pub fn hourly(values: &[f64]) -> TimeSeries {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Reading::new(at_hour(i as i64), v))
            .collect()
    }

    /// One reading per day at noon, starting 2024-05-01.
    pub fn daily(values: &[f64]) -> TimeSeries {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Reading::new(at_hour(12 + 24 * i as i64), v))
            .collect()
    }
}

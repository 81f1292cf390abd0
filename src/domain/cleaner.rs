// Time series cleaning: dedup, gap interpolation, outlier rejection
use std::collections::HashSet;

use super::series::{Reading, TimeSeries};
use super::statistics::quartiles;

/// Gaps are interpolated only while less than this share of readings is missing.
pub const MAX_INTERPOLATED_MISSING_PCT: f64 = 20.0;
/// Outlier rejection needs more than this many readings.
pub const OUTLIER_MIN_READINGS: usize = 10;
/// Wider than the usual 1.5 so diurnal swings survive.
pub const OUTLIER_IQR_FACTOR: f64 = 3.0;

/// Return a cleaned copy of `series`: sorted by timestamp, exact duplicates
/// removed, small gaps interpolated, remaining missing readings dropped and
/// extreme outliers rejected.
pub fn clean(series: &TimeSeries) -> TimeSeries {
    if series.is_empty() {
        return series.clone();
    }

    let mut readings = series.readings().to_vec();
    readings.sort_by_key(|r| r.timestamp);
    dedup(&mut readings);

    let missing = readings.iter().filter(|r| r.is_missing()).count();
    let missing_pct = missing as f64 / readings.len() as f64 * 100.0;
    if missing > 0 && missing_pct < MAX_INTERPOLATED_MISSING_PCT {
        interpolate_gaps(&mut readings);
    }
    readings.retain(|r| !r.is_missing());
    // An interpolated value can land on an existing reading.
    dedup(&mut readings);

    reject_outliers(&mut readings);

    TimeSeries::new(readings)
}

/// Acceptance band `[Q1 - 3*IQR, Q3 + 3*IQR]` for a set of values.
pub fn outlier_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let (q1, q3) = quartiles(values)?;
    let iqr = q3 - q1;
    Some((q1 - OUTLIER_IQR_FACTOR * iqr, q3 + OUTLIER_IQR_FACTOR * iqr))
}

fn dedup(readings: &mut Vec<Reading>) {
    let mut seen = HashSet::with_capacity(readings.len());
    readings.retain(|r| seen.insert((r.timestamp, r.value.map(f64::to_bits))));
}

/// Fill missing readings by linear interpolation between the nearest valid
/// neighbours, by position. Readings after the last valid value carry it
/// forward; readings before the first valid value stay missing.
fn interpolate_gaps(readings: &mut [Reading]) {
    let mut previous: Option<(usize, f64)> = None;
    let mut index = 0;

    while index < readings.len() {
        let Some(value) = readings[index].value else {
            index += 1;
            continue;
        };

        if let Some((start, start_value)) = previous {
            let span = (index - start) as f64;
            for gap in start + 1..index {
                let fraction = (gap - start) as f64 / span;
                readings[gap].value = Some(start_value + (value - start_value) * fraction);
            }
        }

        previous = Some((index, value));
        index += 1;
    }

    if let Some((last, value)) = previous {
        for reading in &mut readings[last + 1..] {
            reading.value = Some(value);
        }
    }
}

/// Drop readings outside the IQR band until the band stops moving, so that
/// cleaning an already-clean series changes nothing.
fn reject_outliers(readings: &mut Vec<Reading>) {
    while readings.len() > OUTLIER_MIN_READINGS {
        let values: Vec<f64> = readings.iter().filter_map(|r| r.value).collect();
        let Some((lower, upper)) = outlier_bounds(&values) else {
            return;
        };

        let before = readings.len();
        readings.retain(|r| r.value.is_some_and(|v| v >= lower && v <= upper));

        let rejected = before - readings.len();
        if rejected == 0 {
            return;
        }
        tracing::debug!(rejected, lower, upper, "rejected outlier readings");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::test_support::{at_hour, hourly};
    use proptest::prelude::*;

    #[test]
    fn test_empty_series_is_returned_unchanged() {
        assert!(clean(&TimeSeries::default()).is_empty());
    }

    #[test]
    fn test_sorts_and_removes_exact_duplicates() {
        let series = TimeSeries::new(vec![
            Reading::new(at_hour(2), 3.0),
            Reading::new(at_hour(0), 1.0),
            Reading::new(at_hour(2), 3.0),
            Reading::new(at_hour(1), 2.0),
            Reading::new(at_hour(1), 2.5),
        ]);

        let cleaned = clean(&series);
        let timestamps: Vec<_> = cleaned.readings().iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![at_hour(0), at_hour(1), at_hour(1), at_hour(2)]);
        assert_eq!(cleaned.values().collect::<Vec<_>>(), vec![1.0, 2.0, 2.5, 3.0]);
        assert_eq!(series.len(), 5, "input must not be mutated");
    }

    #[test]
    fn test_interpolates_interior_gaps_when_few_are_missing() {
        let mut readings: Vec<Reading> = (0..10).map(|h| Reading::new(at_hour(h), h as f64)).collect();
        readings[4] = Reading::missing(at_hour(4));

        let cleaned = clean(&TimeSeries::new(readings));
        assert_eq!(cleaned.len(), 10);
        assert_eq!(cleaned.readings()[4].value, Some(4.0));
    }

    #[test]
    fn test_interpolates_multi_reading_gap_linearly() {
        let ramp = |count: i64| -> Vec<Reading> {
            let mut readings: Vec<Reading> =
                (0..count).map(|h| Reading::new(at_hour(h), h as f64 * 1.5)).collect();
            for h in 3..6 {
                readings[h] = Reading::missing(at_hour(h as i64));
            }
            readings
        };

        // 30% missing: gaps are dropped, not filled
        let cleaned = clean(&TimeSeries::new(ramp(10)));
        assert_eq!(cleaned.len(), 7);

        // 15% missing: filled along the line between 3.0 and 9.0
        let cleaned = clean(&TimeSeries::new(ramp(20)));
        assert_eq!(cleaned.len(), 20);
        let values: Vec<f64> = cleaned.values().take(7).collect();
        assert_eq!(values, vec![0.0, 1.5, 3.0, 4.5, 6.0, 7.5, 9.0]);
    }

    #[test]
    fn test_leading_gap_is_dropped_and_trailing_gap_carried_forward() {
        let mut readings: Vec<Reading> = (0..12).map(|h| Reading::new(at_hour(h), 20.0)).collect();
        readings[0] = Reading::missing(at_hour(0));
        readings[11] = Reading::missing(at_hour(11));

        let cleaned = clean(&TimeSeries::new(readings));
        assert_eq!(cleaned.len(), 11);
        assert_eq!(cleaned.missing_count(), 0);
        assert_eq!(cleaned.readings()[0].timestamp, at_hour(1));
        assert_eq!(cleaned.readings()[10].timestamp, at_hour(11));
        assert_eq!(cleaned.readings()[10].value, Some(20.0));
    }

    #[test]
    fn test_trailing_gap_takes_last_valid_value() {
        let mut readings: Vec<Reading> = (0..10).map(|h| Reading::new(at_hour(h), h as f64)).collect();
        readings[9] = Reading::missing(at_hour(9));

        let cleaned = clean(&TimeSeries::new(readings));
        assert_eq!(cleaned.len(), 10);
        assert_eq!(cleaned.readings()[9].timestamp, at_hour(9));
        assert_eq!(cleaned.readings()[9].value, Some(8.0));
    }

    #[test]
    fn test_rejects_extreme_outliers() {
        let mut values = vec![20.0, 21.0, 22.0, 21.5, 20.5, 22.5, 21.0, 20.0, 22.0, 21.0, 20.5];
        values.push(95.0);
        let cleaned = clean(&hourly(&values));
        assert_eq!(cleaned.len(), values.len() - 1);
        assert!(cleaned.values().all(|v| v < 30.0));
    }

    #[test]
    fn test_outlier_rejection_needs_more_than_ten_readings() {
        let baseline = [20.0, 21.0, 22.0, 21.5, 20.5, 22.5, 21.0, 20.0, 22.0];

        let mut ten = baseline.to_vec();
        ten.push(95.0);
        let cleaned = clean(&hourly(&ten));
        assert_eq!(cleaned.len(), 10);
        assert!(cleaned.values().any(|v| v == 95.0));

        let mut eleven = baseline.to_vec();
        eleven.extend([21.0, 95.0]);
        let cleaned = clean(&hourly(&eleven));
        assert_eq!(cleaned.len(), 10);
        assert!(cleaned.values().all(|v| v < 30.0));
    }

    #[test]
    fn test_keeps_outliers_in_small_series() {
        let values = [20.0, 21.0, 22.0, 21.0, 95.0];
        let cleaned = clean(&hourly(&values));
        assert_eq!(cleaned.len(), 5);
    }

    #[test]
    fn test_keeps_wide_diurnal_swing() {
        let values: Vec<f64> = (0..48)
            .map(|h| 20.0 + 8.0 * (h as f64 * std::f64::consts::PI / 12.0).sin())
            .collect();
        let cleaned = clean(&hourly(&values));
        assert_eq!(cleaned.len(), 48);
    }

    proptest! {
        #[test]
        fn prop_output_within_input_iqr_band(values in prop::collection::vec(-1000.0f64..1000.0, 11..80)) {
            let series = hourly(&values);
            let (lower, upper) = outlier_bounds(&values).unwrap();
            let cleaned = clean(&series);
            prop_assert!(cleaned.values().all(|v| v >= lower && v <= upper));
        }

        #[test]
        fn prop_clean_is_idempotent(
            values in prop::collection::vec(prop_oneof![-50.0f64..50.0, Just(f64::NAN), 500.0f64..1000.0], 0..60),
        ) {
            let once = clean(&hourly(&values));
            let twice = clean(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_output_is_sorted_and_complete(values in prop::collection::vec(-50.0f64..50.0, 0..40), shift in 0usize..40) {
            let mut readings = hourly(&values).into_readings();
            let len = readings.len();
            if len > 0 {
                readings.rotate_left(shift % len);
            }
            let cleaned = clean(&TimeSeries::new(readings));
            prop_assert_eq!(cleaned.missing_count(), 0);
            prop_assert!(cleaned.readings().windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        }
    }
}

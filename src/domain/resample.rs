// Fixed-interval resampling
use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, TimeDelta};

use super::series::{Reading, TimeSeries};

/// Average readings into `bucket`-wide windows aligned to the Unix epoch.
///
/// Each output reading is stamped with its bucket start, expressed in the
/// offset of the first reading that fell into the bucket. Empty buckets are
/// omitted and missing readings are ignored.
pub fn resample(series: &TimeSeries, bucket: TimeDelta) -> TimeSeries {
    let bucket_secs = bucket.num_seconds();
    if bucket_secs <= 0 {
        return series.clone();
    }

    let mut buckets: BTreeMap<i64, (FixedOffset, f64, usize)> = BTreeMap::new();
    for (timestamp, value) in series.points() {
        let key = timestamp.timestamp().div_euclid(bucket_secs);
        let entry = buckets.entry(key).or_insert((*timestamp.offset(), 0.0, 0));
        entry.1 += value;
        entry.2 += 1;
    }

    buckets
        .into_iter()
        .filter_map(|(key, (offset, sum, count))| {
            let start = DateTime::from_timestamp(key * bucket_secs, 0)?;
            Some(Reading::new(start.with_timezone(&offset), sum / count as f64))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::test_support::at_hour;
    use approx::assert_relative_eq;

    #[test]
    fn test_averages_readings_per_bucket() {
        let series = TimeSeries::new(vec![
            Reading::new(at_hour(0), 10.0),
            Reading::new(at_hour(0) + TimeDelta::minutes(20), 14.0),
            Reading::missing(at_hour(0) + TimeDelta::minutes(40)),
            Reading::new(at_hour(2) + TimeDelta::minutes(5), 30.0),
        ]);

        let resampled = resample(&series, TimeDelta::hours(1));
        assert_eq!(resampled.len(), 2);
        assert_eq!(resampled.readings()[0].timestamp, at_hour(0));
        assert_relative_eq!(resampled.readings()[0].value.unwrap(), 12.0);
        assert_eq!(resampled.readings()[1].timestamp, at_hour(2));
        assert_relative_eq!(resampled.readings()[1].value.unwrap(), 30.0);
    }

    #[test]
    fn test_keeps_reading_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = at_hour(5).with_timezone(&plus_two) + TimeDelta::minutes(45);
        let resampled = resample(&TimeSeries::new(vec![Reading::new(local, 1.0)]), TimeDelta::hours(1));
        let stamped = resampled.readings()[0].timestamp;
        assert_eq!(stamped.offset(), &plus_two);
        assert_eq!(stamped, at_hour(5));
    }

    #[test]
    fn test_non_positive_bucket_is_a_no_op() {
        let series = TimeSeries::new(vec![Reading::new(at_hour(0), 1.0)]);
        assert_eq!(resample(&series, TimeDelta::zero()), series);
    }
}

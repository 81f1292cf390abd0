use chrono::{DateTime, FixedOffset, NaiveDateTime};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a source timestamp. RFC 3339 keeps its offset; naive timestamps are
/// taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_rfc3339_keeps_offset() {
        let parsed = parse_timestamp("2024-05-01T08:15:00+02:00").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 7200);
        assert_eq!(parsed.hour(), 8);
    }

    #[test]
    fn test_naive_timestamps_are_utc() {
        let expected = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 8, 15, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-05-01 08:15:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-05-01T08:15:00.000").unwrap(), expected);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}

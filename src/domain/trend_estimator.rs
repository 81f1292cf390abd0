// Daily trend estimation by linear regression
use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::analysis::{Trend, TrendAnalysis, TrendFit};
use super::series::TimeSeries;
use super::statistics::linear_regression;

pub const MIN_TREND_READINGS: usize = 5;
pub const MIN_TREND_DAYS: usize = 3;
/// Absolute slope (parameter units per day) below which a trend is stable.
/// Not normalised by scale: lux and °C get very different sensitivity.
pub const STABLE_SLOPE_THRESHOLD: f64 = 0.01;

pub const INSUFFICIENT_READINGS_MESSAGE: &str = "Insufficient data for trend analysis";
pub const INSUFFICIENT_DAYS_MESSAGE: &str =
    "Insufficient data for trend analysis (need at least 3 days)";

impl Trend {
    pub fn from_slope(slope: f64) -> Self {
        if slope.abs() < STABLE_SLOPE_THRESHOLD {
            Self::Stable
        } else if slope > 0.0 {
            Self::Increasing
        } else {
            Self::Decreasing
        }
    }

    fn describe(self, slope: f64) -> String {
        match self {
            Self::Stable => "Stable over time".to_string(),
            Self::Increasing => format!("Increasing trend ({slope:.3} per day)"),
            Self::Decreasing => format!("Decreasing trend ({slope:.3} per day)"),
            Self::Unknown => INSUFFICIENT_READINGS_MESSAGE.to_string(),
        }
    }
}

/// Mean value per calendar date, in the offset each reading was recorded with.
pub fn daily_means(series: &TimeSeries) -> Vec<(NaiveDate, f64)> {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for (timestamp, value) in series.points() {
        let entry = days.entry(timestamp.date_naive()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    days.into_iter()
        .map(|(date, (sum, count))| (date, sum / count as f64))
        .collect()
}

/// Fit a linear trend to the daily means of `series` and classify its direction.
pub fn estimate(series: &TimeSeries) -> TrendAnalysis {
    if series.values().count() < MIN_TREND_READINGS {
        return TrendAnalysis::unknown(INSUFFICIENT_READINGS_MESSAGE);
    }

    let daily = daily_means(series);
    if daily.len() < MIN_TREND_DAYS {
        return TrendAnalysis::unknown(INSUFFICIENT_DAYS_MESSAGE);
    }

    let day_index: Vec<f64> = (0..daily.len()).map(|i| i as f64).collect();
    let means: Vec<f64> = daily.iter().map(|(_, mean)| *mean).collect();
    let Some(regression) = linear_regression(&day_index, &means) else {
        return TrendAnalysis::unknown(INSUFFICIENT_DAYS_MESSAGE);
    };

    let (first_date, first_mean) = daily[0];
    let (last_date, last_mean) = daily[daily.len() - 1];
    let span_days = (last_date - first_date).num_days();
    let change_rate = if span_days > 0 {
        (last_mean - first_mean) / span_days as f64
    } else {
        0.0
    };

    let trend = Trend::from_slope(regression.slope);
    TrendAnalysis {
        trend,
        message: trend.describe(regression.slope),
        fit: Some(TrendFit {
            slope: regression.slope,
            intercept: regression.intercept,
            r_value: regression.r_value,
            p_value: regression.p_value,
            std_err: regression.std_err,
            change_rate,
        }),
    }
}

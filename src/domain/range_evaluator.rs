// Optimal range compliance of a cleaned series
use super::analysis::{RangeAnalysis, RangeStatus};
use super::profile::OptimalRange;
use super::series::TimeSeries;

pub const OPTIMAL_MIN_PCT_IN_RANGE: f64 = 80.0;
pub const ACCEPTABLE_MIN_PCT_IN_RANGE: f64 = 60.0;

impl RangeStatus {
    pub fn from_pct_in_range(pct_in_range: f64) -> Self {
        if pct_in_range >= OPTIMAL_MIN_PCT_IN_RANGE {
            Self::Optimal
        } else if pct_in_range >= ACCEPTABLE_MIN_PCT_IN_RANGE {
            Self::Acceptable
        } else {
            Self::Suboptimal
        }
    }
}

/// Share of readings inside, below and above `optimal_range`.
///
/// Returns `None` when no range is configured for the parameter.
pub fn evaluate(series: &TimeSeries, optimal_range: Option<&OptimalRange>) -> Option<RangeAnalysis> {
    let range = optimal_range?;

    let (mut in_range, mut below, mut above, mut total) = (0usize, 0usize, 0usize, 0usize);
    for value in series.values() {
        total += 1;
        if range.contains(value) {
            in_range += 1;
        } else if value < range.min {
            below += 1;
        } else {
            above += 1;
        }
    }

    let pct = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    };
    let pct_in_range = pct(in_range);

    Some(RangeAnalysis {
        optimal_min: range.min,
        optimal_max: range.max,
        pct_in_range,
        pct_below_range: pct(below),
        pct_above_range: pct(above),
        status: RangeStatus::from_pct_in_range(pct_in_range),
    })
}

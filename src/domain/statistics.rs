// Descriptive statistics and least-squares regression
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::analysis::Statistics;

// Keeps the t statistic finite when |r| == 1.
const TINY: f64 = 1.0e-20;

impl Statistics {
    /// Summarise a set of values. Spread uses the sample (n - 1) denominator.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = (sorted.len() > 1)
            .then(|| sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0));

        Some(Self {
            mean,
            median: quantile_sorted(&sorted, 0.5),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            stddev: variance.map(f64::sqrt),
            variance,
        })
    }
}

/// Quantile of ascending-sorted values with linear interpolation between
/// closest ranks. `sorted` must be non-empty.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// First and third quartile of unsorted values.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some((quantile_sorted(&sorted, 0.25), quantile_sorted(&sorted, 0.75)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    /// Two-sided p-value for the null hypothesis of zero slope.
    pub p_value: f64,
    pub std_err: f64,
}

/// Ordinary least squares fit of `y` against `x`.
///
/// Needs at least three points and some spread in `x`.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Option<LinearRegression> {
    if x.len() != y.len() || x.len() < 3 {
        return None;
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut ss_x = 0.0;
    let mut ss_y = 0.0;
    let mut ss_xy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ss_x += dx * dx;
        ss_y += dy * dy;
        ss_xy += dx * dy;
    }
    ss_x /= n;
    ss_y /= n;
    ss_xy /= n;

    if ss_x == 0.0 {
        return None;
    }

    let r_value = if ss_y == 0.0 {
        0.0
    } else {
        (ss_xy / (ss_x * ss_y).sqrt()).clamp(-1.0, 1.0)
    };

    let slope = ss_xy / ss_x;
    let intercept = y_mean - slope * x_mean;

    let df = n - 2.0;
    let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
    let distribution = StudentsT::new(0.0, 1.0, df).ok()?;
    let p_value = 2.0 * distribution.sf(t.abs());
    let std_err = ((1.0 - r_value * r_value) * ss_y / ss_x / df).sqrt();

    Some(LinearRegression {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
    })
}

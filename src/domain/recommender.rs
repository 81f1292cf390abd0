// Growing-condition recommendations
use indexmap::IndexMap;

use super::analysis::{ParameterAnalysis, RangeAnalysis, RangeStatus};

/// Share of time outside the range that triggers a recommendation.
pub const RECOMMENDATION_THRESHOLD_PCT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    Increase,
    Decrease,
}

impl Adjustment {
    fn verb(self) -> &'static str {
        match self {
            Self::Increase => "Increase",
            Self::Decrease => "Reduce",
        }
    }

    fn side(self) -> &'static str {
        match self {
            Self::Increase => "below",
            Self::Decrease => "above",
        }
    }
}

/// Guidance for every parameter that is not optimal, in the parameters'
/// iteration order. No sorting or deduplication is applied.
pub fn recommend(analyses: &IndexMap<String, ParameterAnalysis>) -> Vec<String> {
    let mut recommendations = Vec::new();

    for (parameter, analysis) in analyses {
        let Some(range) = &analysis.range_analysis else {
            continue;
        };
        if range.status == RangeStatus::Optimal {
            continue;
        }

        if range.pct_below_range > RECOMMENDATION_THRESHOLD_PCT {
            recommendations.push(phrase(parameter, Adjustment::Increase, range));
        }
        if range.pct_above_range > RECOMMENDATION_THRESHOLD_PCT {
            recommendations.push(phrase(parameter, Adjustment::Decrease, range));
        }
    }

    recommendations
}

fn phrase(parameter: &str, adjustment: Adjustment, range: &RangeAnalysis) -> String {
    let (limit, pct) = match adjustment {
        Adjustment::Increase => (range.optimal_min, range.pct_below_range),
        Adjustment::Decrease => (range.optimal_max, range.pct_above_range),
    };
    let verb = adjustment.verb();
    let side = adjustment.side();

    match parameter {
        "temperature" => format!(
            "{verb} the temperature. It is currently {side} the optimal range ({limit}°C) {pct:.1}% of the time."
        ),
        "humidity" => format!(
            "{verb} the humidity. It is currently {side} the optimal range ({limit}%) {pct:.1}% of the time."
        ),
        "light" => format!(
            "{verb} light exposure. It is currently {side} the optimal range ({limit} lux) {pct:.1}% of the time."
        ),
        "soil_moisture" => format!(
            "{verb} irrigation. Soil moisture is currently {side} the optimal range ({limit}%) {pct:.1}% of the time."
        ),
        other => format!(
            "{verb} {other}. It is currently {side} the optimal range ({limit}) {pct:.1}% of the time."
        ),
    }
}

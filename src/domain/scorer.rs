// Overall growth score
use indexmap::IndexMap;

use super::analysis::{Category, OverallAnalysis, ParameterAnalysis};
use super::recommender::recommend;

/// Mean status weight of every parameter that has a range status, scaled to
/// 0..=100. Parameters count equally regardless of species.
pub fn overall_score<'a>(analyses: impl IntoIterator<Item = &'a ParameterAnalysis>) -> f64 {
    let weights: Vec<f64> = analyses
        .into_iter()
        .filter_map(|a| a.range_status())
        .map(|status| status.weight())
        .collect();

    if weights.is_empty() {
        return 0.0;
    }
    weights.iter().sum::<f64>() / weights.len() as f64 * 100.0
}

pub fn score(analyses: &IndexMap<String, ParameterAnalysis>) -> OverallAnalysis {
    let overall_score = overall_score(analyses.values());
    let category = Category::from_score(overall_score);

    OverallAnalysis {
        overall_score,
        category,
        message: category.message().to_string(),
        recommendations: recommend(analyses),
    }
}

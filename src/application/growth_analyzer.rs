// Growth analyzer - Use case for analysing a profile's sensor data
use crate::domain::analysis::{AnalysisReport, AnalysisResult, ParameterAnalysis, Statistics};
use crate::domain::profile::{PlantProfile, ProfileCatalog};
use crate::domain::series::{SensorData, TimeSeries};
use crate::domain::{cleaner, range_evaluator, scorer, trend_estimator};
use chrono::Utc;
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("plant profile '{0}' not found")]
    UnknownProfile(String),
    #[error("no sensor data available")]
    NoSensorData,
    #[error("a window of {0} days is out of range")]
    InvalidWindow(u32),
}

impl From<AnalysisError> for AnalysisResult {
    fn from(error: AnalysisError) -> Self {
        AnalysisResult::Error {
            message: error.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct GrowthAnalyzer {
    profiles: Arc<ProfileCatalog>,
}

impl GrowthAnalyzer {
    pub fn new(profiles: Arc<ProfileCatalog>) -> Self {
        Self { profiles }
    }

    /// Analyse `sensor_data` against `plant_profile`. Profile and data errors
    /// become an error result; nothing is partially populated.
    pub fn analyze(&self, sensor_data: &SensorData, plant_profile: &str) -> AnalysisResult {
        match self.try_analyze(sensor_data, plant_profile) {
            Ok(report) => AnalysisResult::Success(report),
            Err(e) => {
                tracing::warn!("Analysis for profile {} failed: {}", plant_profile, e);
                e.into()
            }
        }
    }

    pub fn try_analyze(
        &self,
        sensor_data: &SensorData,
        plant_profile: &str,
    ) -> Result<AnalysisReport, AnalysisError> {
        let profile = self
            .profiles
            .get(plant_profile)
            .ok_or_else(|| AnalysisError::UnknownProfile(plant_profile.to_string()))?;

        if sensor_data.is_empty() {
            return Err(AnalysisError::NoSensorData);
        }

        let mut parameter_analysis = IndexMap::with_capacity(sensor_data.len());
        for (parameter, series) in sensor_data {
            if series.is_empty() {
                continue;
            }
            match analyze_parameter(parameter, series, profile) {
                Some(analysis) => {
                    tracing::debug!(
                        "Analysed {} for {}: status={:?}, trend={}",
                        parameter,
                        plant_profile,
                        analysis.range_status(),
                        analysis.trend_analysis.trend
                    );
                    parameter_analysis.insert(parameter.clone(), analysis);
                }
                None => {
                    tracing::debug!("No usable readings left for {} after cleaning", parameter);
                }
            }
        }

        let overall_analysis = scorer::score(&parameter_analysis);
        tracing::info!(
            "Profile {} scored {:.1} ({}) over {} parameters",
            plant_profile,
            overall_analysis.overall_score,
            overall_analysis.category,
            parameter_analysis.len()
        );

        Ok(AnalysisReport {
            timestamp: Utc::now(),
            plant_profile: plant_profile.to_string(),
            parameter_analysis,
            overall_analysis,
        })
    }
}

/// Clean one parameter's series and evaluate it. `None` when cleaning leaves
/// no readings.
pub fn analyze_parameter(
    parameter: &str,
    series: &TimeSeries,
    profile: &PlantProfile,
) -> Option<ParameterAnalysis> {
    let cleaned = cleaner::clean(series);
    let values: Vec<f64> = cleaned.values().collect();
    let statistics = Statistics::from_values(&values)?;

    Some(ParameterAnalysis {
        statistics,
        range_analysis: range_evaluator::evaluate(&cleaned, profile.optimal_range(parameter)),
        trend_analysis: trend_estimator::estimate(&cleaned),
    })
}

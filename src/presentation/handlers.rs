// HTTP request handlers
use crate::application::growth_analyzer::AnalysisError;
use crate::domain::analysis::AnalysisResult;
use crate::domain::profile::OptimalRange;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct WindowQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub optimal_ranges: IndexMap<String, OptimalRange>,
    pub parameters: Vec<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List configured plant profiles
pub async fn list_profiles(State(state): State<Arc<AppState>>) -> Json<Vec<ProfileSummary>> {
    let summaries = state
        .profiles
        .iter()
        .map(|(name, profile)| ProfileSummary {
            name: name.clone(),
            optimal_ranges: profile.optimal_ranges.clone(),
            parameters: profile.sensor_mapping.keys().cloned().collect(),
        })
        .collect();

    Json(summaries)
}

/// Fetch a profile's sensor data for the requested window and analyse it
pub async fn analyze_profile(
    Path(profile): Path<String>,
    Query(query): Query<WindowQuery>,
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<AnalysisResult>) {
    let days = query.days.unwrap_or(state.default_days);

    let sensor_data = match state
        .sensor_data_service
        .sensor_data_for_profile(&profile, days)
        .await
    {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("Cannot analyse profile {}: {}", profile, e);
            let status = match e {
                AnalysisError::UnknownProfile(_) => StatusCode::NOT_FOUND,
                AnalysisError::InvalidWindow(_) => StatusCode::BAD_REQUEST,
                AnalysisError::NoSensorData => StatusCode::OK,
            };
            return (status, Json(e.into()));
        }
    };

    tracing::info!(
        "Analysing profile {} over {} days ({} parameters with data)",
        profile,
        days,
        sensor_data.len()
    );
    let result = state.analyzer.analyze(&sensor_data, &profile);
    (StatusCode::OK, Json(result))
}

// Growth analysis result records
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Descriptive statistics of a cleaned series. Spread is absent for a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stddev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeStatus {
    Optimal,
    Acceptable,
    Suboptimal,
}

impl RangeStatus {
    /// Contribution of this status to the overall score.
    pub fn weight(self) -> f64 {
        match self {
            Self::Optimal => 1.0,
            Self::Acceptable => 0.7,
            Self::Suboptimal => 0.3,
        }
    }
}

impl std::fmt::Display for RangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Optimal => write!(f, "optimal"),
            Self::Acceptable => write!(f, "acceptable"),
            Self::Suboptimal => write!(f, "suboptimal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeAnalysis {
    pub optimal_min: f64,
    pub optimal_max: f64,
    pub pct_in_range: f64,
    pub pct_below_range: f64,
    pub pct_above_range: f64,
    pub status: RangeStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    Unknown,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
            Self::Stable => write!(f, "stable"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Regression output behind a classified trend, in units per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    pub p_value: f64,
    pub std_err: f64,
    pub change_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub message: String,
    /// Absent when the trend is `unknown`.
    #[serde(flatten)]
    pub fit: Option<TrendFit>,
}

impl TrendAnalysis {
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            trend: Trend::Unknown,
            message: message.into(),
            fit: None,
        }
    }

    pub fn slope(&self) -> Option<f64> {
        self.fit.as_ref().map(|f| f.slope)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAnalysis {
    pub statistics: Statistics,
    /// Absent when the profile has no optimal range for the parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_analysis: Option<RangeAnalysis>,
    pub trend_analysis: TrendAnalysis,
}

impl ParameterAnalysis {
    pub fn range_status(&self) -> Option<RangeStatus> {
        self.range_analysis.as_ref().map(|r| r.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Category {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent growing conditions",
            Self::Good => "Good growing conditions",
            Self::Fair => "Acceptable conditions, some improvements recommended",
            Self::Poor => "Poor conditions, significant improvements required",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallAnalysis {
    pub overall_score: f64,
    pub category: Category,
    pub message: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub timestamp: DateTime<Utc>,
    pub plant_profile: String,
    pub parameter_analysis: IndexMap<String, ParameterAnalysis>,
    pub overall_analysis: OverallAnalysis,
}

/// Outcome of one analysis run, handed as-is to reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisResult {
    Success(AnalysisReport),
    Error { message: String },
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Success(report) => Some(report),
            Self::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Error { message } => Some(message),
        }
    }
}

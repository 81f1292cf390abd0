// Mycodo REST API repository implementation
use crate::application::sensor_repository::{SensorRepository, TimeWindow};
use crate::domain::series::{Reading, TimeSeries};
use crate::infrastructure::config::ApiSettings;
use crate::infrastructure::timestamps::parse_timestamp;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

const API_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct MycodoApiRepository {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Measurement {
    time: String,
    #[serde(default)]
    value: serde_json::Value,
}

impl Measurement {
    /// Values arrive as numbers or numeric strings.
    fn to_reading(&self) -> Option<Reading> {
        let timestamp = parse_timestamp(&self.time)?;
        let value = match &self.value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        Some(match value {
            Some(v) => Reading::new(timestamp, v),
            None => Reading::missing(timestamp),
        })
    }
}

impl MycodoApiRepository {
    pub fn new(settings: &ApiSettings) -> Self {
        let scheme = if settings.ssl { "https" } else { "http" };
        Self {
            api_url: format!("{}://{}:{}/api", scheme, settings.host, settings.port),
            api_key: settings.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn measurements_url(&self, source_id: &str) -> String {
        format!(
            "{}/measurements/historical/{}",
            self.api_url,
            urlencoding::encode(source_id)
        )
    }
}

#[async_trait]
impl SensorRepository for MycodoApiRepository {
    async fn fetch_readings(&self, source_id: &str, window: TimeWindow) -> Result<TimeSeries> {
        let url = self.measurements_url(source_id);
        let start = window.start.format(API_TIME_FORMAT).to_string();
        let end = window.end.format(API_TIME_FORMAT).to_string();

        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("start", start.as_str()), ("end", end.as_str())])
            .send()
            .await
            .context("Failed to send request to Mycodo API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Mycodo API request failed with status {}: {}", status, body);
        }

        let measurements = response
            .json::<Vec<Measurement>>()
            .await
            .context("Failed to parse Mycodo API response")?;

        let readings: Vec<Reading> = measurements.iter().filter_map(Measurement::to_reading).collect();
        tracing::debug!(
            "Received {} measurements ({} usable) for input {}",
            measurements.len(),
            readings.len(),
            source_id
        );

        Ok(TimeSeries::new(readings))
    }
}

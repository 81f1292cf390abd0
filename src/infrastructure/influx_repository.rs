// InfluxDB repository implementation
use crate::application::sensor_repository::{SensorRepository, TimeWindow};
use crate::domain::series::{Reading, TimeSeries};
use crate::infrastructure::config::InfluxSettings;
use crate::infrastructure::timestamps::parse_timestamp;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct InfluxRepository {
    base_url: String,
    username: String,
    password: String,
    database: String,
    measurement: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResponse {
    results: Vec<InfluxQLResult>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResult {
    #[serde(default)]
    series: Option<Vec<InfluxQLSeries>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLSeries {
    columns: Vec<String>,
    values: Vec<Vec<serde_json::Value>>,
}

impl InfluxRepository {
    pub fn new(settings: &InfluxSettings) -> Self {
        let host = settings.host.trim_end_matches('/');
        let host = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };

        Self {
            base_url: format!("{}:{}", host, settings.port),
            username: settings.username.clone(),
            password: settings.password.clone(),
            database: settings.database.clone(),
            measurement: settings.measurement.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn build_query_url(&self, query: &str) -> String {
        let encoded_query = urlencoding::encode(query);
        format!("{}/query?db={}&q={}", self.base_url, self.database, encoded_query)
    }

    fn readings_query(&self, source_id: &str, window: TimeWindow) -> String {
        format!(
            "SELECT \"value\" FROM \"{}\" WHERE time >= '{}' AND time <= '{}' AND \"input_id\" = '{}'",
            self.measurement,
            window.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            window.end.to_rfc3339_opts(SecondsFormat::Secs, true),
            source_id.replace('\'', "\\'")
        )
    }

    async fn execute_query(&self, query: &str) -> Result<InfluxQLResponse> {
        let url = self.build_query_url(query);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let response = request
            .send()
            .await
            .context("Failed to send request to InfluxDB")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("InfluxDB query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<InfluxQLResponse>()
            .await
            .context("Failed to parse InfluxDB response")?;

        // Check for errors in the response
        if let Some(result) = data.results.first() {
            if let Some(error) = &result.error {
                anyhow::bail!("InfluxDB query error: {}", error);
            }
        }

        Ok(data)
    }
}

/// Readings from the `time`/`value` columns of every returned series. Rows
/// with an unparseable time are skipped; null or non-numeric values become
/// missing readings.
fn readings_from_response(response: &InfluxQLResponse) -> Vec<Reading> {
    let mut readings = Vec::new();
    let Some(series) = response.results.first().and_then(|r| r.series.as_ref()) else {
        return readings;
    };

    for s in series {
        let time_idx = s.columns.iter().position(|c| c == "time").unwrap_or(0);
        let value_idx = s.columns.iter().position(|c| c == "value").unwrap_or(1);

        for row in &s.values {
            let Some(timestamp) = row
                .get(time_idx)
                .and_then(|t| t.as_str())
                .and_then(parse_timestamp)
            else {
                continue;
            };

            let reading = match row.get(value_idx).and_then(|v| v.as_f64()) {
                Some(value) => Reading::new(timestamp, value),
                None => Reading::missing(timestamp),
            };
            readings.push(reading);
        }
    }

    readings
}

#[async_trait]
impl SensorRepository for InfluxRepository {
    async fn fetch_readings(&self, source_id: &str, window: TimeWindow) -> Result<TimeSeries> {
        let query = self.readings_query(source_id, window);
        tracing::debug!("Executing readings query: {}", query);

        let response = self.execute_query(&query).await?;
        let readings = readings_from_response(&response);

        tracing::debug!("Found {} readings for input {}", readings.len(), source_id);
        Ok(TimeSeries::new(readings))
    }
}

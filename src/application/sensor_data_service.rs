// Sensor data service - Use case for gathering a profile's sensor series
use crate::application::growth_analyzer::AnalysisError;
use crate::application::sensor_repository::{SensorRepository, TimeWindow};
use crate::domain::profile::ProfileCatalog;
use crate::domain::resample::resample;
use crate::domain::series::SensorData;
use chrono::TimeDelta;
use futures::future::join_all;
use std::sync::Arc;

#[derive(Clone)]
pub struct SensorDataService {
    repository: Arc<dyn SensorRepository>,
    profiles: Arc<ProfileCatalog>,
    resample_bucket: Option<TimeDelta>,
}

impl SensorDataService {
    pub fn new(repository: Arc<dyn SensorRepository>, profiles: Arc<ProfileCatalog>) -> Self {
        Self {
            repository,
            profiles,
            resample_bucket: None,
        }
    }

    /// Average every fetched series into fixed buckets before it is returned.
    pub fn with_resampling(mut self, bucket: TimeDelta) -> Self {
        self.resample_bucket = Some(bucket);
        self
    }

    pub async fn sensor_data_for_profile(
        &self,
        profile_name: &str,
        days: u32,
    ) -> Result<SensorData, AnalysisError> {
        let window = TimeWindow::last_days(days).ok_or(AnalysisError::InvalidWindow(days))?;
        self.sensor_data_in_window(profile_name, window).await
    }

    /// Fetch every mapped sensor of a profile. Sources that fail or return no
    /// readings are left out of the result, keeping the mapping's order.
    pub async fn sensor_data_in_window(
        &self,
        profile_name: &str,
        window: TimeWindow,
    ) -> Result<SensorData, AnalysisError> {
        let profile = self
            .profiles
            .get(profile_name)
            .ok_or_else(|| AnalysisError::UnknownProfile(profile_name.to_string()))?;

        let fetches = profile.sensor_mapping.iter().map(|(parameter, source_id)| {
            let repo = self.repository.clone();
            async move {
                let result = repo.fetch_readings(source_id, window).await;
                (parameter, source_id, result)
            }
        });

        let mut sensor_data = SensorData::new();
        for (parameter, source_id, result) in join_all(fetches).await {
            match result {
                Ok(series) if series.is_empty() => {
                    tracing::debug!("No readings for {} (source {})", parameter, source_id);
                }
                Ok(series) => {
                    tracing::debug!(
                        "Fetched {} readings for {} (source {})",
                        series.len(),
                        parameter,
                        source_id
                    );
                    let series = match self.resample_bucket {
                        Some(bucket) => resample(&series, bucket),
                        None => series,
                    };
                    sensor_data.insert(parameter.clone(), series);
                }
                Err(e) => {
                    tracing::error!(
                        "Error fetching {} (source {}): {:#}",
                        parameter,
                        source_id,
                        e
                    );
                }
            }
        }

        Ok(sensor_data)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::InMemoryRepository;
    use super::*;
    use crate::domain::profile::PlantProfile;
    use crate::domain::series::test_support::{at_hour, hourly};
    use crate::domain::series::{Reading, TimeSeries};
    use indexmap::IndexMap;

    fn catalog() -> Arc<ProfileCatalog> {
        let mut basil = PlantProfile::default();
        for (parameter, source) in [
            ("soil_moisture", "in-soil"),
            ("temperature", "in-temp"),
            ("light", "in-light"),
            ("humidity", "in-hum"),
        ] {
            basil
                .sensor_mapping
                .insert(parameter.to_string(), source.to_string());
        }
        let mut profiles = IndexMap::new();
        profiles.insert("basil".to_string(), basil);
        Arc::new(ProfileCatalog::new(profiles))
    }

    fn repository() -> InMemoryRepository {
        let mut repo = InMemoryRepository::default();
        repo.series.insert("in-temp".to_string(), hourly(&[20.0, 21.0]));
        repo.series.insert("in-soil".to_string(), hourly(&[60.0, 61.0, 62.0]));
        repo.series.insert("in-light".to_string(), TimeSeries::default());
        repo.failing.push("in-hum".to_string());
        repo
    }

    #[tokio::test]
    async fn test_collects_series_in_mapping_order() {
        let service = SensorDataService::new(Arc::new(repository()), catalog());
        let data = service
            .sensor_data_in_window("basil", TimeWindow::last_days(7).unwrap())
            .await
            .unwrap();

        assert_eq!(
            data.keys().collect::<Vec<_>>(),
            vec!["soil_moisture", "temperature"]
        );
        assert_eq!(data["soil_moisture"].len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_profile() {
        let service = SensorDataService::new(Arc::new(repository()), catalog());
        let err = service.sensor_data_for_profile("fern", 30).await.unwrap_err();
        assert_eq!(err, AnalysisError::UnknownProfile("fern".to_string()));
    }

    #[tokio::test]
    async fn test_resamples_when_configured() {
        let mut repo = InMemoryRepository::default();
        repo.series.insert(
            "in-temp".to_string(),
            TimeSeries::new(vec![
                Reading::new(at_hour(0), 20.0),
                Reading::new(at_hour(0) + TimeDelta::minutes(30), 22.0),
                Reading::new(at_hour(1), 24.0),
            ]),
        );

        let service = SensorDataService::new(Arc::new(repo), catalog())
            .with_resampling(TimeDelta::hours(1));
        let data = service.sensor_data_for_profile("basil", 1).await.unwrap();

        assert_eq!(data["temperature"].values().collect::<Vec<_>>(), vec![21.0, 24.0]);
    }

    #[tokio::test]
    async fn test_window_out_of_range_is_an_error() {
        let service = SensorDataService::new(Arc::new(repository()), catalog());
        let err = service
            .sensor_data_for_profile("basil", u32::MAX)
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisError::InvalidWindow(u32::MAX));
    }
}

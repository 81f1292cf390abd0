// Application state for HTTP handlers
use crate::application::growth_analyzer::GrowthAnalyzer;
use crate::application::sensor_data_service::SensorDataService;
use crate::domain::profile::ProfileCatalog;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: GrowthAnalyzer,
    pub sensor_data_service: SensorDataService,
    pub profiles: Arc<ProfileCatalog>,
    pub default_days: u32,
}

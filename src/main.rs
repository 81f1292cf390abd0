// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Router, routing::get};
use chrono::TimeDelta;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use plant_growth_analyzer::application::growth_analyzer::GrowthAnalyzer;
use plant_growth_analyzer::application::sensor_data_service::SensorDataService;
use plant_growth_analyzer::application::sensor_repository::SensorRepository;
use plant_growth_analyzer::infrastructure::config::{
    SourceSettings, load_analyzer_config, load_profiles,
};
use plant_growth_analyzer::infrastructure::influx_repository::InfluxRepository;
use plant_growth_analyzer::infrastructure::mycodo_api_repository::MycodoApiRepository;
use plant_growth_analyzer::presentation::app_state::AppState;
use plant_growth_analyzer::presentation::handlers::{analyze_profile, health_check, list_profiles};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_analyzer_config().context("Failed to load config/analyzer")?;
    let profiles = Arc::new(load_profiles().context("Failed to load config/profiles")?);
    if profiles.is_empty() {
        tracing::warn!("No plant profiles configured; every analysis will report an unknown profile");
    } else {
        tracing::info!("Loaded {} plant profiles", profiles.len());
    }

    // Create repository (infrastructure layer)
    let repository: Arc<dyn SensorRepository> = match &config.source {
        SourceSettings::Influxdb(influx) => {
            tracing::info!("Reading sensor data from InfluxDB at {}", influx.host);
            Arc::new(InfluxRepository::new(influx))
        }
        SourceSettings::Api(api) => {
            tracing::info!("Reading sensor data from Mycodo API at {}", api.host);
            Arc::new(MycodoApiRepository::new(api))
        }
    };

    // Create services (application layer)
    let mut sensor_data_service = SensorDataService::new(repository, profiles.clone());
    if let Some(minutes) = config.analysis.resample_minutes {
        sensor_data_service =
            sensor_data_service.with_resampling(TimeDelta::minutes(i64::from(minutes)));
    }

    let state = Arc::new(AppState {
        analyzer: GrowthAnalyzer::new(profiles.clone()),
        sensor_data_service,
        profiles,
        default_days: config.analysis.default_days,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/profiles", get(list_profiles))
        .route("/analysis/:profile", get(analyze_profile))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting plant-growth-analyzer on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

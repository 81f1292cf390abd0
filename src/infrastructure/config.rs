use crate::domain::profile::ProfileCatalog;
use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    pub source: SourceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisSettings {
    #[serde(default = "default_days")]
    pub default_days: u32,
    /// Average readings into buckets of this many minutes before analysis.
    pub resample_minutes: Option<u32>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            default_days: default_days(),
            resample_minutes: None,
        }
    }
}

/// Where sensor readings come from, selected by `method`.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum SourceSettings {
    Influxdb(InfluxSettings),
    Api(ApiSettings),
}

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_influx_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_measurement")]
    pub measurement: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default)]
    pub api_key: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_days() -> u32 {
    30
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_influx_port() -> u16 {
    8086
}

fn default_api_port() -> u16 {
    8080
}

fn default_database() -> String {
    "mycodo_db".to_string()
}

fn default_measurement() -> String {
    "measurements".to_string()
}

pub fn load_analyzer_config() -> anyhow::Result<AnalyzerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/analyzer"))
        .add_source(
            config::Environment::with_prefix("ANALYZER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_profiles() -> anyhow::Result<ProfileCatalog> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/profiles"))
        .build()?;

    catalog_from_settings(settings)
}

/// Parse a profile catalog from TOML text.
pub fn parse_profiles(toml: &str) -> anyhow::Result<ProfileCatalog> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    catalog_from_settings(settings)
}

fn catalog_from_settings(settings: config::Config) -> anyhow::Result<ProfileCatalog> {
    let catalog: ProfileCatalog = settings
        .try_deserialize()
        .context("Failed to parse plant profiles")?;
    catalog.validate()?;
    Ok(catalog)
}

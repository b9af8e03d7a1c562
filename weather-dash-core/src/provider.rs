use crate::{
    Config,
    model::{Coordinates, ForecastSnapshot, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// How a place is addressed when talking to the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name),
            LocationQuery::Coordinates(c) => write!(f, "{:.4},{:.4}", c.latitude, c.longitude),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered, but not with a success status.
    #[error("provider returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("request to weather provider failed: {0}")]
    Transport(String),

    #[error("unexpected weather provider response: {0}")]
    Parse(String),
}

impl ProviderError {
    pub fn is_status(&self) -> bool {
        matches!(self, ProviderError::Status { .. })
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &LocationQuery) -> Result<WeatherSnapshot, ProviderError>;

    /// 3-hour slots, chronological.
    async fn forecast(&self, location: &LocationQuery) -> Result<ForecastSnapshot, ProviderError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather-dash configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    let provider = OpenWeatherProvider::new(api_key, &config.base_url, config.timeout())?;
    Ok(Box::new(provider))
}

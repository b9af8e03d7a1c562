//! One-shot sources for the device position.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{Config, model::Coordinates};

pub const IP_API_URL: &str = "http://ip-api.com/json";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Geolocation not supported.")]
    Unsupported,

    #[error("Location permission denied.")]
    Denied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait GeolocationSource: Send + Sync + std::fmt::Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Always answers with the configured coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl GeolocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// No position source available on this host.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl GeolocationSource for NoGeolocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// Approximate position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocation {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpGeolocation {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, GeolocationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeolocationError::Unavailable(e.to_string()))?;

        Ok(Self {
            url: url.to_owned(),
            http,
        })
    }
}

#[async_trait]
impl GeolocationSource for IpGeolocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| GeolocationError::Unavailable(e.to_string()))?;

        if !res.status().is_success() {
            return Err(GeolocationError::Unavailable(format!(
                "lookup returned status {}",
                res.status()
            )));
        }

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|e| GeolocationError::Unavailable(e.to_string()))?;

        if body.status != "success" {
            debug!(message = ?body.message, "IP geolocation refused");
            return Err(GeolocationError::Denied);
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(GeolocationError::Unavailable(
                "lookup answer has no coordinates".to_string(),
            )),
        }
    }
}

/// Fixed coordinates when configured, otherwise IP lookup.
pub fn geolocation_from_config(config: &Config) -> Box<dyn GeolocationSource> {
    if let Some(coords) = config.location {
        return Box::new(FixedLocation(coords));
    }

    match IpGeolocation::new(IP_API_URL, config.timeout()) {
        Ok(source) => Box::new(source),
        Err(e) => {
            debug!(error = %e, "IP geolocation unavailable");
            Box::new(NoGeolocation)
        }
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::model::{Condition, ForecastEntry, ForecastSnapshot, WeatherSnapshot};

use super::{LocationQuery, ProviderError, WeatherProvider};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        location: &LocationQuery,
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let mut query: Vec<(&str, String)> = match location {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        };
        query.push(("units", "metric".to_string()));
        query.push(("appid", self.api_key.clone()));

        debug!(%endpoint, %location, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("OpenWeather {endpoint}: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("OpenWeather {endpoint} body: {e}")))?;

        if !status.is_success() {
            warn!(%endpoint, %status, "OpenWeather returned non-success status");
            return Err(ProviderError::Status {
                code: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        // OpenWeather repeats the status in the body as `cod`, sometimes as a string.
        let envelope: OwEnvelope = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Parse(format!("OpenWeather {endpoint} JSON: {e}")))?;
        let failed_cod = envelope
            .cod
            .as_ref()
            .and_then(cod_value)
            .filter(|&code| code != 200);
        if let Some(code) = failed_cod {
            warn!(%endpoint, code, "OpenWeather body reports non-success cod");
            return Err(ProviderError::Status {
                code,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ProviderError::Parse(format!("OpenWeather {endpoint} JSON: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct OwEnvelope {
    cod: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn cod_value(cod: &serde_json::Value) -> Option<u16> {
    match cod {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn condition_of(weather: &[OwWeather]) -> (Condition, String) {
    weather
        .first()
        .map(|w| (Condition::parse(&w.main), w.description.clone()))
        .unwrap_or_else(|| (Condition::Other, "unknown".to_string()))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, location: &LocationQuery) -> Result<WeatherSnapshot, ProviderError> {
        let parsed: OwCurrentResponse = self.get_json("weather", location).await?;
        let (condition, description) = condition_of(&parsed.weather);

        Ok(WeatherSnapshot {
            location_name: parsed.name,
            temperature_c: parsed.main.temp,
            condition,
            description,
        })
    }

    async fn forecast(&self, location: &LocationQuery) -> Result<ForecastSnapshot, ProviderError> {
        let parsed: OwForecastResponse = self.get_json("forecast", location).await?;

        let entries = parsed
            .list
            .into_iter()
            .map(|entry| {
                let (condition, description) = condition_of(&entry.weather);
                ForecastEntry {
                    timestamp_local: entry.dt_txt,
                    temperature_c: entry.main.temp,
                    condition,
                    description,
                }
            })
            .collect();

        Ok(ForecastSnapshot(entries))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

//! The weather session controller.
//!
//! Owns every piece of mutable dashboard state, runs the two fetch flows
//! (by city name, by coordinates) and manages the favorites list. The
//! presentation layer reads [`SessionState`] through [`WeatherSession::state`]
//! or follows every transition through [`WeatherSession::subscribe`].

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::{
    favorites::{Favorites, StoreError},
    forecast::{daily_summary, hourly_points},
    geolocation::{GeolocationError, GeolocationSource},
    model::{Coordinates, ForecastEntry, ForecastSnapshot, SessionState, WeatherSnapshot},
    provider::{LocationQuery, ProviderError, WeatherProvider},
    speech::SpeechSink,
    theme::{EffectKind, Theme, derive_theme, derive_visual_effect},
};

pub const NOT_FOUND_MESSAGE: &str = "City not found. Try another one.";
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching data.";
pub const LOCATION_ERROR_MESSAGE: &str = "Cannot fetch location weather.";

/// Sentence spoken after a successful search by name.
pub fn announcement(weather: &WeatherSnapshot) -> String {
    format!(
        "The current temperature in {} is {} degrees Celsius with {}",
        weather.location_name, weather.temperature_c, weather.description
    )
}

#[derive(Debug)]
pub struct WeatherSession {
    provider: Box<dyn WeatherProvider>,
    geolocation: Box<dyn GeolocationSource>,
    speech: Box<dyn SpeechSink>,
    favorites: Favorites,
    state: watch::Sender<SessionState>,
}

impl WeatherSession {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        geolocation: Box<dyn GeolocationSource>,
        speech: Box<dyn SpeechSink>,
        favorites: Favorites,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            provider,
            geolocation,
            speech,
            favorites,
            state,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that sees every state transition, including `loading`.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn set_query(&mut self, city: &str) {
        self.state.send_modify(|s| s.query_city = city.to_string());
    }

    /// Fetch for whatever is currently in the query field.
    pub async fn search(&mut self) {
        let query = self.state.borrow().query_city.clone();
        self.fetch_by_city_name(&query).await;
    }

    /// Current conditions, then forecast, for `name`. Blank names are ignored.
    #[instrument(skip(self))]
    pub async fn fetch_by_city_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        self.begin_fetch();
        let location = LocationQuery::City(name.to_string());

        let weather = match self.provider.current(&location).await {
            Ok(weather) => weather,
            Err(e @ ProviderError::Status { .. }) => {
                info!(error = %e, "city not found");
                self.fail(NOT_FOUND_MESSAGE);
                return;
            }
            Err(e) => {
                warn!(error = %e, "current conditions request failed");
                self.fail(FETCH_ERROR_MESSAGE);
                return;
            }
        };

        let spoken = announcement(&weather);
        self.state.send_modify(|s| s.weather = Some(weather));

        // A missing forecast still leaves the current conditions on screen.
        match self.provider.forecast(&location).await {
            Ok(forecast) => self.store_forecast(forecast),
            Err(e) => debug!(error = %e, "forecast unavailable, keeping previous forecast"),
        }

        self.speech.speak(&spoken);
        self.state.send_modify(|s| s.loading = false);
    }

    /// Same two requests keyed by position. Any failure, forecast included,
    /// is an error here. On success the query field takes the resolved name.
    #[instrument(skip(self))]
    pub async fn fetch_by_coordinates(&mut self, coords: Coordinates) {
        self.begin_fetch();
        let location = LocationQuery::Coordinates(coords);

        match fetch_both(self.provider.as_ref(), &location).await {
            Ok((weather, forecast)) => {
                self.state.send_modify(|s| {
                    s.query_city = weather.location_name.clone();
                    s.weather = Some(weather);
                });
                self.store_forecast(forecast);
                self.state.send_modify(|s| s.loading = false);
            }
            Err(e) => {
                warn!(error = %e, "location weather request failed");
                self.fail(LOCATION_ERROR_MESSAGE);
            }
        }
    }

    /// Ask the geolocation source once, then fetch by coordinates.
    ///
    /// A geolocation failure is returned before any state changes; the
    /// caller shows it as a notice.
    pub async fn use_my_location(&mut self) -> Result<(), GeolocationError> {
        let coords = self.geolocation.current_position().await.inspect_err(|e| {
            info!(error = %e, "geolocation failed");
        })?;

        self.fetch_by_coordinates(coords).await;
        Ok(())
    }

    pub async fn select_favorite(&mut self, name: &str) {
        self.fetch_by_city_name(name).await;
    }

    pub fn favorites(&self) -> &[String] {
        self.favorites.cities()
    }

    /// Returns `Ok(false)` when `name` was already a favorite.
    pub fn add_favorite(&mut self, name: &str) -> Result<bool, StoreError> {
        self.favorites.add(name)
    }

    pub fn remove_favorite(&mut self, name: &str) -> Result<(), StoreError> {
        self.favorites.remove(name)
    }

    /// Add the displayed location. `Ok(false)` when nothing is displayed
    /// or it is already a favorite.
    pub fn add_current_to_favorites(&mut self) -> Result<bool, StoreError> {
        let name = match self.state.borrow().weather.as_ref() {
            Some(weather) => weather.location_name.clone(),
            None => return Ok(false),
        };
        self.favorites.add(&name)
    }

    pub fn theme(&self) -> Theme {
        derive_theme(self.state.borrow().weather.as_ref())
    }

    pub fn visual_effect(&self) -> EffectKind {
        self.state
            .borrow()
            .weather
            .as_ref()
            .map_or(EffectKind::None, |w| derive_visual_effect(w.condition))
    }

    pub fn daily_summary(&self) -> Vec<ForecastEntry> {
        self.state
            .borrow()
            .forecast
            .as_ref()
            .map(daily_summary)
            .unwrap_or_default()
    }

    fn begin_fetch(&mut self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error_message = None;
        });
    }

    fn store_forecast(&mut self, forecast: ForecastSnapshot) {
        let hourly = hourly_points(&forecast);
        self.state.send_modify(|s| {
            s.forecast = Some(forecast);
            s.hourly = hourly;
        });
    }

    fn fail(&mut self, message: &str) {
        self.state.send_modify(|s| {
            s.clear_data();
            s.error_message = Some(message.to_string());
            s.loading = false;
        });
    }
}

async fn fetch_both(
    provider: &dyn WeatherProvider,
    location: &LocationQuery,
) -> Result<(WeatherSnapshot, ForecastSnapshot), ProviderError> {
    let weather = provider.current(location).await?;
    let forecast = provider.forecast(location).await?;
    Ok((weather, forecast))
}

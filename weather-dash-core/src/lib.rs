//! Core library for the `weather-dash` dashboard.
//!
//! This crate defines:
//! - The weather session controller (fetch flows, derived UI state, favorites)
//! - Ports for the weather provider, favorites store, geolocation and speech,
//!   with their production adapters
//! - Shared domain models and the condition lookup tables
//! - Configuration & credentials handling
//!
//! It is used by `weather-dash-cli`, but any other front end can drive a
//! [`WeatherSession`] and render its [`SessionState`].

pub mod config;
pub mod favorites;
pub mod forecast;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod session;
pub mod speech;
pub mod theme;

pub use config::Config;
pub use favorites::{Favorites, FileStore, KeyValueStore, MemoryStore, StoreError};
pub use geolocation::{GeolocationError, GeolocationSource};
pub use model::{
    Condition, Coordinates, ForecastEntry, ForecastSnapshot, HourlyPoint, SessionState,
    WeatherSnapshot,
};
pub use provider::{LocationQuery, ProviderError, WeatherProvider};
pub use session::WeatherSession;
pub use speech::SpeechSink;
pub use theme::{EffectKind, Theme};

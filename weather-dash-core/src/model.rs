use serde::{Deserialize, Serialize};

/// Coarse weather category as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Drizzle,
    Thunderstorm,
    Mist,
    Other,
}

impl Condition {
    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Clear,
            Condition::Clouds,
            Condition::Rain,
            Condition::Snow,
            Condition::Drizzle,
            Condition::Thunderstorm,
            Condition::Mist,
            Condition::Other,
        ]
    }

    /// Map the provider's category string. Unknown categories become `Other`.
    pub fn parse(value: &str) -> Self {
        match value {
            "Clear" => Condition::Clear,
            "Clouds" => Condition::Clouds,
            "Rain" => Condition::Rain,
            "Snow" => Condition::Snow,
            "Drizzle" => Condition::Drizzle,
            "Thunderstorm" => Condition::Thunderstorm,
            "Mist" => Condition::Mist,
            _ => Condition::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Drizzle => "Drizzle",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Mist => "Mist",
            Condition::Other => "Other",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions for one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub temperature_c: f64,
    pub condition: Condition,
    pub description: String,
}

/// One 3-hour forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Provider's local timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp_local: String,
    pub temperature_c: f64,
    pub condition: Condition,
    pub description: String,
}

/// Forecast entries in the order the provider returned them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastSnapshot(pub Vec<ForecastEntry>);

impl ForecastSnapshot {
    pub fn entries(&self) -> &[ForecastEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// `HH:MM`
    pub time_label: String,
    pub temperature_c: f64,
}

/// Everything the presentation layer reads.
///
/// `error_message` and the data fields are mutually exclusive outcomes of
/// the most recent fetch flow.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub query_city: String,
    pub weather: Option<WeatherSnapshot>,
    pub forecast: Option<ForecastSnapshot>,
    pub hourly: Vec<HourlyPoint>,
    pub loading: bool,
    pub error_message: Option<String>,
}

impl SessionState {
    pub(crate) fn clear_data(&mut self) {
        self.weather = None;
        self.forecast = None;
        self.hourly.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_as_str_roundtrip() {
        for c in Condition::all() {
            assert_eq!(Condition::parse(c.as_str()), *c);
        }
    }

    #[test]
    fn unknown_condition_falls_back_to_other() {
        assert_eq!(Condition::parse("Haze"), Condition::Other);
        assert_eq!(Condition::parse("rain"), Condition::Other);
        assert_eq!(Condition::parse(""), Condition::Other);
    }

    #[test]
    fn default_session_state_is_at_rest() {
        let state = SessionState::default();
        assert!(!state.loading);
        assert!(state.weather.is_none());
        assert!(state.forecast.is_none());
        assert!(state.hourly.is_empty());
        assert!(state.error_message.is_none());
    }
}

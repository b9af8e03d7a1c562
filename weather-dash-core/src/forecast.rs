//! Display projections over a raw forecast.

use chrono::NaiveDate;

use crate::model::{ForecastEntry, ForecastSnapshot, HourlyPoint};

/// Number of 3-hour slots shown on the hourly chart.
pub const HOURLY_POINTS: usize = 12;

/// 8 slots of 3 hours make one day.
pub const SLOTS_PER_DAY: usize = 8;

pub const DAILY_CARDS: usize = 3;

/// First twelve slots, labelled with their time of day.
pub fn hourly_points(forecast: &ForecastSnapshot) -> Vec<HourlyPoint> {
    forecast
        .entries()
        .iter()
        .take(HOURLY_POINTS)
        .map(|entry| HourlyPoint {
            time_label: time_label(&entry.timestamp_local),
            temperature_c: entry.temperature_c,
        })
        .collect()
}

/// One reading per day: indices 0, 8 and 16.
pub fn daily_summary(forecast: &ForecastSnapshot) -> Vec<ForecastEntry> {
    forecast
        .entries()
        .iter()
        .step_by(SLOTS_PER_DAY)
        .take(DAILY_CARDS)
        .cloned()
        .collect()
}

/// `YYYY-MM-DD HH:MM:SS` -> `DD/MM/YYYY`. No timezone conversion.
///
/// A date part that does not parse is returned as is.
pub fn format_short_date(timestamp: &str) -> String {
    let date_part = timestamp.split_once(' ').map_or(timestamp, |(date, _)| date);

    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => date_part.to_string(),
    }
}

fn time_label(timestamp: &str) -> String {
    let time_part = timestamp.split_once(' ').map_or("", |(_, time)| time);
    time_part.chars().take(5).collect()
}

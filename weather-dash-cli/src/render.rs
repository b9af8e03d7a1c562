//! Plain-text views over the session state.

use std::fmt::Write;

use weather_dash_core::{
    EffectKind, ForecastEntry, HourlyPoint, SessionState, Theme, WeatherSession, WeatherSnapshot,
    forecast::format_short_date,
    theme::particles,
};

const OVERLAY_WIDTH: usize = 40;
const BAR_WIDTH: f64 = 24.0;

pub fn dashboard(session: &WeatherSession) -> String {
    let mut out = header(session.theme());
    out.push_str(&overlay(session.visual_effect(), seed()));
    out.push_str(&body(
        &session.state(),
        session.favorites(),
        &session.daily_summary(),
    ));
    out
}

/// Favorites stay visible while an error hides the weather and forecast.
fn body(state: &SessionState, favorites_list: &[String], daily: &[ForecastEntry]) -> String {
    let mut out = String::new();

    if state.loading {
        out.push_str("Loading...\n");
    }
    if let Some(message) = &state.error_message {
        let _ = writeln!(out, "{message}");
        out.push_str(&favorites(favorites_list));
        return out;
    }

    if let Some(weather) = &state.weather {
        out.push_str(&current_card(weather));
    }
    out.push_str(&favorites(favorites_list));
    out.push_str(&daily_cards(daily));
    out.push_str(&hourly_chart(&state.hourly));

    out
}

fn seed() -> u64 {
    u64::from(chrono::Utc::now().timestamp_subsec_nanos())
}

fn header(theme: Theme) -> String {
    let [top, middle, bottom] = theme.gradient();
    format!("== Live Weather Dashboard ==  [{theme}: {top} > {middle} > {bottom}]\n")
}

/// One line of falling rain or snow, or nothing.
pub fn overlay(kind: EffectKind, seed: u64) -> String {
    let glyph = match kind {
        EffectKind::None => return String::new(),
        EffectKind::Rain => '\'',
        EffectKind::Snow => '*',
    };

    let mut line = vec![' '; OVERLAY_WIDTH];
    for p in particles(kind, seed) {
        let col = ((p.left_pct / 100.0) * OVERLAY_WIDTH as f64) as usize;
        line[col.min(OVERLAY_WIDTH - 1)] = glyph;
    }

    let mut out: String = line.into_iter().collect();
    out.push('\n');
    out
}

pub fn current_card(weather: &WeatherSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", weather.location_name);
    let _ = writeln!(out, "  {}  {}°C", weather.condition.emoji(), weather.temperature_c);
    let _ = writeln!(out, "  {}", capitalize_words(&weather.description));
    let _ = writeln!(out, "  Tip: {}", weather.condition.tip());
    out
}

/// Favorite cities as removable chips.
pub fn favorites(cities: &[String]) -> String {
    if cities.is_empty() {
        return String::new();
    }

    let chips: Vec<String> = cities.iter().map(|c| format!("[{c} ×]")).collect();
    format!("\nFavorite Cities\n  {}\n", chips.join(" "))
}

pub fn daily_cards(days: &[ForecastEntry]) -> String {
    if days.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n3-Day Forecast\n");
    for day in days {
        let _ = writeln!(
            out,
            "  {}  {}  {:>6}°C  {}",
            format_short_date(&day.timestamp_local),
            day.condition.emoji(),
            day.temperature_c,
            capitalize_words(&day.description)
        );
    }
    out
}

/// Horizontal bar per slot, scaled between the lowest and highest temperature.
pub fn hourly_chart(points: &[HourlyPoint]) -> String {
    if points.is_empty() {
        return String::new();
    }

    let min = points.iter().map(|p| p.temperature_c).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.temperature_c).fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let mut out = String::from("\nNext 12 Hours Forecast\n");
    for point in points {
        let scaled = if span > 0.0 {
            (point.temperature_c - min) / span
        } else {
            1.0
        };
        let bar = "█".repeat(1 + (scaled * BAR_WIDTH).round() as usize);
        let _ = writeln!(out, "  {} {bar} {}°C", point.time_label, point.temperature_c);
    }
    out
}

fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

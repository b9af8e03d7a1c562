//! Condition driven look and copy: themes, emoji, tips and the
//! precipitation overlay.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::model::{Condition, WeatherSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    Default,
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Clear => "clear",
            Theme::Clouds => "clouds",
            Theme::Rain => "rain",
            Theme::Snow => "snow",
            Theme::Thunderstorm => "thunderstorm",
        }
    }

    /// Background gradient stops, top to bottom.
    pub fn gradient(&self) -> [&'static str; 3] {
        match self {
            Theme::Default => ["blue-200", "blue-100", "white"],
            Theme::Clear => ["yellow-200", "yellow-100", "orange-100"],
            Theme::Clouds => ["gray-300", "gray-200", "gray-100"],
            Theme::Rain => ["blue-300", "blue-200", "blue-100"],
            Theme::Snow => ["white", "blue-100", "gray-100"],
            Theme::Thunderstorm => ["gray-400", "gray-300", "gray-200"],
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn derive_theme(weather: Option<&WeatherSnapshot>) -> Theme {
    let Some(weather) = weather else {
        return Theme::Default;
    };

    match weather.condition {
        Condition::Clear => Theme::Clear,
        Condition::Clouds => Theme::Clouds,
        Condition::Rain | Condition::Drizzle => Theme::Rain,
        Condition::Snow => Theme::Snow,
        Condition::Thunderstorm => Theme::Thunderstorm,
        Condition::Mist | Condition::Other => Theme::Default,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    None,
    Rain,
    Snow,
}

pub fn derive_visual_effect(condition: Condition) -> EffectKind {
    match condition {
        Condition::Rain | Condition::Drizzle => EffectKind::Rain,
        Condition::Snow => EffectKind::Snow,
        _ => EffectKind::None,
    }
}

impl Condition {
    pub fn emoji(&self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::Clouds => "☁️",
            Condition::Rain => "🌧️",
            Condition::Snow => "❄️",
            Condition::Drizzle => "🌦️",
            Condition::Thunderstorm => "⛈️",
            Condition::Mist => "🌫️",
            Condition::Other => "🌤️",
        }
    }

    pub fn tip(&self) -> &'static str {
        match self {
            Condition::Clear => "It's sunny! Don't forget your sunglasses 😎",
            Condition::Clouds => "Cloudy skies today. You might need a light jacket 🌤️",
            Condition::Rain => "Take an umbrella! ☔",
            Condition::Snow => "Wear warm clothes! ❄️",
            Condition::Drizzle => "Carry a small umbrella 🌦️",
            Condition::Thunderstorm => "Stay indoors if possible ⛈️",
            Condition::Mist => "Drive carefully in the mist 🌫️",
            Condition::Other => "Have a nice day!",
        }
    }
}

pub const PARTICLE_COUNT: usize = 30;

/// Timing of one falling raindrop or snowflake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Horizontal offset, percent of the width.
    pub left_pct: f64,
    pub delay_secs: f64,
    pub duration_secs: f64,
}

/// Overlay particles for `kind`. Equal seeds give equal particles.
pub fn particles(kind: EffectKind, seed: u64) -> Vec<Particle> {
    let (max_delay, min_duration, duration_span) = match kind {
        EffectKind::None => return Vec::new(),
        EffectKind::Rain => (2.0, 0.5, 1.0),
        EffectKind::Snow => (5.0, 3.0, 2.0),
    };

    let mut rng = StdRng::seed_from_u64(seed);
    (0..PARTICLE_COUNT)
        .map(|_| Particle {
            left_pct: rng.gen_range(0.0..100.0),
            delay_secs: rng.gen_range(0.0..max_delay),
            duration_secs: min_duration + rng.gen_range(0.0..duration_span),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(condition: Condition) -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: "Oslo".into(),
            temperature_c: 3.0,
            condition,
            description: "whatever".into(),
        }
    }

    #[test]
    fn absent_and_mist_share_default_theme() {
        assert_eq!(derive_theme(None), Theme::Default);
        assert_eq!(derive_theme(Some(&snapshot(Condition::Mist))), Theme::Default);
        assert_eq!(derive_theme(Some(&snapshot(Condition::Other))), Theme::Default);
    }

    #[test]
    fn rain_and_drizzle_share_rain_theme() {
        assert_eq!(derive_theme(Some(&snapshot(Condition::Rain))), Theme::Rain);
        assert_eq!(derive_theme(Some(&snapshot(Condition::Drizzle))), Theme::Rain);
    }

    #[test]
    fn remaining_conditions_have_own_theme() {
        assert_eq!(derive_theme(Some(&snapshot(Condition::Clear))), Theme::Clear);
        assert_eq!(derive_theme(Some(&snapshot(Condition::Clouds))), Theme::Clouds);
        assert_eq!(derive_theme(Some(&snapshot(Condition::Snow))), Theme::Snow);
        assert_eq!(
            derive_theme(Some(&snapshot(Condition::Thunderstorm))),
            Theme::Thunderstorm
        );
    }

    #[test]
    fn effect_kind_selection() {
        for c in Condition::all() {
            let expected = match c {
                Condition::Rain | Condition::Drizzle => EffectKind::Rain,
                Condition::Snow => EffectKind::Snow,
                _ => EffectKind::None,
            };
            assert_eq!(derive_visual_effect(*c), expected, "condition {c}");
        }
    }

    #[test]
    fn fallback_copy_for_unknown_condition() {
        assert_eq!(Condition::Other.emoji(), "🌤️");
        assert_eq!(Condition::Other.tip(), "Have a nice day!");
        assert_eq!(Condition::Rain.tip(), "Take an umbrella! ☔");
    }

    #[test]
    fn particles_are_deterministic_per_seed() {
        assert_eq!(particles(EffectKind::Rain, 7), particles(EffectKind::Rain, 7));
        assert_ne!(particles(EffectKind::Rain, 7), particles(EffectKind::Rain, 8));
    }

    #[test]
    fn particle_ranges() {
        assert!(particles(EffectKind::None, 1).is_empty());

        let rain = particles(EffectKind::Rain, 42);
        assert_eq!(rain.len(), PARTICLE_COUNT);
        for p in &rain {
            assert!((0.0..100.0).contains(&p.left_pct));
            assert!((0.0..2.0).contains(&p.delay_secs));
            assert!((0.5..1.5).contains(&p.duration_secs));
        }

        let snow = particles(EffectKind::Snow, 42);
        assert_eq!(snow.len(), PARTICLE_COUNT);
        for p in &snow {
            assert!((0.0..5.0).contains(&p.delay_secs));
            assert!((3.0..5.0).contains(&p.duration_secs));
        }
    }
}

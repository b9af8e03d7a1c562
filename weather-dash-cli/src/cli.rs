use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, Text};
use tracing::debug;
use weather_dash_core::{
    Config, Coordinates, Favorites, FileStore, KeyValueStore, MemoryStore, WeatherSession,
    geolocation::geolocation_from_config,
    provider::provider_from_config,
    speech::{SilentSpeech, SpeechSink, speech_from_config},
};

use crate::{dashboard, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// Keep favorites in memory for this run only.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the OpenWeather API key, speech program and fixed location.
    Configure,

    /// Show current weather, forecast and hourly chart for a city.
    Show {
        /// City name, e.g. "Paris" or "New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Add the resolved city to favorites afterwards.
        #[arg(long)]
        favorite: bool,

        /// Do not read the result aloud.
        #[arg(long)]
        no_speech: bool,

        /// Print the session state as JSON instead of the dashboard.
        #[arg(long)]
        json: bool,
    },

    /// Show the weather for the current position.
    Here {
        #[arg(long)]
        json: bool,
    },

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Interactive dashboard.
    Dashboard,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    List,
    Add {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
    Remove {
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                favorite,
                no_speech,
                json,
            } => {
                let config = Config::load()?;
                let mut session = build_session(&config, self.ephemeral, !no_speech)?;

                session.set_query(&city.join(" "));
                session.search().await;

                finish(&session, json)?;
                if favorite && session.add_current_to_favorites()? {
                    println!("Added to favorites.");
                }
                Ok(())
            }
            Command::Here { json } => {
                let config = Config::load()?;
                let mut session = build_session(&config, self.ephemeral, false)?;

                if let Err(e) = session.use_my_location().await {
                    bail!("{e}");
                }
                finish(&session, json)
            }
            Command::Favorites { action } => {
                let config = Config::load()?;
                let mut favorites = Favorites::load(favorites_store(&config, self.ephemeral)?);

                match action {
                    FavoritesAction::List => {}
                    FavoritesAction::Add { city } => {
                        let city = city.join(" ");
                        if !favorites.add(&city)? {
                            println!("{city} is already a favorite.");
                        }
                    }
                    FavoritesAction::Remove { city } => favorites.remove(&city.join(" "))?,
                }

                print!("{}", render::favorites(favorites.cities()));
                Ok(())
            }
            Command::Dashboard => {
                let config = Config::load()?;
                let session = build_session(&config, self.ephemeral, true)?;
                dashboard::run(session).await
            }
        }
    }
}

/// Print the outcome of a fetch flow; a flow that ended in an error fails the command.
fn finish(session: &WeatherSession, json: bool) -> anyhow::Result<()> {
    let state = session.state();

    if json {
        let out =
            serde_json::to_string_pretty(&state).context("Failed to serialize session state")?;
        println!("{out}");
    } else {
        print!("{}", render::dashboard(session));
    }

    match state.error_message {
        Some(message) => bail!("{message}"),
        None => Ok(()),
    }
}

fn build_session(
    config: &Config,
    ephemeral: bool,
    speech: bool,
) -> anyhow::Result<WeatherSession> {
    let provider = provider_from_config(config)?;
    let speech: Box<dyn SpeechSink> = if speech {
        speech_from_config(config)
    } else {
        Box::new(SilentSpeech)
    };
    let favorites = Favorites::load(favorites_store(config, ephemeral)?);

    Ok(WeatherSession::new(
        provider,
        geolocation_from_config(config),
        speech,
        favorites,
    ))
}

fn favorites_store(config: &Config, ephemeral: bool) -> anyhow::Result<Box<dyn KeyValueStore>> {
    if ephemeral {
        return Ok(Box::new(MemoryStore::new()));
    }
    let dir = config.favorites_dir()?;
    debug!(dir = %dir.display(), "using file favorites store");
    Ok(Box::new(FileStore::new(dir)))
}

fn configure() -> anyhow::Result<()> {
    // Read the file itself so an OPENWEATHER_API_KEY override is not persisted.
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let speech = Text::new("Speech command (empty for silent):")
        .with_default(config.speech_command.as_deref().unwrap_or(""))
        .with_help_message("e.g. espeak, say, spd-say")
        .prompt()?;
    config.speech_command = Some(speech.trim().to_string()).filter(|s| !s.is_empty());

    let fixed = Confirm::new("Use a fixed location instead of IP lookup?")
        .with_default(config.location.is_some())
        .prompt()?;
    config.location = if fixed {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a number")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a number")
            .prompt()?;
        Some(Coordinates {
            latitude,
            longitude,
        })
    } else {
        None
    };

    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

use std::fmt;

use inquire::{InquireError, Select, Text};
use weather_dash_core::WeatherSession;

use crate::render;

#[derive(Debug, Clone, PartialEq)]
enum MenuItem {
    GetWeather,
    UseMyLocation,
    AddToFavorites,
    SelectFavorite(String),
    RemoveFavorite(String),
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::GetWeather => f.write_str("Get Weather"),
            MenuItem::UseMyLocation => f.write_str("Use My Location"),
            MenuItem::AddToFavorites => f.write_str("Add to Favorites"),
            MenuItem::SelectFavorite(city) => write!(f, "{city}"),
            MenuItem::RemoveFavorite(city) => write!(f, "Remove {city}"),
            MenuItem::Quit => f.write_str("Quit"),
        }
    }
}

/// "Add to Favorites" is only offered while weather is on screen.
fn menu(has_weather: bool, favorites: &[String]) -> Vec<MenuItem> {
    let mut items = vec![MenuItem::GetWeather, MenuItem::UseMyLocation];
    if has_weather {
        items.push(MenuItem::AddToFavorites);
    }
    items.extend(favorites.iter().cloned().map(MenuItem::SelectFavorite));
    items.extend(favorites.iter().cloned().map(MenuItem::RemoveFavorite));
    items.push(MenuItem::Quit);
    items
}

/// `Ok(None)` when the user backed out of the prompt with Esc or Ctrl-C.
fn answered<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn run(mut session: WeatherSession) -> anyhow::Result<()> {
    print!("{}", render::dashboard(&session));

    loop {
        let state = session.state();
        let items = menu(state.weather.is_some(), session.favorites());

        let Some(choice) = answered(Select::new("What next?", items).prompt())? else {
            break;
        };

        match choice {
            MenuItem::GetWeather => {
                let prompt = Text::new("Enter city name:")
                    .with_initial_value(&state.query_city)
                    .prompt();
                let Some(city) = answered(prompt)? else {
                    continue;
                };
                session.set_query(&city);
                session.search().await;
            }
            MenuItem::UseMyLocation => {
                if let Err(e) = session.use_my_location().await {
                    eprintln!("{e}");
                    continue;
                }
            }
            MenuItem::AddToFavorites => {
                if let Err(e) = session.add_current_to_favorites() {
                    eprintln!("{e}");
                }
            }
            MenuItem::SelectFavorite(city) => session.select_favorite(&city).await,
            MenuItem::RemoveFavorite(city) => {
                if let Err(e) = session.remove_favorite(&city) {
                    eprintln!("{e}");
                }
            }
            MenuItem::Quit => break,
        }

        print!("{}", render::dashboard(&session));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_to_favorites_needs_weather() {
        assert!(!menu(false, &[]).contains(&MenuItem::AddToFavorites));
        assert!(menu(true, &[]).contains(&MenuItem::AddToFavorites));
    }

    #[test]
    fn each_favorite_can_be_selected_and_removed() {
        let items = menu(false, &["Tokyo".to_string()]);
        assert!(items.contains(&MenuItem::SelectFavorite("Tokyo".into())));
        assert!(items.contains(&MenuItem::RemoveFavorite("Tokyo".into())));
        assert_eq!(items.last(), Some(&MenuItem::Quit));
    }

    #[test]
    fn backing_out_of_a_prompt_is_not_an_error() {
        let canceled: Result<String, _> = Err(InquireError::OperationCanceled);
        assert!(answered(canceled).expect("canceled").is_none());

        let interrupted: Result<String, _> = Err(InquireError::OperationInterrupted);
        assert!(answered(interrupted).expect("interrupted").is_none());

        assert_eq!(answered(Ok("Oslo")).expect("answer"), Some("Oslo"));
        assert!(answered::<()>(Err(InquireError::NotTTY)).is_err());
    }
}

use anyhow::Result;
use chrono::Local;
use eta_core::{AoiType, Config, Dashboard, LocationTarget, NamedLocation, TrafficLabel};
use inquire::{CustomType, InquireError, Select, Text};
use std::fmt;

use crate::render;

/// Prompt for every setting, prefilled with the current values, then save.
pub fn configure(mut config: Config) -> Result<()> {
    let prediction_url = Text::new("Prediction service URL:")
        .with_default(config.prediction_url())
        .prompt()?;
    config.prediction_url = Some(prediction_url.trim().to_string());

    let weather_url = Text::new("Weather provider URL:")
        .with_default(config.weather_url())
        .prompt()?;
    config.weather_url = Some(weather_url.trim().to_string());

    let poll = CustomType::<u64>::new("Health poll interval (seconds):")
        .with_default(config.health_poll_interval().as_secs())
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;
    config.health_poll_secs = Some(poll);

    let start = Select::new("Default start:", preset_names()).prompt()?;
    config.default_start = Some(start);

    let destination = Select::new("Default destination:", preset_names()).prompt()?;
    config.default_destination = Some(destination);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn preset_names() -> Vec<String> {
    NamedLocation::presets().into_iter().map(|p| p.name).collect()
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Predict,
    ChangeStart,
    ChangeDestination,
    Traffic,
    Aoi,
    RefreshWeather,
    CheckHealth,
    History,
    Quit,
}

impl Action {
    const ALL: [Action; 9] = [
        Action::Predict,
        Action::ChangeStart,
        Action::ChangeDestination,
        Action::Traffic,
        Action::Aoi,
        Action::RefreshWeather,
        Action::CheckHealth,
        Action::History,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Predict => "Predict ETA",
            Action::ChangeStart => "Change start location",
            Action::ChangeDestination => "Change destination",
            Action::Traffic => "Set traffic condition",
            Action::Aoi => "Set AOI type",
            Action::RefreshWeather => "Refresh weather",
            Action::CheckHealth => "Check API health",
            Action::History => "Show prediction history",
            Action::Quit => "Quit",
        })
    }
}

enum LocationChoice {
    Preset(NamedLocation),
    Custom,
}

impl fmt::Display for LocationChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationChoice::Preset(loc) => write!(f, "{loc}"),
            LocationChoice::Custom => f.write_str("Custom coordinates..."),
        }
    }
}

/// Interactive loop over a single dashboard. Esc or Ctrl-C leaves it.
pub async fn session(mut dashboard: Dashboard) -> Result<()> {
    dashboard.check_health().await;
    dashboard.refresh_weather().await;
    render::summary(&dashboard);

    loop {
        let Some(action) = cancellable(Select::new("What next?", Action::ALL.to_vec()).prompt())?
        else {
            break;
        };

        match action {
            Action::Predict => {
                let mut rng = rand::thread_rng();
                let now = Local::now().naive_local();
                let prediction = dashboard.run_prediction(now, &mut rng).await;
                render::prediction(&prediction);
                render::factors(&dashboard.delay_factors());
            }
            Action::ChangeStart => {
                if pick_location(&mut dashboard, LocationTarget::Start)? {
                    println!("Start: {}", dashboard.start());
                }
            }
            Action::ChangeDestination => {
                if pick_location(&mut dashboard, LocationTarget::Destination)? {
                    println!("Destination: {}", dashboard.destination());
                    dashboard.refresh_weather().await;
                    render::weather(dashboard.weather());
                }
            }
            Action::Traffic => {
                let options = TrafficLabel::all().to_vec();
                if let Some(t) = cancellable(Select::new("Traffic condition:", options).prompt())? {
                    dashboard.set_traffic(t);
                }
            }
            Action::Aoi => {
                let options = AoiType::all().to_vec();
                if let Some(a) = cancellable(Select::new("AOI type:", options).prompt())? {
                    dashboard.set_aoi(a);
                }
            }
            Action::RefreshWeather => {
                dashboard.refresh_weather().await;
                render::weather(dashboard.weather());
            }
            Action::CheckHealth => {
                println!("{}", dashboard.check_health().await.as_str());
            }
            Action::History => render::history(dashboard.history()),
            Action::Quit => break,
        }
    }

    Ok(())
}

/// Returns whether the selection changed.
fn pick_location(dashboard: &mut Dashboard, target: LocationTarget) -> Result<bool> {
    let mut options: Vec<LocationChoice> =
        NamedLocation::presets().into_iter().map(LocationChoice::Preset).collect();
    options.push(LocationChoice::Custom);

    let Some(choice) = cancellable(Select::new("Location:", options).prompt())? else {
        return Ok(false);
    };

    match choice {
        LocationChoice::Preset(loc) => {
            dashboard.select(target, loc);
            Ok(true)
        }
        LocationChoice::Custom => {
            let lat = Text::new("Latitude:").with_placeholder("30.3753").prompt()?;
            let lng = Text::new("Longitude:").with_placeholder("69.3451").prompt()?;
            let name = Text::new("Name (optional):").prompt()?;

            Ok(apply_custom(dashboard, target, &lat, &lng, &name))
        }
    }
}

/// Apply typed coordinates, reporting a rejection instead of failing the session.
fn apply_custom(
    dashboard: &mut Dashboard,
    target: LocationTarget,
    lat: &str,
    lng: &str,
    name: &str,
) -> bool {
    match dashboard.apply_custom_location(target, lat, lng, name) {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(?target, lat, lng, "custom location rejected: {err}");
            println!("✗ {err}");
            false
        }
    }
}

fn cancellable<T>(answer: Result<T, InquireError>) -> Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard::from_config(&Config::default()).expect("default config")
    }

    #[test]
    fn rejected_custom_location_keeps_selection() {
        let mut d = dashboard();
        let before = d.destination().clone();

        assert!(!apply_custom(&mut d, LocationTarget::Destination, "95", "10", ""));
        assert!(!apply_custom(&mut d, LocationTarget::Destination, "10", "200", ""));
        assert!(!apply_custom(&mut d, LocationTarget::Destination, "abc", "10", ""));
        assert_eq!(d.destination(), &before);
    }

    #[test]
    fn accepted_custom_location_replaces_start() {
        let mut d = dashboard();

        assert!(apply_custom(&mut d, LocationTarget::Start, "24.9", "67.1", "Depot"));
        assert_eq!(d.start().name, "Depot");
    }
}

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use eta_core::{
    AoiType, Config, Dashboard, HealthStatus, MapView, NamedLocation, TrafficLabel, distance_km,
    fetch_weather, provider::provider_from_config,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "eta", version, about = "Delivery ETA prediction dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure service endpoints and default locations.
    Configure,

    /// List the preset locations.
    Presets,

    /// Great-circle distance between two locations.
    Distance {
        /// Preset name or "lat,lng[,name]".
        from: NamedLocation,
        /// Preset name or "lat,lng[,name]".
        to: NamedLocation,
    },

    /// Show current weather and its label for a location.
    Weather {
        /// Preset name or "lat,lng[,name]".
        location: NamedLocation,
    },

    /// Check the prediction service health.
    Health {
        /// Keep polling on the configured interval.
        #[arg(long)]
        watch: bool,
    },

    /// Request an ETA prediction for a route.
    Predict {
        /// Start location; defaults to the configured start.
        from: Option<NamedLocation>,

        /// Destination; defaults to the configured destination.
        to: Option<NamedLocation>,

        /// Traffic condition: light, normal, heavy or congested.
        #[arg(long, value_parser = parse_traffic, default_value = "normal")]
        traffic: TrafficLabel,

        /// Area of interest: residential, commercial, industrial (or 1-3).
        #[arg(long, value_parser = parse_aoi, default_value = "residential")]
        aoi: AoiType,

        /// Print the request payload instead of sending it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Interactive session: pick locations, refresh weather, run predictions.
    Dashboard,
}

fn parse_traffic(s: &str) -> Result<TrafficLabel, String> {
    TrafficLabel::try_from(s).map_err(|e| e.to_string())
}

fn parse_aoi(s: &str) -> Result<AoiType, String> {
    AoiType::try_from(s).map_err(|e| e.to_string())
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::load()?;
    tracing::debug!(
        prediction_url = config.prediction_url(),
        weather_url = config.weather_url(),
        "configuration loaded"
    );
    Ok(config)
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_with(load_config).await
    }

    /// Dispatch the command. `load_config` is only called by commands that
    /// talk to a service or edit settings.
    async fn run_with<F>(self, load_config: F) -> anyhow::Result<()>
    where
        F: FnOnce() -> anyhow::Result<Config>,
    {
        match self.command {
            Command::Configure => interactive::configure(load_config()?)?,
            Command::Presets => {
                for preset in NamedLocation::presets() {
                    println!("{preset}");
                }
            }
            Command::Distance { from, to } => {
                println!(
                    "{} → {}: {:.2} km",
                    from.name,
                    to.name,
                    distance_km(from.coord, to.coord)
                );
                println!("Map: {}", MapView::for_route(&from, &to).embed_url());
            }
            Command::Weather { location } => {
                let provider = provider_from_config(&load_config()?);
                let reading = fetch_weather(provider.as_ref(), location.coord).await;
                println!("{location}");
                render::weather(&reading);
            }
            Command::Health { watch } => {
                let config = load_config()?;
                let mut dashboard = Dashboard::from_config(&config)?;
                if watch {
                    let mut ticker = tokio::time::interval(config.health_poll_interval());
                    loop {
                        ticker.tick().await;
                        let status = dashboard.check_health().await;
                        println!("{} {}", Local::now().format("%H:%M:%S"), status.as_str());
                    }
                }
                let status = dashboard.check_health().await;
                println!("{}", status.as_str());
                if status != HealthStatus::Healthy {
                    println!("Prediction service at {} is not reachable.", config.prediction_url());
                }
            }
            Command::Predict { from, to, traffic, aoi, dry_run } => {
                let mut dashboard = Dashboard::from_config(&load_config()?)?;
                if let Some(from) = from {
                    dashboard.select_start(from);
                }
                if let Some(to) = to {
                    dashboard.select_destination(to);
                }
                dashboard.set_traffic(traffic);
                dashboard.set_aoi(aoi);

                dashboard.refresh_weather().await;
                let now = Local::now().naive_local();
                let mut rng = rand::thread_rng();

                if dry_run {
                    let payload = dashboard.build_payload(now, &mut rng);
                    let json = serde_json::to_string_pretty(&payload)
                        .context("Failed to serialize prediction payload")?;
                    println!("{json}");
                    return Ok(());
                }

                dashboard.check_health().await;
                dashboard.run_prediction(now, &mut rng).await;
                render::summary(&dashboard);
            }
            Command::Dashboard => {
                let dashboard = Dashboard::from_config(&load_config()?)?;
                interactive::session(dashboard).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_predict_arguments() {
        let cli = Cli::try_parse_from([
            "eta", "predict", "lahore", "33.6,73.0,Depot", "--traffic", "heavy", "--aoi", "2",
        ])
        .expect("valid arguments");

        match cli.command {
            Command::Predict { from, to, traffic, aoi, dry_run } => {
                assert_eq!(from.map(|l| l.name), Some("Lahore".to_string()));
                assert_eq!(to.map(|l| l.name), Some("Depot".to_string()));
                assert_eq!(traffic, TrafficLabel::Heavy);
                assert_eq!(aoi, AoiType::Commercial);
                assert!(!dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_location() {
        let err = Cli::try_parse_from(["eta", "weather", "95,10"]).unwrap_err();
        assert!(err.to_string().contains("Latitude must be between -90 and 90"));
    }

    #[tokio::test]
    async fn offline_commands_skip_config() {
        let broken = || -> anyhow::Result<Config> { Err(anyhow::anyhow!("bad config.toml")) };

        let presets = Cli::try_parse_from(["eta", "presets"]).expect("valid arguments");
        assert!(presets.run_with(broken).await.is_ok());

        let distance =
            Cli::try_parse_from(["eta", "distance", "lahore", "karachi"]).expect("valid arguments");
        assert!(distance.run_with(broken).await.is_ok());
    }

    #[tokio::test]
    async fn service_commands_report_config_errors() {
        let cli = Cli::try_parse_from(["eta", "weather", "lahore"]).expect("valid arguments");
        let err = cli
            .run_with(|| Err(anyhow::anyhow!("Failed to parse config file")))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn predict_defaults() {
        let cli = Cli::try_parse_from(["eta", "predict"]).expect("valid arguments");
        match cli.command {
            Command::Predict { from, to, traffic, aoi, .. } => {
                assert!(from.is_none() && to.is_none());
                assert_eq!(traffic, TrafficLabel::Normal);
                assert_eq!(aoi, AoiType::Residential);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

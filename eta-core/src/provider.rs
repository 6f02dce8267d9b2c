use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    classifier::classify,
    model::{Coordinate, WeatherObservation, WeatherReading, WeatherSource},
    provider::open_meteo::OpenMeteoProvider,
};

pub mod open_meteo;

/// Source of current conditions for a coordinate.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, coord: Coordinate) -> anyhow::Result<WeatherObservation>;
}

/// Construct the weather provider for the configured endpoint.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(OpenMeteoProvider::with_base_url(config.weather_url()))
}

/// Fetch and classify current conditions. Never fails: any provider error
/// yields [`WeatherReading::fallback`].
pub async fn fetch_weather(provider: &dyn WeatherProvider, coord: Coordinate) -> WeatherReading {
    match provider.current(coord).await {
        Ok(observation) => {
            let label = classify(&observation);
            tracing::debug!(
                lat = coord.latitude,
                lng = coord.longitude,
                %label,
                "weather observation classified"
            );
            WeatherReading { observation, label, source: WeatherSource::Live }
        }
        Err(err) => {
            tracing::warn!(
                lat = coord.latitude,
                lng = coord.longitude,
                "Error fetching weather data, using defaults: {err:#}"
            );
            WeatherReading::fallback()
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

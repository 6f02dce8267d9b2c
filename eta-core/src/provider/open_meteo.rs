use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Coordinate, WeatherObservation};

use super::{WeatherProvider, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str = "relative_humidity_2m,cloud_cover,cloud_cover_low,wind_speed_10m,\
                              wind_gusts_10m,precipitation,shortwave_radiation,is_day";

/// Current conditions from Open-Meteo. No API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    async fn fetch_current(&self, coord: Coordinate) -> Result<WeatherObservation> {
        tracing::debug!(
            url = %self.base_url,
            lat = coord.latitude,
            lng = coord.longitude,
            "requesting current weather"
        );

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", coord.latitude.to_string()),
                ("longitude", coord.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo JSON")?;

        let current = parsed
            .current
            .ok_or_else(|| anyhow!("Open-Meteo response contained no current conditions"))?;

        Ok(current.into())
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current: Option<OmCurrent>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    relative_humidity_2m: f64,
    cloud_cover: f64,
    #[serde(default)]
    cloud_cover_low: Option<f64>,
    wind_speed_10m: f64,
    #[serde(default)]
    wind_gusts_10m: Option<f64>,
    precipitation: f64,
    #[serde(default)]
    shortwave_radiation: Option<f64>,
    is_day: u8,
}

impl From<OmCurrent> for WeatherObservation {
    fn from(c: OmCurrent) -> Self {
        Self {
            humidity_pct: c.relative_humidity_2m,
            cloud_cover_pct: c.cloud_cover,
            cloud_cover_low_pct: c.cloud_cover_low.unwrap_or(0.0),
            wind_speed_kmh: c.wind_speed_10m,
            wind_gusts_kmh: c.wind_gusts_10m.unwrap_or(0.0),
            precipitation_mm: c.precipitation,
            shortwave_radiation: c.shortwave_radiation.unwrap_or(0.0),
            is_daytime: c.is_day == 1,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current(&self, coord: Coordinate) -> Result<WeatherObservation> {
        self.fetch_current(coord).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_current_block() {
        let body = r#"{
            "latitude": 33.7,
            "longitude": 73.05,
            "current_units": { "relative_humidity_2m": "%" },
            "current": {
                "time": "2026-10-18T14:00",
                "interval": 900,
                "relative_humidity_2m": 41,
                "cloud_cover": 12,
                "cloud_cover_low": 3,
                "wind_speed_10m": 9.4,
                "wind_gusts_10m": 20.2,
                "precipitation": 0.0,
                "shortwave_radiation": 612.0,
                "is_day": 1
            }
        }"#;

        let parsed: OmResponse = serde_json::from_str(body).expect("valid body");
        let obs: WeatherObservation = parsed.current.expect("current block").into();

        assert_eq!(obs.humidity_pct, 41.0);
        assert_eq!(obs.cloud_cover_low_pct, 3.0);
        assert_eq!(obs.wind_gusts_kmh, 20.2);
        assert_eq!(obs.shortwave_radiation, 612.0);
        assert!(obs.is_daytime);
    }

    #[test]
    fn optional_fields_default_to_zero() {
        let body = r#"{
            "current": {
                "relative_humidity_2m": 80,
                "cloud_cover": 100,
                "wind_speed_10m": 4.0,
                "precipitation": 0.2,
                "is_day": 0
            }
        }"#;

        let parsed: OmResponse = serde_json::from_str(body).expect("valid body");
        let obs: WeatherObservation = parsed.current.expect("current block").into();

        assert_eq!(obs.cloud_cover_low_pct, 0.0);
        assert_eq!(obs.wind_gusts_kmh, 0.0);
        assert_eq!(obs.shortwave_radiation, 0.0);
        assert!(!obs.is_daytime);
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        let body = r#"{ "current": { "cloud_cover": 10, "is_day": 1 } }"#;
        assert!(serde_json::from_str::<OmResponse>(body).is_err());
    }
}

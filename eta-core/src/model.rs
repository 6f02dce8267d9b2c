use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};

use crate::error::LocationError;

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Checked constructor: latitude in [-90, 90], longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(LocationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Parse user-entered text for both axes, then range-check.
    pub fn parse(lat: &str, lng: &str) -> Result<Self, LocationError> {
        let latitude = parse_degrees(lat)?;
        let longitude = parse_degrees(lng)?;
        Self::new(latitude, longitude)
    }
}

fn parse_degrees(raw: &str) -> Result<f64, LocationError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LocationError::NotANumber(trimmed.to_string()))
}

/// A coordinate with a display name, either a preset city or a custom pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLocation {
    pub name: String,
    pub coord: Coordinate,
}

impl NamedLocation {
    /// Build a custom location from raw text. An empty name becomes
    /// `Custom (lat, lng)` with two decimals.
    pub fn custom(lat: &str, lng: &str, name: &str) -> Result<Self, LocationError> {
        let coord = Coordinate::parse(lat, lng)?;
        let name = match name.trim() {
            "" => format!("Custom ({:.2}, {:.2})", coord.latitude, coord.longitude),
            other => other.to_string(),
        };
        Ok(Self { name, coord })
    }

    /// Case-insensitive lookup in the preset list.
    pub fn preset(name: &str) -> Option<Self> {
        PRESETS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .map(Preset::to_location)
    }

    pub fn presets() -> Vec<Self> {
        PRESETS.iter().map(Preset::to_location).collect()
    }
}

impl fmt::Display for NamedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.4}°, {:.4}°)",
            self.name, self.coord.latitude, self.coord.longitude
        )
    }
}

/// Accepts a preset name or `lat,lng[,name]`.
impl FromStr for NamedLocation {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(preset) = Self::preset(s) {
            return Ok(preset);
        }

        let mut parts = s.splitn(3, ',');
        match (parts.next(), parts.next()) {
            (Some(lat), Some(lng)) => Self::custom(lat, lng, parts.next().unwrap_or("")),
            _ => Err(LocationError::Unknown(s.trim().to_string())),
        }
    }
}

struct Preset {
    name: &'static str,
    lat: f64,
    lng: f64,
}

impl Preset {
    fn to_location(&self) -> NamedLocation {
        NamedLocation {
            name: self.name.to_string(),
            coord: Coordinate { latitude: self.lat, longitude: self.lng },
        }
    }
}

const PRESETS: &[Preset] = &[
    Preset { name: "Lahore", lat: 31.5204, lng: 74.3587 },
    Preset { name: "Islamabad", lat: 33.6844, lng: 73.0479 },
    Preset { name: "Karachi", lat: 24.8607, lng: 67.0011 },
    Preset { name: "Faisalabad", lat: 31.4182, lng: 73.0792 },
    Preset { name: "Sargodha", lat: 32.0836, lng: 72.6711 },
];

/// Current conditions as reported by the weather provider. Wind values are km/h.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub humidity_pct: f64,
    pub cloud_cover_pct: f64,
    pub cloud_cover_low_pct: f64,
    pub wind_speed_kmh: f64,
    pub wind_gusts_kmh: f64,
    pub precipitation_mm: f64,
    pub shortwave_radiation: f64,
    pub is_daytime: bool,
}

impl WeatherObservation {
    /// Placeholder shown before the first fetch completes.
    pub const fn empty() -> Self {
        Self {
            humidity_pct: 0.0,
            cloud_cover_pct: 0.0,
            cloud_cover_low_pct: 0.0,
            wind_speed_kmh: 0.0,
            wind_gusts_kmh: 0.0,
            precipitation_mm: 0.0,
            shortwave_radiation: 0.0,
            is_daytime: true,
        }
    }

    /// Substituted whenever the provider cannot be reached or understood.
    pub const fn fallback() -> Self {
        Self {
            humidity_pct: 65.0,
            cloud_cover_pct: 30.0,
            cloud_cover_low_pct: 20.0,
            wind_speed_kmh: 12.0,
            wind_gusts_kmh: 15.0,
            precipitation_mm: 0.0,
            shortwave_radiation: 500.0,
            is_daytime: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherLabel {
    Foggy,
    Stormy,
    Sandstorm,
    Cloudy,
    Windy,
    Rainy,
    Sunny,
    Clear,
}

impl WeatherLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherLabel::Foggy => "Foggy",
            WeatherLabel::Stormy => "Stormy",
            WeatherLabel::Sandstorm => "Sandstorm",
            WeatherLabel::Cloudy => "Cloudy",
            WeatherLabel::Windy => "Windy",
            WeatherLabel::Rainy => "Rainy",
            WeatherLabel::Sunny => "Sunny",
            WeatherLabel::Clear => "Clear",
        }
    }
}

impl fmt::Display for WeatherLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a weather reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherSource {
    Initial,
    Live,
    Fallback,
}

/// An observation together with its derived label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    pub observation: WeatherObservation,
    pub label: WeatherLabel,
    pub source: WeatherSource,
}

impl WeatherReading {
    pub const fn initial() -> Self {
        Self {
            observation: WeatherObservation::empty(),
            label: WeatherLabel::Clear,
            source: WeatherSource::Initial,
        }
    }

    pub const fn fallback() -> Self {
        Self {
            observation: WeatherObservation::fallback(),
            label: WeatherLabel::Clear,
            source: WeatherSource::Fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrafficLabel {
    Light,
    #[default]
    Normal,
    Heavy,
    Congested,
}

impl TrafficLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficLabel::Light => "Light",
            TrafficLabel::Normal => "Normal",
            TrafficLabel::Heavy => "Heavy",
            TrafficLabel::Congested => "Congested",
        }
    }

    pub const fn all() -> &'static [TrafficLabel] {
        &[
            TrafficLabel::Light,
            TrafficLabel::Normal,
            TrafficLabel::Heavy,
            TrafficLabel::Congested,
        ]
    }
}

impl fmt::Display for TrafficLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TrafficLabel {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        TrafficLabel::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown traffic condition '{value}'. Supported: light, normal, heavy, congested."
                )
            })
    }
}

/// Zoning context of the destination. Sent to the prediction service as its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AoiType {
    #[default]
    Residential,
    Commercial,
    Industrial,
}

impl AoiType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AoiType::Residential => "Residential",
            AoiType::Commercial => "Commercial",
            AoiType::Industrial => "Industrial",
        }
    }

    pub const fn code(&self) -> u8 {
        match self {
            AoiType::Residential => 1,
            AoiType::Commercial => 2,
            AoiType::Industrial => 3,
        }
    }

    pub const fn all() -> &'static [AoiType] {
        &[AoiType::Residential, AoiType::Commercial, AoiType::Industrial]
    }
}

impl fmt::Display for AoiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AoiType> for u8 {
    fn from(value: AoiType) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for AoiType {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        AoiType::all()
            .iter()
            .copied()
            .find(|a| a.code() == value)
            .ok_or_else(|| anyhow::anyhow!("Unknown AOI code {value}. Supported: 1, 2, 3."))
    }
}

impl TryFrom<&str> for AoiType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if let Ok(code) = value.parse::<u8>() {
            return AoiType::try_from(code);
        }

        AoiType::all()
            .iter()
            .copied()
            .find(|a| a.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown AOI type '{value}'. Supported: residential, commercial, industrial."
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_location_rejects_out_of_range() {
        assert_eq!(
            NamedLocation::custom("95", "10", "").unwrap_err(),
            LocationError::LatitudeOutOfRange(95.0)
        );
        assert_eq!(
            NamedLocation::custom("10", "200", "").unwrap_err(),
            LocationError::LongitudeOutOfRange(200.0)
        );
    }

    #[test]
    fn custom_location_rejects_garbage() {
        let err = NamedLocation::custom("north", "10", "").unwrap_err();
        assert!(matches!(err, LocationError::NotANumber(_)));

        let err = NamedLocation::custom("NaN", "10", "").unwrap_err();
        assert!(matches!(err, LocationError::NotANumber(_)));
    }

    #[test]
    fn custom_location_default_name() {
        let loc = NamedLocation::custom(" 30.3753 ", "69.3451", "  ").expect("valid");
        assert_eq!(loc.name, "Custom (30.38, 69.35)");
        assert_eq!(loc.coord, Coordinate { latitude: 30.3753, longitude: 69.3451 });
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn parse_location_from_preset_or_coordinates() {
        let lahore: NamedLocation = "lahore".parse().expect("preset");
        assert_eq!(lahore.name, "Lahore");

        let depot: NamedLocation = "31.5,74.3,Depot".parse().expect("coordinates");
        assert_eq!(depot.name, "Depot");
        assert_eq!(depot.coord.latitude, 31.5);

        let err = "Atlantis".parse::<NamedLocation>().unwrap_err();
        assert_eq!(err, LocationError::Unknown("Atlantis".into()));
    }

    #[test]
    fn aoi_serializes_as_code() {
        let json = serde_json::to_string(&AoiType::Commercial).expect("serialize");
        assert_eq!(json, "2");

        let back: AoiType = serde_json::from_str("3").expect("deserialize");
        assert_eq!(back, AoiType::Industrial);
        assert!(serde_json::from_str::<AoiType>("7").is_err());
    }

    #[test]
    fn traffic_and_aoi_parse_case_insensitively() {
        assert_eq!(TrafficLabel::try_from("HEAVY").unwrap(), TrafficLabel::Heavy);
        assert!(TrafficLabel::try_from("gridlock").is_err());
        assert_eq!(AoiType::try_from("industrial").unwrap(), AoiType::Industrial);
        assert_eq!(AoiType::try_from("2").unwrap(), AoiType::Commercial);
    }
}

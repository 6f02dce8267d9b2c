//! Core library for the `eta` CLI.
//!
//! This crate defines:
//! - Domain models (locations, weather, prediction payloads and results)
//! - Weather classification and great-circle distance
//! - Adapters for the weather provider and the prediction service
//! - The dashboard state container tying them together
//!
//! It is used by `eta-cli`, but can also be reused by other binaries or services.

pub mod classifier;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod factors;
pub mod geo;
pub mod history;
pub mod model;
pub mod payload;
pub mod prediction;
pub mod provider;

pub use classifier::classify;
pub use config::Config;
pub use dashboard::{Dashboard, HealthStatus, LocationTarget};
pub use error::LocationError;
pub use factors::DelayFactors;
pub use geo::{MapView, distance_km};
pub use history::PredictionHistory;
pub use model::{
    AoiType, Coordinate, NamedLocation, TrafficLabel, WeatherLabel, WeatherObservation,
    WeatherReading, WeatherSource,
};
pub use payload::{PredictionRequestPayload, build_payload};
pub use prediction::{HttpPredictionService, Prediction, PredictionResult, PredictionService};
pub use provider::{WeatherProvider, fetch_weather, provider_from_config};

//! Session state for the ETA dashboard.
//!
//! All mutable state lives in [`Dashboard`] and changes only through its
//! methods. Network work is split into `begin_*` / `finish_*` halves: each
//! dispatch is stamped with a generation, and a response is applied only if
//! no newer request was dispatched in the meantime.

use chrono::NaiveDateTime;
use rand::Rng;
use std::sync::Arc;

use crate::{
    Config,
    error::LocationError,
    factors::DelayFactors,
    geo::{MapView, distance_km},
    history::PredictionHistory,
    model::{AoiType, Coordinate, NamedLocation, TrafficLabel, WeatherReading},
    payload::{PayloadInputs, PredictionRequestPayload, build_payload},
    prediction::{HttpPredictionService, Prediction, PredictionService, submit},
    provider::{WeatherProvider, fetch_weather, provider_from_config},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationTarget {
    Start,
    Destination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Checking,
    Healthy,
    Offline,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Checking => "Checking...",
            HealthStatus::Healthy => "API Connected",
            HealthStatus::Offline => "API Offline",
        }
    }
}

/// Handle for an in-flight weather fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherTicket {
    generation: u64,
    pub coord: Coordinate,
}

/// Handle for an in-flight prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionTicket {
    generation: u64,
}

#[derive(Debug)]
pub struct Dashboard {
    weather_provider: Arc<dyn WeatherProvider>,
    prediction_service: Arc<dyn PredictionService>,

    start: NamedLocation,
    destination: NamedLocation,
    weather: WeatherReading,
    traffic: TrafficLabel,
    aoi: AoiType,
    health: HealthStatus,

    last: Option<Prediction>,
    history: PredictionHistory,

    weather_generation: u64,
    weather_loading: bool,
    prediction_generation: u64,
    prediction_loading: bool,
}

impl Dashboard {
    pub fn new(
        weather_provider: Arc<dyn WeatherProvider>,
        prediction_service: Arc<dyn PredictionService>,
        start: NamedLocation,
        destination: NamedLocation,
    ) -> Self {
        Self {
            weather_provider,
            prediction_service,
            start,
            destination,
            weather: WeatherReading::initial(),
            traffic: TrafficLabel::default(),
            aoi: AoiType::default(),
            health: HealthStatus::Checking,
            last: None,
            history: PredictionHistory::default(),
            weather_generation: 0,
            weather_loading: false,
            prediction_generation: 0,
            prediction_loading: false,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(config));
        let service = Arc::new(HttpPredictionService::from_config(config));

        Ok(Self::new(
            provider,
            service,
            config.start_location()?,
            config.destination_location()?,
        ))
    }

    pub fn start(&self) -> &NamedLocation {
        &self.start
    }

    pub fn destination(&self) -> &NamedLocation {
        &self.destination
    }

    pub fn weather(&self) -> &WeatherReading {
        &self.weather
    }

    pub fn traffic(&self) -> TrafficLabel {
        self.traffic
    }

    pub fn aoi(&self) -> AoiType {
        self.aoi
    }

    pub fn health(&self) -> HealthStatus {
        self.health
    }

    pub fn last_prediction(&self) -> Option<&Prediction> {
        self.last.as_ref()
    }

    pub fn history(&self) -> &PredictionHistory {
        &self.history
    }

    pub fn is_weather_loading(&self) -> bool {
        self.weather_loading
    }

    pub fn is_prediction_loading(&self) -> bool {
        self.prediction_loading
    }

    pub fn weather_provider(&self) -> Arc<dyn WeatherProvider> {
        Arc::clone(&self.weather_provider)
    }

    pub fn prediction_service(&self) -> Arc<dyn PredictionService> {
        Arc::clone(&self.prediction_service)
    }

    pub fn select_start(&mut self, location: NamedLocation) {
        self.start = location;
    }

    /// Replace the destination. Weather is not refreshed here; callers
    /// follow up with [`Dashboard::refresh_weather`].
    pub fn select_destination(&mut self, location: NamedLocation) {
        self.destination = location;
    }

    pub fn select(&mut self, target: LocationTarget, location: NamedLocation) {
        match target {
            LocationTarget::Start => self.select_start(location),
            LocationTarget::Destination => self.select_destination(location),
        }
    }

    /// Validate user-entered coordinates and, only if they are valid, apply them.
    pub fn apply_custom_location(
        &mut self,
        target: LocationTarget,
        lat: &str,
        lng: &str,
        name: &str,
    ) -> Result<&NamedLocation, LocationError> {
        let location = NamedLocation::custom(lat, lng, name)?;
        self.select(target, location);

        Ok(match target {
            LocationTarget::Start => &self.start,
            LocationTarget::Destination => &self.destination,
        })
    }

    pub fn set_traffic(&mut self, traffic: TrafficLabel) {
        self.traffic = traffic;
    }

    pub fn set_aoi(&mut self, aoi: AoiType) {
        self.aoi = aoi;
    }

    pub fn distance_km(&self) -> f64 {
        distance_km(self.start.coord, self.destination.coord)
    }

    pub fn map_view(&self) -> MapView {
        MapView::for_route(&self.start, &self.destination)
    }

    pub fn delay_factors(&self) -> DelayFactors {
        DelayFactors::compute(
            &self.start,
            &self.destination,
            &self.weather.observation,
            self.traffic,
        )
    }

    pub fn begin_weather_fetch(&mut self) -> WeatherTicket {
        self.weather_generation += 1;
        self.weather_loading = true;
        WeatherTicket {
            generation: self.weather_generation,
            coord: self.destination.coord,
        }
    }

    /// Apply a reading if `ticket` is the latest weather dispatch. Returns
    /// whether the reading was applied.
    pub fn finish_weather_fetch(&mut self, ticket: WeatherTicket, reading: WeatherReading) -> bool {
        if ticket.generation != self.weather_generation {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.weather_generation,
                "discarding stale weather reading"
            );
            return false;
        }

        self.weather = reading;
        self.weather_loading = false;
        true
    }

    /// Fetch weather for the current destination.
    pub async fn refresh_weather(&mut self) -> &WeatherReading {
        let ticket = self.begin_weather_fetch();
        let provider = self.weather_provider();
        let reading = fetch_weather(provider.as_ref(), ticket.coord).await;
        self.finish_weather_fetch(ticket, reading);
        &self.weather
    }

    pub fn build_payload<R: Rng + ?Sized>(
        &self,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> PredictionRequestPayload {
        build_payload(
            PayloadInputs {
                start: &self.start,
                end: &self.destination,
                weather: &self.weather,
                traffic: self.traffic,
                aoi: self.aoi,
            },
            now,
            rng,
        )
    }

    pub fn begin_prediction<R: Rng + ?Sized>(
        &mut self,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> (PredictionTicket, PredictionRequestPayload) {
        self.prediction_generation += 1;
        self.prediction_loading = true;

        let ticket = PredictionTicket { generation: self.prediction_generation };
        (ticket, self.build_payload(now, rng))
    }

    /// Record a prediction in history. It becomes the displayed result only
    /// if `ticket` is the latest prediction dispatch; returns whether it did.
    pub fn finish_prediction(&mut self, ticket: PredictionTicket, prediction: Prediction) -> bool {
        self.history.record(prediction.clone());

        if ticket.generation != self.prediction_generation {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.prediction_generation,
                "stale prediction kept in history only"
            );
            return false;
        }

        self.last = Some(prediction);
        self.prediction_loading = false;
        true
    }

    /// Build a payload from the current state, submit it and record the outcome.
    pub async fn run_prediction<R: Rng + ?Sized>(
        &mut self,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Prediction {
        let (ticket, payload) = self.begin_prediction(now, rng);
        let service = self.prediction_service();
        let prediction = submit(service.as_ref(), &payload, rng).await;
        self.finish_prediction(ticket, prediction.clone());
        prediction
    }

    pub async fn check_health(&mut self) -> HealthStatus {
        let status = match self.prediction_service.health().await {
            Ok(()) => HealthStatus::Healthy,
            Err(err) => {
                tracing::debug!("health check failed: {err:#}");
                HealthStatus::Offline
            }
        };

        if status != self.health {
            tracing::info!(from = ?self.health, to = ?status, "prediction service health changed");
        }
        self.health = status;
        status
    }
}

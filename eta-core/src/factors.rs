use crate::{
    classifier::KMH_PER_MS,
    geo::distance_km,
    model::{NamedLocation, TrafficLabel, WeatherObservation},
};

/// Relative weight of each delay driver for a route, on loosely 0..100 scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayFactors {
    pub distance: f64,
    pub weather: f64,
    pub traffic: f64,
    pub wind: f64,
    pub rain: f64,
}

impl DelayFactors {
    pub fn compute(
        start: &NamedLocation,
        end: &NamedLocation,
        weather: &WeatherObservation,
        traffic: TrafficLabel,
    ) -> Self {
        Self {
            distance: distance_km(start.coord, end.coord) * 10.0,
            weather: weather.cloud_cover_pct,
            traffic: traffic_score(traffic),
            wind: weather.wind_speed_kmh / KMH_PER_MS * 10.0,
            rain: weather.precipitation_mm * 20.0,
        }
    }

    pub fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("Distance", self.distance),
            ("Weather", self.weather),
            ("Traffic", self.traffic),
            ("Wind", self.wind),
            ("Rain", self.rain),
        ]
    }
}

fn traffic_score(traffic: TrafficLabel) -> f64 {
    match traffic {
        TrafficLabel::Heavy => 80.0,
        TrafficLabel::Congested => 95.0,
        TrafficLabel::Light | TrafficLabel::Normal => 40.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_follow_inputs() {
        let here = NamedLocation::preset("Lahore").expect("preset");
        let obs = WeatherObservation {
            cloud_cover_pct: 55.0,
            wind_speed_kmh: 18.0,
            precipitation_mm: 1.5,
            ..WeatherObservation::empty()
        };

        let f = DelayFactors::compute(&here, &here, &obs, TrafficLabel::Congested);

        assert_eq!(f.distance, 0.0);
        assert_eq!(f.weather, 55.0);
        assert_eq!(f.traffic, 95.0);
        assert!((f.wind - 50.0).abs() < 1e-9);
        assert_eq!(f.rain, 30.0);
        assert_eq!(f.named()[2], ("Traffic", 95.0));
    }

    #[test]
    fn traffic_scores() {
        assert_eq!(traffic_score(TrafficLabel::Light), 40.0);
        assert_eq!(traffic_score(TrafficLabel::Normal), 40.0);
        assert_eq!(traffic_score(TrafficLabel::Heavy), 80.0);
    }
}

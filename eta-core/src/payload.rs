use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::{
    geo::distance_km,
    model::{AoiType, NamedLocation, TrafficLabel, WeatherLabel, WeatherReading},
};

/// Order ids are drawn from this range; collisions are possible.
pub const ORDER_ID_RANGE: std::ops::Range<u32> = 1000..11000;

/// Request body of the prediction service. Field names carry their units
/// and must match the service's feature names exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequestPayload {
    pub order_id: u32,
    pub distance_km: f64,
    #[serde(rename = "relative_humidity_2m (%)")]
    pub relative_humidity_pct: f64,
    #[serde(rename = "cloud_cover (%)")]
    pub cloud_cover_pct: f64,
    #[serde(rename = "wind_speed_10m (km/h)")]
    pub wind_speed_kmh: f64,
    #[serde(rename = "precipitation (mm)")]
    pub precipitation_mm: f64,
    pub accept_hour_sin: f64,
    pub accept_hour_cos: f64,
    pub accept_dow_sin: f64,
    pub accept_dow_cos: f64,
    #[serde(rename = "Weather_Label")]
    pub weather_label: WeatherLabel,
    #[serde(rename = "Traffic_Label")]
    pub traffic_label: TrafficLabel,
    pub city: String,
    pub aoi_type: AoiType,
}

/// Hour-of-day and day-of-week mapped onto the unit circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclicalTime {
    pub hour_sin: f64,
    pub hour_cos: f64,
    pub dow_sin: f64,
    pub dow_cos: f64,
}

impl CyclicalTime {
    /// `hour` in 0..24, `dow` in 0..7 with Sunday = 0.
    pub fn encode(hour: u32, dow: u32) -> Self {
        let (hour_sin, hour_cos) = cyclical(hour, 24);
        let (dow_sin, dow_cos) = cyclical(dow, 7);
        Self { hour_sin, hour_cos, dow_sin, dow_cos }
    }

    pub fn at(now: NaiveDateTime) -> Self {
        Self::encode(now.hour(), now.weekday().num_days_from_sunday())
    }
}

fn cyclical(value: u32, period: u32) -> (f64, f64) {
    let angle = 2.0 * PI * f64::from(value) / f64::from(period);
    (angle.sin(), angle.cos())
}

/// Everything a prediction request is built from.
#[derive(Debug, Clone, Copy)]
pub struct PayloadInputs<'a> {
    pub start: &'a NamedLocation,
    pub end: &'a NamedLocation,
    pub weather: &'a WeatherReading,
    pub traffic: TrafficLabel,
    pub aoi: AoiType,
}

pub fn build_payload<R: Rng + ?Sized>(
    inputs: PayloadInputs<'_>,
    now: NaiveDateTime,
    rng: &mut R,
) -> PredictionRequestPayload {
    let distance = distance_km(inputs.start.coord, inputs.end.coord);
    let time = CyclicalTime::at(now);
    let obs = &inputs.weather.observation;

    PredictionRequestPayload {
        order_id: rng.gen_range(ORDER_ID_RANGE),
        distance_km: round2(distance),
        relative_humidity_pct: obs.humidity_pct,
        cloud_cover_pct: obs.cloud_cover_pct,
        wind_speed_kmh: obs.wind_speed_kmh,
        precipitation_mm: obs.precipitation_mm,
        accept_hour_sin: time.hour_sin,
        accept_hour_cos: time.hour_cos,
        accept_dow_sin: time.dow_sin,
        accept_dow_cos: time.dow_cos,
        weather_label: inputs.weather.label,
        traffic_label: inputs.traffic,
        city: inputs.end.name.clone(),
        aoi_type: inputs.aoi,
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeatherObservation;
    use chrono::NaiveDate;
    use rand::{SeedableRng, rngs::StdRng};

    const EPS: f64 = 1e-9;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 15, 0))
            .expect("valid date")
    }

    #[test]
    fn hour_wraps_around_midnight() {
        let (sin0, cos0) = cyclical(0, 24);
        let (sin24, cos24) = cyclical(24, 24);
        assert!((sin0 - sin24).abs() < EPS);
        assert!((cos0 - cos24).abs() < EPS);

        // 23:00 sits next to 00:00 on the circle.
        let (sin23, cos23) = cyclical(23, 24);
        let (sin1, cos1) = cyclical(1, 24);
        let gap_23 = ((sin23 - sin0).powi(2) + (cos23 - cos0).powi(2)).sqrt();
        let gap_1 = ((sin1 - sin0).powi(2) + (cos1 - cos0).powi(2)).sqrt();
        assert!((gap_23 - gap_1).abs() < EPS);
    }

    #[test]
    fn encodes_known_points() {
        let t = CyclicalTime::encode(6, 0);
        assert!((t.hour_sin - 1.0).abs() < EPS);
        assert!(t.hour_cos.abs() < EPS);
        assert!(t.dow_sin.abs() < EPS);
        assert!((t.dow_cos - 1.0).abs() < EPS);
    }

    #[test]
    fn sunday_is_day_zero() {
        // 2026-10-18 is a Sunday.
        let sunday = CyclicalTime::at(at(2026, 10, 18, 12));
        assert!(sunday.dow_sin.abs() < EPS);
        assert!((sunday.dow_cos - 1.0).abs() < EPS);

        let saturday = CyclicalTime::at(at(2026, 10, 17, 12));
        let expected = CyclicalTime::encode(12, 6);
        assert!((saturday.dow_sin - expected.dow_sin).abs() < EPS);
        assert!(saturday.dow_sin < 0.0);
    }

    #[test]
    fn builds_payload_from_inputs() {
        let start = NamedLocation::preset("Lahore").expect("preset");
        let end = NamedLocation::preset("Islamabad").expect("preset");
        let weather = WeatherReading::fallback();
        let mut rng = StdRng::seed_from_u64(7);

        let payload = build_payload(
            PayloadInputs {
                start: &start,
                end: &end,
                weather: &weather,
                traffic: TrafficLabel::Heavy,
                aoi: AoiType::Commercial,
            },
            at(2026, 10, 18, 18),
            &mut rng,
        );

        assert!(ORDER_ID_RANGE.contains(&payload.order_id));
        assert_eq!(payload.city, "Islamabad");
        assert_eq!(payload.distance_km, round2(distance_km(start.coord, end.coord)));
        assert_eq!(payload.relative_humidity_pct, 65.0);
        assert_eq!(payload.wind_speed_kmh, 12.0);
        assert_eq!(payload.weather_label, WeatherLabel::Clear);
        assert!((payload.accept_hour_sin + 1.0).abs() < EPS);
    }

    #[test]
    fn order_ids_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let loc = NamedLocation::preset("Karachi").expect("preset");
        let weather = WeatherReading {
            observation: WeatherObservation::empty(),
            ..WeatherReading::initial()
        };

        for _ in 0..500 {
            let payload = build_payload(
                PayloadInputs {
                    start: &loc,
                    end: &loc,
                    weather: &weather,
                    traffic: TrafficLabel::default(),
                    aoi: AoiType::default(),
                },
                at(2026, 1, 1, 0),
                &mut rng,
            );
            assert!(ORDER_ID_RANGE.contains(&payload.order_id));
            assert_eq!(payload.distance_km, 0.0);
        }
    }

    #[test]
    fn serializes_with_service_field_names() {
        let start = NamedLocation::preset("Lahore").expect("preset");
        let end = NamedLocation::preset("Sargodha").expect("preset");
        let weather = WeatherReading::fallback();
        let mut rng = StdRng::seed_from_u64(1);

        let payload = build_payload(
            PayloadInputs {
                start: &start,
                end: &end,
                weather: &weather,
                traffic: TrafficLabel::Normal,
                aoi: AoiType::Industrial,
            },
            at(2026, 10, 18, 9),
            &mut rng,
        );

        let value = serde_json::to_value(&payload).expect("serialize");
        let object = value.as_object().expect("json object");

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        let mut expected = vec![
            "order_id",
            "distance_km",
            "relative_humidity_2m (%)",
            "cloud_cover (%)",
            "wind_speed_10m (km/h)",
            "precipitation (mm)",
            "accept_hour_sin",
            "accept_hour_cos",
            "accept_dow_sin",
            "accept_dow_cos",
            "Weather_Label",
            "Traffic_Label",
            "city",
            "aoi_type",
        ];
        expected.sort_unstable();
        assert_eq!(keys, expected);

        assert_eq!(object["Weather_Label"], "Clear");
        assert_eq!(object["Traffic_Label"], "Normal");
        assert_eq!(object["aoi_type"], 3);
        assert_eq!(object["city"], "Sargodha");
    }
}

//! Rule table turning raw weather conditions into a single label.
//!
//! Rules overlap, so evaluation order decides the outcome: the first match wins.

use crate::model::{WeatherLabel, WeatherObservation};

pub const KMH_PER_MS: f64 = 3.6;

pub fn classify(obs: &WeatherObservation) -> WeatherLabel {
    let humidity = obs.humidity_pct;
    let cloud_cover = obs.cloud_cover_pct;
    let cloud_cover_low = obs.cloud_cover_low_pct;
    let wind_speed = obs.wind_speed_kmh / KMH_PER_MS;
    let wind_gusts = obs.wind_gusts_kmh / KMH_PER_MS;
    let precipitation = obs.precipitation_mm;

    if humidity > 90.0 && cloud_cover_low > 80.0 && wind_speed < 2.0 {
        return WeatherLabel::Foggy;
    }

    if (wind_gusts > 12.0 || wind_speed > 12.0) && precipitation > 2.0 {
        return WeatherLabel::Stormy;
    }

    if wind_speed > 8.0 && precipitation < 0.1 && humidity < 40.0 {
        return WeatherLabel::Sandstorm;
    }

    if cloud_cover > 70.0 && precipitation < 1.0 {
        return WeatherLabel::Cloudy;
    }

    if (6.0..=12.0).contains(&wind_speed) && precipitation < 1.0 {
        return WeatherLabel::Windy;
    }

    if precipitation >= 1.0 {
        return WeatherLabel::Rainy;
    }

    if cloud_cover < 30.0 && obs.shortwave_radiation > 200.0 && obs.is_daytime {
        return WeatherLabel::Sunny;
    }

    WeatherLabel::Clear
}

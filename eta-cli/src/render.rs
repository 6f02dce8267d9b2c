use eta_core::{
    Dashboard, DelayFactors, Prediction, PredictionHistory, WeatherReading, WeatherSource,
};

pub fn weather(reading: &WeatherReading) {
    let obs = &reading.observation;
    let source = match reading.source {
        WeatherSource::Live => "live",
        WeatherSource::Fallback => "defaults, provider unavailable",
        WeatherSource::Initial => "not fetched yet",
    };

    println!("Weather: {} ({source})", reading.label);
    println!("  Humidity        {:>6.1} %", obs.humidity_pct);
    println!(
        "  Cloud cover     {:>6.1} % (low {:.1} %)",
        obs.cloud_cover_pct, obs.cloud_cover_low_pct
    );
    println!(
        "  Wind            {:>6.1} km/h (gusts {:.1} km/h)",
        obs.wind_speed_kmh, obs.wind_gusts_kmh
    );
    println!("  Precipitation   {:>6.1} mm", obs.precipitation_mm);
    println!("  Radiation       {:>6.1} W/m²", obs.shortwave_radiation);
    println!("  Daytime         {:>6}", if obs.is_daytime { "yes" } else { "no" });
}

pub fn prediction(prediction: &Prediction) {
    let result = prediction.result();
    let tag = if prediction.is_fallback() { " [demo]" } else { "" };

    println!(
        "Order #{} to {}: ETA {:.2} min, delay {:.2} min{tag}",
        result.order_id, result.city, result.predicted_eta_minutes, result.predicted_delay_minutes
    );
}

pub fn factors(factors: &DelayFactors) {
    println!("Delay factors:");
    for (name, value) in factors.named() {
        println!("  {name:<10} {value:>8.1}");
    }
}

pub fn history(history: &PredictionHistory) {
    if history.is_empty() {
        println!("No predictions yet.");
        return;
    }

    println!("Recent predictions ({}):", history.len());
    for entry in history.iter() {
        print!("  ");
        prediction(entry);
    }
}

/// Route, weather, latest prediction and factors for the current session.
pub fn summary(dashboard: &Dashboard) {
    println!("[{}]", dashboard.health().as_str());
    println!(
        "{} → {} ({:.2} km)",
        dashboard.start(),
        dashboard.destination(),
        dashboard.distance_km()
    );
    println!("Traffic: {}, AOI: {}", dashboard.traffic(), dashboard.aoi());
    weather(dashboard.weather());

    match dashboard.last_prediction() {
        Some(p) => prediction(p),
        None => println!("No prediction yet."),
    }

    factors(&dashboard.delay_factors());
    println!("Map: {}", dashboard.map_view().embed_url());
}

use crate::model::{Coordinate, NamedLocation};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers (haversine). Inputs are not validated.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

const MAP_EMBED_URL: &str = "https://www.openstreetmap.org/export/embed.html";
const LNG_PADDING: f64 = 0.5;
const LAT_PADDING: f64 = 0.3;

/// Bounding box and markers for an embeddable map of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
    pub markers: Vec<Coordinate>,
}

impl MapView {
    pub fn for_route(start: &NamedLocation, end: &NamedLocation) -> Self {
        let (a, b) = (start.coord, end.coord);
        Self {
            min_lng: a.longitude.min(b.longitude) - LNG_PADDING,
            min_lat: a.latitude.min(b.latitude) - LAT_PADDING,
            max_lng: a.longitude.max(b.longitude) + LNG_PADDING,
            max_lat: a.latitude.max(b.latitude) + LAT_PADDING,
            markers: vec![a, b],
        }
    }

    pub fn embed_url(&self) -> String {
        let mut url = format!(
            "{MAP_EMBED_URL}?bbox={},{},{},{}&layer=mapnik",
            self.min_lng, self.min_lat, self.max_lng, self.max_lat
        );
        for m in &self.markers {
            url.push_str(&format!("&marker={},{}", m.latitude, m.longitude));
        }
        url
    }
}

use thiserror::Error;

/// Rejections for user-entered locations. Raised before any state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("Please enter valid latitude and longitude values (got '{0}')")]
    NotANumber(String),

    #[error("Latitude must be between -90 and 90 (got {0})")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be between -180 and 180 (got {0})")]
    LongitudeOutOfRange(f64),

    #[error("Unknown location '{0}'. Use a preset name or 'lat,lng[,name]'.")]
    Unknown(String),
}

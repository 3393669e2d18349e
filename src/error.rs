//! Error types for kadasrouting

use thiserror::Error;

/// Main error type for decoding and reprojection
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed polyline at byte {position}: {reason}")]
    MalformedInput { position: usize, reason: &'static str },

    #[error("Invalid polyline precision: {0} (expected 1..=15)")]
    InvalidPrecision(u32),

    #[error("Cannot resolve a transform from {0} to EPSG:4326")]
    UnresolvedCrs(String),

    #[error(
        "Reprojection failed at polygon {polygon}, ring {ring}, point {point} ({x}, {y}): {reason}"
    )]
    Reprojection {
        polygon: usize,
        ring: usize,
        point: usize,
        x: f64,
        y: f64,
        reason: String,
    },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for kadasrouting operations
pub type Result<T> = std::result::Result<T, Error>;

//! kadasrouting - Polyline decoding and WGS84 reprojection of avoid areas for Valhalla routing

pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod polyline;
pub mod valhalla;

pub use error::{Error, Result};

//! Valhalla request and response payloads handled by the routing core
//!
//! Network access is left to the caller; these types only shape the JSON
//! that goes out and decode the JSON that comes back.

pub mod avoid;
pub mod route;

pub use avoid::AvoidPolygons;
pub use route::{Leg, RouteResponse, Summary, Trip};

/// Format a distance in meters for display
///
/// Distances above one kilometer are shown in km with one decimal, shorter
/// ones in whole meters. A missing distance formats as an empty string.
pub fn format_distance(meters: Option<f64>) -> String {
    match meters {
        None => String::new(),
        Some(d) if d > 1000.0 => format!("{:.1} km", d / 1000.0),
        Some(d) => format!("{:.0} m", d),
    }
}

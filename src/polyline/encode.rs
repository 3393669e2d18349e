use super::{ELEVATION_FACTOR, PolylineOptions};
use crate::domain::Coordinate;
use crate::error::{Error, Result};

/// Largest grid value that survives the f64 round trip exactly
const MAX_GRID_VALUE: f64 = 9_007_199_254_740_992.0;

/// Encode coordinates into a polyline string
///
/// Values are rounded half away from zero to the grid given by `precision`
/// before deltas are taken, so decoding the result reproduces the input up to
/// that rounding. Missing elevations encode as 0 when `is_3d` is set.
pub fn encode_polyline(coordinates: &[Coordinate], precision: u32, is_3d: bool) -> Result<String> {
    PolylineOptions::new(precision).with_3d(is_3d).encode(coordinates)
}

impl PolylineOptions {
    pub fn encode(&self, coordinates: &[Coordinate]) -> Result<String> {
        let factor = self.factor()?;
        let mut out = String::with_capacity(coordinates.len() * if self.is_3d { 12 } else { 8 });
        let (mut prev_lat, mut prev_lng, mut prev_z) = (0i64, 0i64, 0i64);

        for coord in coordinates {
            let lat = to_grid(coord.lat, factor)?;
            let lng = to_grid(coord.lng, factor)?;
            out.push_str(&encode_value(lat - prev_lat));
            out.push_str(&encode_value(lng - prev_lng));
            prev_lat = lat;
            prev_lng = lng;

            if self.is_3d {
                let z = to_grid(coord.elevation.unwrap_or(0.0), ELEVATION_FACTOR)?;
                out.push_str(&encode_value(z - prev_z));
                prev_z = z;
            }
        }

        Ok(out)
    }
}

fn to_grid(value: f64, factor: f64) -> Result<i64> {
    let scaled = (value * factor).round();
    if !scaled.is_finite() || scaled.abs() > MAX_GRID_VALUE {
        return Err(Error::InvalidGeometry(format!(
            "coordinate value {} cannot be encoded",
            value
        )));
    }
    Ok(scaled as i64)
}

pub(crate) fn encode_value(delta: i64) -> String {
    let mut value = if delta < 0 {
        !(delta << 1) as u64
    } else {
        (delta << 1) as u64
    };

    let mut out = String::new();
    while value >= 0x20 {
        out.push(char::from((0x20 | (value & 0x1F)) as u8 + 63));
        value >>= 5;
    }
    out.push(char::from(value as u8 + 63));
    out
}

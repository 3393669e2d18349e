use tracing::debug;

use super::{ELEVATION_FACTOR, PolylineOptions};
use crate::domain::Coordinate;
use crate::error::{Error, Result};

/// Decode a polyline with an explicit precision and dimensionality
///
/// # Arguments
/// * `expression` - Encoded polyline as returned by the routing service
/// * `precision` - Decimal digits used by the encoder (5 for Google, 6 for Valhalla)
/// * `is_3d` - Whether an elevation value follows every lat/lng pair
///
/// # Returns
/// * `Ok(coords)` - Coordinates in path order; empty for an empty string
/// * `Err(Error::MalformedInput)` - Truncated or invalid input, no partial result
/// * `Err(Error::InvalidPrecision)` - `precision` is 0 or above 15
pub fn decode_polyline(expression: &str, precision: u32, is_3d: bool) -> Result<Vec<Coordinate>> {
    PolylineOptions::new(precision).with_3d(is_3d).decode(expression)
}

/// Decode a 2D polyline at Valhalla's default precision of 6
pub fn decode_polyline6(expression: &str) -> Result<Vec<Coordinate>> {
    PolylineOptions::default().decode(expression)
}

impl PolylineOptions {
    pub fn decode(&self, expression: &str) -> Result<Vec<Coordinate>> {
        let factor = self.factor()?;
        let mut cursor = Cursor::new(expression.as_bytes());
        let mut coordinates = Vec::new();

        let (mut lat, mut lng, mut z) = (0i64, 0i64, 0i64);

        while !cursor.at_end() {
            lat = cursor.accumulate(lat)?;
            lng = cursor.accumulate(lng)?;

            let coordinate = if self.is_3d {
                z = cursor.accumulate(z)?;
                Coordinate::with_elevation(
                    lat as f64 / factor,
                    lng as f64 / factor,
                    z as f64 / ELEVATION_FACTOR,
                )
            } else {
                Coordinate::new(lat as f64 / factor, lng as f64 / factor)
            };
            coordinates.push(coordinate);
        }

        debug!(
            points = coordinates.len(),
            precision = self.precision,
            is_3d = self.is_3d,
            "decoded polyline"
        );
        Ok(coordinates)
    }
}

/// Scan position over the encoded bytes
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn malformed(&self, reason: &'static str) -> Error {
        Error::MalformedInput {
            position: self.pos,
            reason,
        }
    }

    /// Read the next delta and add it to a running total
    fn accumulate(&mut self, total: i64) -> Result<i64> {
        let delta = self.next_value()?;
        total
            .checked_add(delta)
            .ok_or_else(|| self.malformed("coordinate overflows a 64-bit accumulator"))
    }

    /// Read one variable-length zig-zag integer, least significant chunk first
    fn next_value(&mut self) -> Result<i64> {
        let mut result: u64 = 0;
        let mut shift: u32 = 0;

        loop {
            let Some(&c) = self.bytes.get(self.pos) else {
                return Err(if shift == 0 {
                    self.malformed("input ends inside a coordinate")
                } else {
                    self.malformed("input ends inside a value")
                });
            };
            if !(63..=126).contains(&c) {
                return Err(self.malformed("character outside the polyline alphabet"));
            }

            let chunk = u64::from(c - 63);
            let bits = chunk & 0x1F;
            // 13 chunks carry 65 bits; only the low nibble of the last one fits
            if shift >= 64 || (shift > 59 && bits >> (64 - shift) != 0) {
                return Err(self.malformed("value does not fit in 64 bits"));
            }

            self.pos += 1;
            result |= bits << shift;
            shift += 5;

            if chunk < 0x20 {
                break;
            }
        }

        let magnitude = (result >> 1) as i64;
        Ok(if result & 1 == 1 { !magnitude } else { magnitude })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOGLE_FIXTURE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn test_empty_input() {
        assert!(decode_polyline6("").unwrap().is_empty());
        assert!(decode_polyline("", 5, true).unwrap().is_empty());
    }

    #[test]
    fn test_google_fixture_precision_5() {
        let coords = decode_polyline(GOOGLE_FIXTURE, 5, false).unwrap();
        let pairs: Vec<(f64, f64)> = coords.iter().map(Coordinate::lat_lng).collect();
        assert_eq!(
            pairs,
            vec![(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)]
        );
        assert!(coords.iter().all(|c| c.elevation.is_none()));
    }

    #[test]
    fn test_precision_6_scales_down() {
        let coords = decode_polyline6(GOOGLE_FIXTURE).unwrap();
        assert_eq!(coords.len(), 3);
        assert!((coords[0].lat - 3.85).abs() < 1e-12);
        assert!((coords[0].lng + 12.02).abs() < 1e-12);
    }

    #[test]
    fn test_single_chunk_values() {
        // '?' is zero, '@' is -1, 'A' is +1
        let coords = decode_polyline("??A@", 5, false).unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0].lat_lng(), (0.0, 0.0));
        assert_eq!(coords[1].lat_lng(), (0.00001, -0.00001));
    }

    #[test]
    fn test_3d_elevation_ignores_precision() {
        // lat +1, lng -1, elevation +12345 cm
        let encoded = format!("A@{}", crate::polyline::encode::encode_value(12345));
        for precision in [5, 6] {
            let coords = decode_polyline(&encoded, precision, true).unwrap();
            assert_eq!(coords.len(), 1);
            assert_eq!(coords[0].elevation, Some(123.45));
        }
    }

    #[test]
    fn test_truncated_mid_value() {
        let truncated = &GOOGLE_FIXTURE[..GOOGLE_FIXTURE.len() - 1];
        let err = decode_polyline(truncated, 5, false).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedInput {
                reason: "input ends inside a value",
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_mid_coordinate() {
        // Only the latitude of the first point
        let err = decode_polyline("_p~iF", 5, false).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { position: 5, .. }));
    }

    #[test]
    fn test_2d_string_decoded_as_3d_is_malformed() {
        assert_eq!(decode_polyline("??A", 6, true).unwrap().len(), 1);
        // Two values cannot form a complete (lat, lng, z) triple
        assert!(matches!(
            decode_polyline("??", 6, true),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_invalid_character() {
        let err = decode_polyline("_p~iF ~ps|U", 5, false).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { position: 5, .. }));
        assert!(decode_polyline("é?", 5, false).is_err());
    }

    #[test]
    fn test_overlong_value() {
        let overlong = "~".repeat(14) + "?";
        assert!(matches!(
            decode_polyline(&overlong, 6, false),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_invalid_precision() {
        assert!(matches!(
            decode_polyline("??", 0, false),
            Err(Error::InvalidPrecision(0))
        ));
        assert!(matches!(
            decode_polyline("??", 16, false),
            Err(Error::InvalidPrecision(16))
        ));
    }
}

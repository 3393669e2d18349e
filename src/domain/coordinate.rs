use serde::ser::{Serialize, SerializeSeq, Serializer};

/// A decoded path vertex in WGS84
///
/// `elevation` is only present for 3D polylines and is expressed in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
    pub elevation: Option<f64>,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            elevation: None,
        }
    }

    pub fn with_elevation(lat: f64, lng: f64, elevation: f64) -> Self {
        Self {
            lat,
            lng,
            elevation: Some(elevation),
        }
    }

    /// (lat, lng) pair, dropping any elevation
    pub fn lat_lng(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl From<(f64, f64, f64)> for Coordinate {
    fn from((lat, lng, elevation): (f64, f64, f64)) -> Self {
        Self::with_elevation(lat, lng, elevation)
    }
}

/// Serializes as `[lat, lng]` or `[lat, lng, elevation]`
impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.elevation.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.lat)?;
        seq.serialize_element(&self.lng)?;
        if let Some(z) = self.elevation {
            seq.serialize_element(&z)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_2d() {
        let json = serde_json::to_string(&Coordinate::new(38.5, -120.2)).unwrap();
        assert_eq!(json, "[38.5,-120.2]");
    }

    #[test]
    fn test_serialize_3d() {
        let json = serde_json::to_string(&Coordinate::with_elevation(46.9, 7.4, 540.25)).unwrap();
        assert_eq!(json, "[46.9,7.4,540.25]");
    }

    #[test]
    fn test_from_tuples() {
        assert_eq!(Coordinate::from((1.0, 2.0)).elevation, None);
        assert_eq!(Coordinate::from((1.0, 2.0, 3.0)).elevation, Some(3.0));
    }
}

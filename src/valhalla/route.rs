use serde::Deserialize;

use crate::domain::Coordinate;
use crate::error::Result;
use crate::polyline::decode_polyline6;

const METERS_PER_MILE: f64 = 1609.344;

/// Raw Valhalla `/route` response
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    pub trip: Trip,
}

/// The routed trip, one leg per pair of consecutive locations
#[derive(Debug, Deserialize)]
pub struct Trip {
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub summary: Option<Summary>,
    #[serde(default = "default_units")]
    pub units: String,
}

#[derive(Debug, Deserialize)]
pub struct Leg {
    /// Precision 6 encoded polyline
    pub shape: String,
    #[serde(default)]
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Summary {
    /// Length in the trip's `units`
    pub length: f64,
    /// Duration in seconds
    #[serde(default)]
    pub time: f64,
}

fn default_units() -> String {
    "kilometers".to_string()
}

impl RouteResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode every leg's shape, in leg order
    pub fn leg_shapes(&self) -> Result<Vec<Vec<Coordinate>>> {
        self.trip
            .legs
            .iter()
            .map(|leg| decode_polyline6(&leg.shape))
            .collect()
    }

    /// Whole route as one coordinate sequence
    ///
    /// Consecutive legs share their junction vertex; it is kept once.
    pub fn route_shape(&self) -> Result<Vec<Coordinate>> {
        let mut shape: Vec<Coordinate> = Vec::new();
        for leg in self.leg_shapes()? {
            let skip = match (shape.last(), leg.first()) {
                (Some(last), Some(first)) if last == first => 1,
                _ => 0,
            };
            shape.extend(leg.into_iter().skip(skip));
        }
        Ok(shape)
    }
}

impl Trip {
    /// Convert a summary length into meters
    pub fn length_meters(&self, summary: &Summary) -> f64 {
        match self.units.as_str() {
            "miles" | "mi" => summary.length * METERS_PER_MILE,
            _ => summary.length * 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyline::encode_polyline;

    fn response_json(legs: &[&str], units: &str) -> String {
        let legs: Vec<String> = legs
            .iter()
            .map(|shape| {
                format!(
                    r#"{{"shape": {}, "summary": {{"length": 1.5, "time": 90.0}}}}"#,
                    serde_json::to_string(shape).unwrap()
                )
            })
            .collect();
        format!(
            r#"{{"trip": {{"legs": [{}], "units": "{}", "summary": {{"length": 3.0, "time": 180.0}}}}}}"#,
            legs.join(","),
            units
        )
    }

    fn encode(points: &[(f64, f64)]) -> String {
        let coords: Vec<Coordinate> = points.iter().copied().map(Coordinate::from).collect();
        encode_polyline(&coords, 6, false).unwrap()
    }

    #[test]
    fn test_parse_and_decode_legs() {
        let first = encode(&[(46.95, 7.44), (46.96, 7.45)]);
        let second = encode(&[(46.96, 7.45), (47.0, 7.5)]);
        let response = RouteResponse::from_json(&response_json(&[&first, &second], "kilometers"))
            .unwrap();

        let legs = response.leg_shapes().unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[1][1].lat_lng(), (47.0, 7.5));

        let shape = response.route_shape().unwrap();
        assert_eq!(shape.len(), 3);
        assert_eq!(shape[0].lat_lng(), (46.95, 7.44));
    }

    #[test]
    fn test_length_units() {
        let km = RouteResponse::from_json(&response_json(&[], "kilometers")).unwrap();
        let summary = km.trip.summary.unwrap();
        assert_eq!(km.trip.length_meters(&summary), 3000.0);

        let mi = RouteResponse::from_json(&response_json(&[], "miles")).unwrap();
        assert!((mi.trip.length_meters(&summary) - 4828.032).abs() < 1e-9);
    }

    #[test]
    fn test_default_units() {
        let response = RouteResponse::from_json(r#"{"trip": {"legs": []}}"#).unwrap();
        assert_eq!(response.trip.units, "kilometers");
        assert!(response.trip.summary.is_none());
    }

    #[test]
    fn test_malformed_shape_fails() {
        let response = RouteResponse::from_json(&response_json(&["_p~iF"], "kilometers")).unwrap();
        assert!(response.leg_shapes().is_err());
    }
}

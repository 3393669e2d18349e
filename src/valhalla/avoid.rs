use serde::Serialize;

use crate::domain::AreaPolygon;
use crate::error::Result;
use crate::geometry::{Crs, GeometryReprojector, TransformProvider, WgsRing};

/// The `avoid_polygons` member of a Valhalla route request
///
/// Serializes to `{"avoid_polygons": [[[lon, lat], ...], ...]}`, or to an
/// empty object when there is nothing to avoid so it can be merged into a
/// request body unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AvoidPolygons {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub avoid_polygons: Vec<WgsRing>,
}

impl AvoidPolygons {
    pub fn new(rings: Vec<WgsRing>) -> Self {
        Self {
            avoid_polygons: rings,
        }
    }

    /// Reproject areas drawn or selected in `source` and wrap the rings
    pub fn from_areas<P: TransformProvider>(
        reprojector: &GeometryReprojector<P>,
        source: &Crs,
        areas: &[AreaPolygon],
    ) -> Result<Self> {
        reprojector
            .reproject_to_wgs84(source, areas)
            .map(Self::new)
    }

    pub fn is_empty(&self) -> bool {
        self.avoid_polygons.is_empty()
    }

    /// Append rings from another selection, e.g. a drawn area plus a layer
    pub fn extend(&mut self, other: AvoidPolygons) {
        self.avoid_polygons.extend(other.avoid_polygons);
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_rings() {
        let avoid = AvoidPolygons::new(vec![vec![[7.0, 46.0], [7.5, 46.0], [7.0, 46.0]]]);
        assert_eq!(
            avoid.to_value().unwrap(),
            json!({"avoid_polygons": [[[7.0, 46.0], [7.5, 46.0], [7.0, 46.0]]]})
        );
    }

    #[test]
    fn test_empty_serializes_to_empty_object() {
        let avoid = AvoidPolygons::default();
        assert!(avoid.is_empty());
        assert_eq!(avoid.to_value().unwrap(), json!({}));
    }

    #[test]
    fn test_from_swiss_areas() {
        let areas = vec![AreaPolygon::new(vec![
            (2_600_000.0, 1_200_000.0),
            (2_601_000.0, 1_200_000.0),
            (2_600_000.0, 1_201_000.0),
            (2_600_000.0, 1_200_000.0),
        ])];
        let mut avoid =
            AvoidPolygons::from_areas(&GeometryReprojector::builtin(), &Crs::Epsg(2056), &areas)
                .unwrap();
        assert_eq!(avoid.avoid_polygons.len(), 1);
        let bern = avoid.avoid_polygons[0][0];
        assert!((bern[0] - 7.438_637).abs() < 1e-5);
        assert!((bern[1] - 46.951_081).abs() < 1e-5);

        avoid.extend(AvoidPolygons::new(vec![vec![[8.0, 47.0]]]));
        assert_eq!(avoid.avoid_polygons.len(), 2);
    }
}

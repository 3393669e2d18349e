use geojson::GeoJson;

use crate::error::{Error, Result};

/// A patrol or avoidance area in its source CRS
///
/// Points are (x, y) pairs in the native units of the source CRS. Rings are
/// treated as implicitly closed; a repeated closing vertex is kept as given.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaPolygon {
    pub outer: Vec<(f64, f64)>,
    pub holes: Vec<Vec<(f64, f64)>>,
}

impl AreaPolygon {
    pub fn new(outer: Vec<(f64, f64)>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    pub fn with_holes(outer: Vec<(f64, f64)>, holes: Vec<Vec<(f64, f64)>>) -> Self {
        Self { outer, holes }
    }

    /// Rings in encoding order: the outer boundary first, then each hole
    pub fn rings(&self) -> impl Iterator<Item = &[(f64, f64)]> {
        std::iter::once(self.outer.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    pub fn ring_count(&self) -> usize {
        1 + self.holes.len()
    }

    /// Extract polygons from a parsed GeoJSON document
    ///
    /// Accepts `Polygon`, `MultiPolygon` and `GeometryCollection` geometries,
    /// bare or wrapped in a `Feature` or `FeatureCollection`. Polygons with no
    /// rings are skipped, as are features without geometry.
    pub fn from_geojson(geojson: GeoJson) -> Result<Vec<AreaPolygon>> {
        let geometries: Vec<geojson::Geometry> = match geojson {
            GeoJson::Geometry(geometry) => vec![geometry],
            GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
            GeoJson::FeatureCollection(collection) => collection
                .features
                .into_iter()
                .filter_map(|feature| feature.geometry)
                .collect(),
        };

        let mut polygons = Vec::new();
        for geometry in geometries {
            check_positions(&geometry.value)?;
            collect_polygons(geo::Geometry::<f64>::try_from(geometry)?, &mut polygons)?;
        }
        Ok(polygons)
    }

    /// Parse GeoJSON text and extract its polygons
    pub fn parse_geojson(text: &str) -> Result<Vec<AreaPolygon>> {
        Self::from_geojson(text.parse::<GeoJson>()?)
    }
}

impl From<geo::Polygon<f64>> for AreaPolygon {
    fn from(polygon: geo::Polygon<f64>) -> Self {
        let (exterior, interiors) = polygon.into_inner();
        let to_points = |line: geo::LineString<f64>| -> Vec<(f64, f64)> {
            line.0.into_iter().map(|c| (c.x, c.y)).collect()
        };
        Self {
            outer: to_points(exterior),
            holes: interiors.into_iter().map(to_points).collect(),
        }
    }
}

fn push_polygon(polygon: geo::Polygon<f64>, out: &mut Vec<AreaPolygon>) {
    if !polygon.exterior().0.is_empty() {
        out.push(AreaPolygon::from(polygon));
    }
}

fn collect_polygons(geometry: geo::Geometry<f64>, out: &mut Vec<AreaPolygon>) -> Result<()> {
    let kind = match geometry {
        geo::Geometry::Polygon(polygon) => {
            push_polygon(polygon, out);
            return Ok(());
        }
        geo::Geometry::MultiPolygon(multi) => {
            for polygon in multi.0 {
                push_polygon(polygon, out);
            }
            return Ok(());
        }
        geo::Geometry::Rect(rect) => {
            push_polygon(rect.to_polygon(), out);
            return Ok(());
        }
        geo::Geometry::Triangle(triangle) => {
            push_polygon(triangle.to_polygon(), out);
            return Ok(());
        }
        geo::Geometry::GeometryCollection(collection) => {
            for geometry in collection.0 {
                collect_polygons(geometry, out)?;
            }
            return Ok(());
        }
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
    };

    Err(Error::InvalidGeometry(format!(
        "expected a polygon geometry, got {}",
        kind
    )))
}

/// Positions are read by index during conversion; reject short ones first
fn check_positions(value: &geojson::Value) -> Result<()> {
    use geojson::Value as V;

    let short = |p: &geojson::Position| p.len() < 2;
    let has_short = match value {
        V::Point(p) => short(p),
        V::MultiPoint(ps) | V::LineString(ps) => ps.iter().any(short),
        V::MultiLineString(rings) | V::Polygon(rings) => rings.iter().flatten().any(short),
        V::MultiPolygon(polygons) => polygons.iter().flatten().flatten().any(short),
        V::GeometryCollection(geometries) => {
            for geometry in geometries {
                check_positions(&geometry.value)?;
            }
            false
        }
    };

    if has_short {
        return Err(Error::InvalidGeometry(
            "position must hold at least two numbers".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rings_order() {
        let polygon = AreaPolygon::with_holes(
            vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 0.0)],
            vec![vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 1.0)]],
        );
        let rings: Vec<_> = polygon.rings().collect();
        assert_eq!(rings.len(), 2);
        assert_eq!(polygon.ring_count(), 2);
        assert_eq!(rings[0][1], (4.0, 0.0));
        assert_eq!(rings[1][1], (2.0, 1.0));
    }

    #[test]
    fn test_from_geo_polygon() {
        let polygon = geo::Polygon::new(
            geo::LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        );
        let area = AreaPolygon::from(polygon);
        assert_eq!(area.outer.len(), 4);
        assert!(area.holes.is_empty());
        assert_eq!(area.outer[1], (1.0, 0.0));
    }

    #[test]
    fn test_geojson_polygon_with_hole() {
        let polygons = AreaPolygon::parse_geojson(
            r#"{
                "type": "Polygon",
                "coordinates": [
                    [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 0.0]],
                    [[2.0, 2.0], [3.0, 2.0, 99.0], [3.0, 3.0], [2.0, 2.0]]
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].outer[1], (10.0, 0.0));
        assert_eq!(polygons[0].holes.len(), 1);
        assert_eq!(polygons[0].holes[0][1], (3.0, 2.0));
    }

    #[test]
    fn test_geojson_feature_collection() {
        let polygons = AreaPolygon::parse_geojson(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {}, "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                            [[[5, 5], [6, 5], [6, 6], [5, 5]]]
                        ]
                    }},
                    {"type": "Feature", "properties": {}, "geometry": null}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[1].outer[0], (5.0, 5.0));
    }

    #[test]
    fn test_geojson_geometry_collection() {
        let polygons = AreaPolygon::parse_geojson(
            r#"{
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]},
                    {"type": "Polygon", "coordinates": [[[7, 7], [8, 7], [8, 8], [7, 7]]]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[1].outer[2], (8.0, 8.0));
    }

    #[test]
    fn test_geojson_feature_without_geometry() {
        let polygons = AreaPolygon::parse_geojson(
            r#"{"type": "Feature", "properties": {}, "geometry": null}"#,
        )
        .unwrap();
        assert!(polygons.is_empty());
    }

    #[test]
    fn test_geojson_rejects_lines() {
        let result =
            AreaPolygon::parse_geojson(r#"{"type": "LineString", "coordinates": [[0, 0], [1, 1]]}"#);
        assert!(matches!(result, Err(Error::InvalidGeometry(ref msg)) if msg.contains("LineString")));
    }

    #[test]
    fn test_geojson_rejects_short_position() {
        let result =
            AreaPolygon::parse_geojson(r#"{"type": "Polygon", "coordinates": [[[0.0], [1.0, 1.0]]]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_geojson_rejects_invalid_text() {
        assert!(matches!(
            AreaPolygon::parse_geojson("{\"type\": "),
            Err(Error::GeoJson(_))
        ));
    }

    #[test]
    fn test_geojson_empty_polygon_skipped() {
        let polygons =
            AreaPolygon::parse_geojson(r#"{"type": "Polygon", "coordinates": []}"#).unwrap();
        assert!(polygons.is_empty());
    }
}

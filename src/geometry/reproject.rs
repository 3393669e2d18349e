use tracing::{debug, warn};

use super::crs::Crs;
use super::transform::{BuiltinTransforms, CoordinateTransform, TransformProvider};
use crate::domain::AreaPolygon;
use crate::error::{Error, Result};

/// A WGS84 ring as `[lon, lat]` pairs, ready for an `avoid_polygons` payload
pub type WgsRing = Vec<[f64; 2]>;

/// Reprojects avoidance areas into WGS84 for the routing service
///
/// The output is a flat list of rings: every ring of every input polygon, in
/// input order. Which ring belonged to which polygon, and whether it was a
/// hole, is not retained; Valhalla takes `avoid_polygons` as a plain ring list.
#[derive(Debug, Clone, Default)]
pub struct GeometryReprojector<P = BuiltinTransforms> {
    provider: P,
}

impl GeometryReprojector {
    /// Reprojector backed by the closed-form transforms of this crate
    pub fn builtin() -> Self {
        Self::new(BuiltinTransforms)
    }
}

impl<P: TransformProvider> GeometryReprojector<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Reproject all rings of `polygons` from `source` into WGS84
    ///
    /// # Returns
    /// * `Ok(rings)` - One transformed ring per input ring, flattened
    /// * `Err(Error::UnresolvedCrs)` - `source` is unknown, no point was read
    /// * `Err(Error::Reprojection)` - A point failed; nothing is returned
    pub fn reproject_to_wgs84(&self, source: &Crs, polygons: &[AreaPolygon]) -> Result<Vec<WgsRing>> {
        let Some(transform) = self.provider.to_wgs84(source) else {
            warn!(crs = %source, "no transform to WGS84 available");
            return Err(Error::UnresolvedCrs(source.to_string()));
        };

        debug!(
            crs = %source,
            polygons = polygons.len(),
            "reprojecting areas to WGS84"
        );
        reproject_with(transform.as_ref(), polygons)
    }
}

/// Reproject with the built-in transforms
pub fn reproject_to_wgs84(source: &Crs, polygons: &[AreaPolygon]) -> Result<Vec<WgsRing>> {
    GeometryReprojector::builtin().reproject_to_wgs84(source, polygons)
}

/// Apply an already resolved transform to every ring, flattening polygons
pub fn reproject_with(
    transform: &dyn CoordinateTransform,
    polygons: &[AreaPolygon],
) -> Result<Vec<WgsRing>> {
    let mut rings = Vec::with_capacity(polygons.iter().map(AreaPolygon::ring_count).sum());

    for (polygon_index, polygon) in polygons.iter().enumerate() {
        for (ring_index, ring) in polygon.rings().enumerate() {
            let projected = ring
                .iter()
                .enumerate()
                .map(|(point_index, &(x, y))| {
                    transform
                        .transform(x, y)
                        .map(|(lon, lat)| [lon, lat])
                        .map_err(|e| Error::Reprojection {
                            polygon: polygon_index,
                            ring: ring_index,
                            point: point_index,
                            x,
                            y,
                            reason: e.to_string(),
                        })
                })
                .collect::<Result<WgsRing>>()?;
            rings.push(projected);
        }
    }

    debug!(rings = rings.len(), "reprojected rings");
    Ok(rings)
}

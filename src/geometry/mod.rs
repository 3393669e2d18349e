pub mod crs;
pub mod reproject;
pub mod transform;

pub use crs::{Crs, WGS84_EPSG};
pub use reproject::{GeometryReprojector, WgsRing, reproject_to_wgs84, reproject_with};
pub use transform::{BuiltinTransforms, CoordinateTransform, TransformError, TransformProvider};

pub mod area;
pub mod coordinate;

pub use area::AreaPolygon;
pub use coordinate::Coordinate;

//! Coordinate reference system identifiers

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// EPSG code of WGS84 geographic coordinates, required by Valhalla
pub const WGS84_EPSG: u32 = 4326;

/// A source coordinate reference system
///
/// Identifiers that are not EPSG codes are kept verbatim so a custom
/// [`TransformProvider`](super::TransformProvider) can resolve them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Crs {
    Epsg(u32),
    Custom(String),
}

impl Crs {
    pub fn wgs84() -> Self {
        Crs::Epsg(WGS84_EPSG)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Crs::Epsg(code) => Some(*code),
            Crs::Custom(_) => None,
        }
    }

    pub fn is_wgs84(&self) -> bool {
        self.epsg() == Some(WGS84_EPSG)
    }
}

/// Accepts `EPSG:2056`, `epsg:2056` or a bare `2056`
impl FromStr for Crs {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = match trimmed.split_once(':') {
            Some((authority, code)) if authority.eq_ignore_ascii_case("epsg") => code,
            Some(_) => return Ok(Crs::Custom(trimmed.to_string())),
            None => trimmed,
        };
        Ok(code
            .trim()
            .parse()
            .map(Crs::Epsg)
            .unwrap_or_else(|_| Crs::Custom(trimmed.to_string())))
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Epsg(code) => write!(f, "EPSG:{}", code),
            Crs::Custom(id) => write!(f, "{}", id),
        }
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

//! Forward transforms from projected or geographic CRSs to WGS84
//!
//! All built-in transforms are closed-form and pure Rust (no libproj):
//! - EPSG:4326 identity
//! - EPSG:3857 / 900913 spherical Web Mercator
//! - EPSG:326xx / 327xx UTM north/south (Snyder 1987, USGS Prof. Paper 1395)
//! - EPSG:2056 / 21781 Swiss LV95 / LV03 (swisstopo approximate formulas, ~1 m)

use thiserror::Error;

use super::crs::Crs;

/// Why a single point could not be transformed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct TransformError(pub String);

/// A resolved transform from one source CRS to WGS84
pub trait CoordinateTransform {
    /// Transform a source `(x, y)` into `(lon, lat)` degrees
    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), TransformError>;
}

impl<F> CoordinateTransform for F
where
    F: Fn(f64, f64) -> Result<(f64, f64), TransformError>,
{
    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), TransformError> {
        self(x, y)
    }
}

/// Resolves source CRSs into transforms to WGS84
pub trait TransformProvider {
    /// `None` when the CRS is unknown to this provider
    fn to_wgs84(&self, source: &Crs) -> Option<Box<dyn CoordinateTransform + Send + Sync>>;
}

/// Provider backed by the closed-form transforms of this module
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTransforms;

impl TransformProvider for BuiltinTransforms {
    fn to_wgs84(&self, source: &Crs) -> Option<Box<dyn CoordinateTransform + Send + Sync>> {
        if source.is_wgs84() {
            return Some(Box::new(Identity));
        }
        let epsg = source.epsg()?;
        match epsg {
            3857 | 900913 => Some(Box::new(WebMercator)),
            2056 => Some(Box::new(SwissGrid::LV95)),
            21781 => Some(Box::new(SwissGrid::LV03)),
            _ => parse_utm_epsg(epsg).map(|(zone, north)| {
                Box::new(Utm { zone, north }) as Box<dyn CoordinateTransform + Send + Sync>
            }),
        }
    }
}

/// Parse an EPSG code into UTM zone info: `Some((zone, is_north))`.
///
/// - EPSG 326xx → zone xx, North hemisphere
/// - EPSG 327xx → zone xx, South hemisphere
pub fn parse_utm_epsg(epsg: u32) -> Option<(u32, bool)> {
    if (32601..=32660).contains(&epsg) {
        Some((epsg - 32600, true))
    } else if (32701..=32760).contains(&epsg) {
        Some((epsg - 32700, false))
    } else {
        None
    }
}

fn require_finite(x: f64, y: f64) -> Result<(), TransformError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(TransformError(format!("non-finite coordinate ({}, {})", x, y)))
    }
}

#[derive(Debug, Clone, Copy)]
struct Identity;

impl CoordinateTransform for Identity {
    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), TransformError> {
        require_finite(x, y)?;
        Ok((x, y))
    }
}

// ── Spherical Web Mercator ───────────────────────────────────────────────

const MERCATOR_RADIUS: f64 = 6_378_137.0;
const MERCATOR_HALF_WORLD: f64 = std::f64::consts::PI * MERCATOR_RADIUS;

#[derive(Debug, Clone, Copy)]
struct WebMercator;

impl CoordinateTransform for WebMercator {
    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), TransformError> {
        require_finite(x, y)?;
        if x.abs() > MERCATOR_HALF_WORLD * (1.0 + 1e-9) {
            return Err(TransformError(format!(
                "easting {} outside the Web Mercator world extent",
                x
            )));
        }
        let lon = (x / MERCATOR_RADIUS).to_degrees();
        let lat = (y / MERCATOR_RADIUS).sinh().atan().to_degrees();
        Ok((lon, lat))
    }
}

// ── UTM inverse (Snyder 1987, pp. 63-64) ─────────────────────────────────

const A: f64 = 6_378_137.0; // semi-major axis (m)
const F: f64 = 1.0 / 298.257_223_563; // flattening
const E2: f64 = 2.0 * F - F * F; // eccentricity squared
const E_PRIME2: f64 = E2 / (1.0 - E2); // second eccentricity squared
const K0: f64 = 0.9996; // UTM scale factor
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

#[derive(Debug, Clone, Copy)]
struct Utm {
    zone: u32,
    north: bool,
}

impl CoordinateTransform for Utm {
    fn transform(&self, easting: f64, northing: f64) -> Result<(f64, f64), TransformError> {
        require_finite(easting, northing)?;
        if !(0.0..=1_000_000.0).contains(&easting) || !(0.0..=10_000_000.0).contains(&northing) {
            return Err(TransformError(format!(
                "({}, {}) outside UTM zone {}{} extent",
                easting,
                northing,
                self.zone,
                if self.north { 'N' } else { 'S' }
            )));
        }
        Ok(utm_to_wgs84(easting, northing, self.zone, self.north))
    }
}

/// Convert UTM (easting, northing) in metres to WGS84 (longitude, latitude)
/// in degrees for the given zone and hemisphere.
fn utm_to_wgs84(easting: f64, northing: f64, zone: u32, north: bool) -> (f64, f64) {
    let x = easting - FALSE_EASTING;
    let y = if north {
        northing
    } else {
        northing - FALSE_NORTHING_SOUTH
    };

    let lon0 = ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians();

    let e4 = E2 * E2;
    let e6 = e4 * E2;

    // Footpoint latitude from the rectifying latitude (Snyder eq. 7-19, 3-26)
    let m = y / K0;
    let mu = m / (A * (1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
    let e1 = (1.0 - (1.0 - E2).sqrt()) / (1.0 + (1.0 - E2).sqrt());
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let c1 = E_PRIME2 * cos_phi1 * cos_phi1;
    let t1 = tan_phi1 * tan_phi1;
    let denom = 1.0 - E2 * sin_phi1 * sin_phi1;
    let n1 = A / denom.sqrt();
    let r1 = A * (1.0 - E2) / denom.powf(1.5);
    let d = x / (n1 * K0);

    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    // Snyder eq. 8-17
    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * E_PRIME2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                    - 252.0 * E_PRIME2
                    - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    // Snyder eq. 8-18
    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * E_PRIME2 + 24.0 * t1 * t1)
                * d5
                / 120.0)
            / cos_phi1;

    (lon.to_degrees(), lat.to_degrees())
}

// ── Swiss national grids ─────────────────────────────────────────────────

/// Swiss oblique Mercator grid, LV95 or its LV03 predecessor
#[derive(Debug, Clone, Copy)]
struct SwissGrid {
    false_easting: f64,
    false_northing: f64,
}

impl SwissGrid {
    const LV95: SwissGrid = SwissGrid {
        false_easting: 2_600_000.0,
        false_northing: 1_200_000.0,
    };
    const LV03: SwissGrid = SwissGrid {
        false_easting: 600_000.0,
        false_northing: 200_000.0,
    };
}

impl CoordinateTransform for SwissGrid {
    fn transform(&self, easting: f64, northing: f64) -> Result<(f64, f64), TransformError> {
        require_finite(easting, northing)?;

        // Auxiliary values in units of 1000 km relative to Bern
        let y = (easting - self.false_easting) / 1_000_000.0;
        let x = (northing - self.false_northing) / 1_000_000.0;
        if !(-0.3..=0.3).contains(&y) || !(-0.2..=0.2).contains(&x) {
            return Err(TransformError(format!(
                "({}, {}) outside the Swiss grid extent",
                easting, northing
            )));
        }

        // Results in units of 10000"
        let lon = 2.6779094 + 4.728982 * y + 0.791484 * y * x + 0.1306 * y * x * x
            - 0.0436 * y * y * y;
        let lat = 16.9023892 + 3.238272 * x
            - 0.270978 * y * y
            - 0.002528 * x * x
            - 0.0447 * y * y * x
            - 0.0140 * x * x * x;

        Ok((lon * 100.0 / 36.0, lat * 100.0 / 36.0))
    }
}

//! Google/Valhalla encoded polyline format
//!
//! Every value is a zig-zag signed delta split into 5-bit chunks, least
//! significant first, each chunk offset by 63 into printable ASCII with 0x20
//! marking continuation. Latitude and longitude scale by `10^precision`;
//! elevation, when present, is always stored in centimeters.

pub mod decode;
pub mod encode;

pub use decode::{decode_polyline, decode_polyline6};
pub use encode::encode_polyline;

use crate::error::{Error, Result};

/// Precision used by Valhalla route shapes
pub const DEFAULT_PRECISION: u32 = 6;

/// Larger exponents no longer map every grid step to a distinct f64
pub const MAX_PRECISION: u32 = 15;

const ELEVATION_FACTOR: f64 = 100.0;

/// Encoding parameters shared by encoder and decoder
///
/// Both must match what the other side used; a mismatch cannot be detected
/// from the string and silently scales the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolylineOptions {
    pub precision: u32,
    pub is_3d: bool,
}

impl Default for PolylineOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            is_3d: false,
        }
    }
}

impl PolylineOptions {
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            is_3d: false,
        }
    }

    pub fn with_3d(mut self, is_3d: bool) -> Self {
        self.is_3d = is_3d;
        self
    }

    fn factor(&self) -> Result<f64> {
        if self.precision == 0 || self.precision > MAX_PRECISION {
            return Err(Error::InvalidPrecision(self.precision));
        }
        Ok(10u64.pow(self.precision) as f64)
    }
}

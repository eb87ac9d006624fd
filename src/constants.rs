#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.141592653589793238462643;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const TWOPI: f64 = 6.283185307179586476925287;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const HALF_PI: f64 = 1.5707963267948966192313216;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const QUARTER_PI: f64 = 0.7853981633974483096156608;

#[allow(clippy::excessive_precision)]
pub const FOUR_PI: f64 = 12.56637061435917295385057;

#[allow(clippy::excessive_precision)]
pub const DEG_TO_RAD: f64 = 1.745329251994329576923691e-2;

#[allow(clippy::excessive_precision)]
pub const RAD_TO_DEG: f64 = 57.29577951308232087679815;

/// Steradians to square degrees: (180/π)².
#[allow(clippy::excessive_precision)]
pub const STRAD_TO_DEG2: f64 = 3282.806350011743794781695;

/// Deepest subdivision level of the sky pixelization.
///
/// A cell index packs a base face (0-11) with two bits per level of
/// subdivision, so 29 is the deepest level representable in a `u64`.
pub const MAX_LEVEL: u8 = 29;

/// Absolute tolerance used by the comparator family in [`crate::math`].
pub const DOUBLE_TOLERANCE: f64 = 1.0e-15;

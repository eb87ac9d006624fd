//! Tolerance-aware floating-point comparisons and the angular separation
//! kernel.
//!
//! Sphere coordinates are never compared with exact equality. The
//! `double_*` family applies a fixed absolute tolerance of `1e-15` to the
//! right-hand operand only, then applies the exact relational operator.
//! The asymmetry is deliberate: boundary-inclusion decisions in bounds and
//! the coverer depend on the same bias being applied on every comparison,
//! which keeps repeated boundary tests consistent and transitive. Do not
//! replace these with a symmetric or magnitude-scaled epsilon.

use crate::constants::DOUBLE_TOLERANCE;

#[inline]
pub fn double_lt(a: f64, b: f64) -> bool {
    a < b - DOUBLE_TOLERANCE
}

#[inline]
pub fn double_le(a: f64, b: f64) -> bool {
    a <= b + DOUBLE_TOLERANCE
}

#[inline]
pub fn double_gt(a: f64, b: f64) -> bool {
    a > b + DOUBLE_TOLERANCE
}

#[inline]
pub fn double_ge(a: f64, b: f64) -> bool {
    a >= b - DOUBLE_TOLERANCE
}

/// `eq(a, b)` holds iff `le(a, b) && ge(a, b)` under the same tolerance.
#[inline]
pub fn double_eq(a: f64, b: f64) -> bool {
    double_le(a, b) && double_ge(a, b)
}

/// Angular separation between two unit vectors, in radians.
///
/// Uses `atan2(|a × b|, a · b)`, which stays accurate at all separations,
/// unlike the plain `acos` of the dot product near 0 and π.
#[inline]
pub fn angular_separation(ax: f64, ay: f64, az: f64, bx: f64, by: f64, bz: f64) -> f64 {
    let cx = ay * bz - az * by;
    let cy = az * bx - ax * bz;
    let cz = ax * by - ay * bx;
    let cross_mag = libm::sqrt(cx * cx + cy * cy + cz * cz);
    let dot = ax * bx + ay * by + az * bz;
    libm::atan2(cross_mag, dot)
}

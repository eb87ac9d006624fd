//! Unit-sphere direction vectors.
//!
//! [`Point`] is the leaf geometric primitive of the library: a direction on
//! the celestial sphere stored as a Cartesian unit vector. Positions are
//! usually quoted as spherical coordinates (RA/Dec), but containment and
//! separation predicates are cleanest in Cartesian form, so construction
//! normalizes once and everything downstream works with `(x, y, z)`.
//!
//! # Coordinate Conventions
//!
//! - `x` points toward (RA, Dec) = (0°, 0°)
//! - `y` points toward (RA, Dec) = (90°, 0°)
//! - `z` points toward the north celestial pole
//!
//! # Invariant
//!
//! Every `Point` has unit magnitude within floating tolerance. The checked
//! constructors normalize their input and reject vectors that cannot be
//! normalized (zero or non-finite components).
//!
//! ```
//! use astro_sphere::Point;
//!
//! let p = Point::from_xyz(3.0, 4.0, 0.0).unwrap();
//! assert!(p.is_unit());
//!
//! let pole = Point::from_radec_deg(0.0, 90.0).unwrap();
//! assert!((pole.z() - 1.0).abs() < 1e-15);
//! ```

use crate::constants::{DEG_TO_RAD, RAD_TO_DEG};
use crate::errors::{SphereError, SphereResult};
use crate::math::{angular_separation, double_eq};
use std::fmt;

/// A direction on the unit sphere.
///
/// # Construction
///
/// ```
/// use astro_sphere::Point;
///
/// // From Cartesian components (normalized on construction)
/// let p = Point::from_xyz(1.0, 1.0, 0.0).unwrap();
///
/// // From equatorial coordinates
/// let q = Point::from_radec_deg(45.0, 0.0).unwrap();
///
/// assert!(p.angular_separation(&q) < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    x: f64,
    y: f64,
    z: f64,
}

impl Point {
    /// Creates a point from Cartesian components, normalizing to unit length.
    ///
    /// Fails with [`SphereError::InvalidArgument`] if any component is
    /// non-finite or the vector magnitude is too small to normalize.
    pub fn from_xyz(x: f64, y: f64, z: f64) -> SphereResult<Self> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(SphereError::invalid_argument(
                "Point::from_xyz",
                "components must be finite",
            ));
        }
        let mag = libm::sqrt(x * x + y * y + z * z);
        if mag < 1.0e-290 {
            return Err(SphereError::invalid_argument(
                "Point::from_xyz",
                "vector magnitude too small to define a direction",
            ));
        }
        Ok(Self {
            x: x / mag,
            y: y / mag,
            z: z / mag,
        })
    }

    /// Creates a point from right ascension and declination in radians.
    ///
    /// Declination must lie in `[-π/2, π/2]`; right ascension is reduced
    /// modulo 2π.
    pub fn from_radec_rad(ra: f64, dec: f64) -> SphereResult<Self> {
        if !(ra.is_finite() && dec.is_finite()) {
            return Err(SphereError::invalid_argument(
                "Point::from_radec_rad",
                "angles must be finite",
            ));
        }
        if dec < -crate::constants::HALF_PI - 1.0e-12 || dec > crate::constants::HALF_PI + 1.0e-12 {
            return Err(SphereError::invalid_argument(
                "Point::from_radec_rad",
                "declination outside [-pi/2, pi/2]",
            ));
        }
        let (sin_ra, cos_ra) = libm::sincos(ra);
        let (sin_dec, cos_dec) = libm::sincos(dec);
        Ok(Self {
            x: cos_dec * cos_ra,
            y: cos_dec * sin_ra,
            z: sin_dec,
        })
    }

    /// Creates a point from right ascension and declination in degrees.
    pub fn from_radec_deg(ra_deg: f64, dec_deg: f64) -> SphereResult<Self> {
        Self::from_radec_rad(ra_deg * DEG_TO_RAD, dec_deg * DEG_TO_RAD)
    }

    /// Builds a point from components already known to be unit length.
    ///
    /// Used by the pixel projection, whose output is unit by construction.
    #[inline]
    pub(crate) fn from_unit_unchecked(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Builds a unit point from a z coordinate and azimuthal angle.
    pub(crate) fn from_z_phi(z: f64, phi: f64) -> Self {
        let z = z.clamp(-1.0, 1.0);
        let rho = libm::sqrt((1.0 - z) * (1.0 + z));
        let (sin_phi, cos_phi) = libm::sincos(phi);
        Self {
            x: rho * cos_phi,
            y: rho * sin_phi,
            z,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Right ascension in radians, in `[0, 2π)`.
    pub fn ra_rad(&self) -> f64 {
        let ra = libm::atan2(self.y, self.x);
        if ra < 0.0 {
            ra + crate::constants::TWOPI
        } else {
            ra
        }
    }

    /// Declination in radians, in `[-π/2, π/2]`.
    pub fn dec_rad(&self) -> f64 {
        libm::asin(self.z.clamp(-1.0, 1.0))
    }

    /// Right ascension in degrees, in `[0, 360)`.
    #[inline]
    pub fn ra_deg(&self) -> f64 {
        self.ra_rad() * RAD_TO_DEG
    }

    /// Declination in degrees, in `[-90, 90]`.
    #[inline]
    pub fn dec_deg(&self) -> f64 {
        self.dec_rad() * RAD_TO_DEG
    }

    /// Dot product. For unit vectors this is the cosine of the separation.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Angular separation from another point, in radians.
    ///
    /// Accurate at all separations, including very small ones.
    ///
    /// ```
    /// use astro_sphere::Point;
    /// use astro_sphere::constants::HALF_PI;
    ///
    /// let a = Point::from_radec_deg(0.0, 0.0).unwrap();
    /// let b = Point::from_radec_deg(90.0, 0.0).unwrap();
    /// assert!((a.angular_separation(&b) - HALF_PI).abs() < 1e-15);
    /// ```
    #[inline]
    pub fn angular_separation(&self, other: &Self) -> f64 {
        angular_separation(self.x, self.y, self.z, other.x, other.y, other.z)
    }

    /// Angular separation from another point, in degrees.
    #[inline]
    pub fn angular_separation_deg(&self, other: &Self) -> f64 {
        self.angular_separation(other) * RAD_TO_DEG
    }

    /// Returns `true` if the magnitude is 1 within tolerance.
    pub fn is_unit(&self) -> bool {
        double_eq(self.x * self.x + self.y * self.y + self.z * self.z, 1.0)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Point(ra={:.6}deg, dec={:.6}deg)",
            self.ra_deg(),
            self.dec_deg()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HALF_PI;

    #[test]
    fn test_from_xyz_normalizes() {
        let p = Point::from_xyz(3.0, 4.0, 0.0).unwrap();
        assert!(p.is_unit());
        assert!((p.x() - 0.6).abs() < 1e-15);
        assert!((p.y() - 0.8).abs() < 1e-15);
    }

    #[test]
    fn test_from_xyz_rejects_zero() {
        assert!(Point::from_xyz(0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_from_xyz_rejects_non_finite() {
        assert!(Point::from_xyz(f64::NAN, 0.0, 1.0).is_err());
        assert!(Point::from_xyz(f64::INFINITY, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_from_radec_axes() {
        let x = Point::from_radec_deg(0.0, 0.0).unwrap();
        assert!((x.x() - 1.0).abs() < 1e-15);

        let y = Point::from_radec_deg(90.0, 0.0).unwrap();
        assert!((y.y() - 1.0).abs() < 1e-15);

        let pole = Point::from_radec_deg(123.0, 90.0).unwrap();
        assert!((pole.z() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_from_radec_rejects_bad_dec() {
        assert!(Point::from_radec_deg(0.0, 91.0).is_err());
        assert!(Point::from_radec_deg(0.0, -100.0).is_err());
    }

    #[test]
    fn test_radec_roundtrip() {
        for &(ra, dec) in &[
            (0.0, 0.0),
            (45.0, 30.0),
            (180.0, -60.0),
            (359.0, 89.0),
            (270.0, -89.5),
        ] {
            let p = Point::from_radec_deg(ra, dec).unwrap();
            assert!((p.ra_deg() - ra).abs() < 1e-10, "ra for ({}, {})", ra, dec);
            assert!(
                (p.dec_deg() - dec).abs() < 1e-10,
                "dec for ({}, {})",
                ra,
                dec
            );
        }
    }

    #[test]
    fn test_angular_separation() {
        let a = Point::from_radec_deg(0.0, 0.0).unwrap();
        let b = Point::from_radec_deg(90.0, 0.0).unwrap();
        assert!((a.angular_separation(&b) - HALF_PI).abs() < 1e-15);
        assert!((a.angular_separation_deg(&b) - 90.0).abs() < 1e-10);

        let n = Point::from_radec_deg(0.0, 90.0).unwrap();
        let s = Point::from_radec_deg(0.0, -90.0).unwrap();
        assert!((n.angular_separation_deg(&s) - 180.0).abs() < 1e-10);
    }

    #[test]
    fn test_separation_symmetry() {
        let a = Point::from_radec_deg(10.0, 20.0).unwrap();
        let b = Point::from_radec_deg(200.0, -45.0).unwrap();
        assert_eq!(a.angular_separation(&b), b.angular_separation(&a));
        assert!(a.angular_separation(&a) < 1e-15);
    }

    #[test]
    fn test_from_z_phi_unit() {
        for &(z, phi) in &[(0.0, 0.0), (0.5, 1.0), (-0.99, 4.0), (1.0, 2.0)] {
            let p = Point::from_z_phi(z, phi);
            assert!(p.is_unit(), "z={} phi={}", z, phi);
            assert!((p.z() - z).abs() < 1e-15);
        }
    }

    #[test]
    fn test_display() {
        let p = Point::from_radec_deg(45.0, -30.0).unwrap();
        let s = format!("{}", p);
        assert!(s.contains("ra=45.0"));
        assert!(s.contains("dec=-30.0"));
    }
}

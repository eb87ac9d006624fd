//! Geometric sky regions expressed as constraints rather than pixel sets.
//!
//! A [`Bound`] answers point-containment and pixel-intersection queries
//! analytically, without materializing any pixels; the coverer turns a bound
//! into a pixel collection. The variant set is small and fixed, so bounds
//! are a closed enum dispatched by pattern matching — the containment
//! predicates sit on the coverer's hot recursive path and must not pay for
//! dynamic dispatch.
//!
//! Two variants are provided:
//!
//! - [`CircleBound`]: a spherical cap, `center` plus angular radius.
//! - [`AnnulusBound`]: a spherical shell, `center` plus inner/outer radii.
//!
//! All containment comparisons use the tolerant comparator family from
//! [`crate::math`], so a point sitting exactly on a boundary is classified
//! consistently everywhere.
//!
//! ```
//! use astro_sphere::{Bound, CircleBound, Point};
//!
//! let center = Point::from_radec_deg(0.0, 90.0).unwrap();
//! let cap: Bound = CircleBound::from_degrees(center, 10.0).unwrap().into();
//!
//! assert!(cap.contains(&Point::from_radec_deg(45.0, 85.0).unwrap()));
//! assert!(!cap.contains(&Point::from_radec_deg(45.0, 75.0).unwrap()));
//! ```

use crate::constants::{DEG_TO_RAD, PI, TWOPI};
use crate::errors::{SphereError, SphereResult};
use crate::math::{double_ge, double_le};
use crate::pixel::Pixel;
use crate::point::Point;

/// A spherical cap: all directions within `radius` of `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircleBound {
    center: Point,
    radius: f64,
}

impl CircleBound {
    /// Creates a cap from a center and an angular radius in radians.
    ///
    /// Fails with [`SphereError::InvalidArgument`] if the radius is
    /// negative, non-finite, or larger than π.
    pub fn new(center: Point, radius: f64) -> SphereResult<Self> {
        if !radius.is_finite() || radius < 0.0 || radius > PI {
            return Err(SphereError::invalid_argument(
                "CircleBound::new",
                &format!("radius {} must lie in [0, pi]", radius),
            ));
        }
        Ok(Self { center, radius })
    }

    /// Creates a cap from a center and an angular radius in degrees.
    pub fn from_degrees(center: Point, radius_deg: f64) -> SphereResult<Self> {
        Self::new(center, radius_deg * DEG_TO_RAD)
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Angular radius in radians.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn contains(&self, point: &Point) -> bool {
        double_le(self.center.angular_separation(point), self.radius)
    }

    /// Analytic cap area: `2π(1 - cos r)` steradians.
    #[inline]
    pub fn area(&self) -> f64 {
        TWOPI * (1.0 - libm::cos(self.radius))
    }
}

/// A spherical shell: directions whose separation from `center` lies in
/// `[inner, outer]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnulusBound {
    center: Point,
    inner: f64,
    outer: f64,
}

impl AnnulusBound {
    /// Creates a shell from a center and inner/outer angular radii in
    /// radians.
    ///
    /// Fails with [`SphereError::InvalidArgument`] if either radius is
    /// negative or non-finite, if `inner >= outer`, or if `outer > π`.
    pub fn new(center: Point, inner: f64, outer: f64) -> SphereResult<Self> {
        if !inner.is_finite() || !outer.is_finite() || inner < 0.0 || outer < 0.0 {
            return Err(SphereError::invalid_argument(
                "AnnulusBound::new",
                "radii must be finite and non-negative",
            ));
        }
        if inner >= outer {
            return Err(SphereError::invalid_argument(
                "AnnulusBound::new",
                &format!("inner radius {} must be less than outer radius {}", inner, outer),
            ));
        }
        if outer > PI {
            return Err(SphereError::invalid_argument(
                "AnnulusBound::new",
                &format!("outer radius {} must not exceed pi", outer),
            ));
        }
        Ok(Self {
            center,
            inner,
            outer,
        })
    }

    /// Creates a shell from a center and inner/outer radii in degrees.
    pub fn from_degrees(center: Point, inner_deg: f64, outer_deg: f64) -> SphereResult<Self> {
        Self::new(center, inner_deg * DEG_TO_RAD, outer_deg * DEG_TO_RAD)
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Inner angular radius in radians.
    #[inline]
    pub fn inner(&self) -> f64 {
        self.inner
    }

    /// Outer angular radius in radians.
    #[inline]
    pub fn outer(&self) -> f64 {
        self.outer
    }

    #[inline]
    pub fn contains(&self, point: &Point) -> bool {
        let sep = self.center.angular_separation(point);
        double_ge(sep, self.inner) && double_le(sep, self.outer)
    }

    /// Analytic shell area: `2π(cos r_in - cos r_out)` steradians.
    #[inline]
    pub fn area(&self) -> f64 {
        TWOPI * (libm::cos(self.inner) - libm::cos(self.outer))
    }
}

/// An arbitrary sky region, as a closed set of geometric variants.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bound {
    Circle(CircleBound),
    Annulus(AnnulusBound),
}

impl Bound {
    /// The reference direction the bound is defined around.
    pub fn center(&self) -> Point {
        match self {
            Bound::Circle(c) => c.center(),
            Bound::Annulus(a) => a.center(),
        }
    }

    /// Returns `true` if the point satisfies the bound's constraints,
    /// boundary-inclusive under the tolerant comparators.
    pub fn contains(&self, point: &Point) -> bool {
        match self {
            Bound::Circle(c) => c.contains(point),
            Bound::Annulus(a) => a.contains(point),
        }
    }

    /// Conservative pixel-intersection test.
    ///
    /// May return `true` for a pixel the bound does not actually touch, but
    /// never returns `false` for an intersecting pixel — the property the
    /// coverer's recursive pruning requires. The test overlaps the pixel's
    /// bounding cap (center plus [`Pixel::bounding_radius`]) against the
    /// bound's angular extent.
    pub fn may_intersect(&self, pixel: &Pixel) -> bool {
        let sep = self.center().angular_separation(&pixel.center());
        let cap = pixel.bounding_radius();
        match self {
            Bound::Circle(c) => double_le(sep, c.radius() + cap),
            Bound::Annulus(a) => {
                double_le(sep, a.outer() + cap) && double_ge(sep + cap, a.inner())
            }
        }
    }

    /// Conservative full-containment test.
    ///
    /// Returns `true` only if every point of the pixel satisfies the bound:
    /// the pixel's bounding cap must fit entirely inside the bound's
    /// angular extent. A `false` result may still mean the pixel is fully
    /// inside (the cap overestimates the pixel), in which case the coverer
    /// keeps refining.
    pub fn contains_pixel(&self, pixel: &Pixel) -> bool {
        let sep = self.center().angular_separation(&pixel.center());
        let cap = pixel.bounding_radius();
        // No two directions are more than π apart, so the pixel's farthest
        // point from the bound center is at min(sep + cap, π).
        let reach = (sep + cap).min(PI);
        match self {
            Bound::Circle(c) => double_le(reach, c.radius()),
            Bound::Annulus(a) => double_ge(sep - cap, a.inner()) && double_le(reach, a.outer()),
        }
    }

    /// Analytic area of the bound in steradians (never pixel-summed).
    pub fn area(&self) -> f64 {
        match self {
            Bound::Circle(c) => c.area(),
            Bound::Annulus(a) => a.area(),
        }
    }

    /// An angular radius about `point` guaranteed to enclose the bound.
    ///
    /// Seeds recursion-depth estimates: a covering of the bound cannot
    /// require cells farther than this from `point`.
    pub fn bounding_radius_from(&self, point: &Point) -> f64 {
        let sep = self.center().angular_separation(point);
        let extent = match self {
            Bound::Circle(c) => c.radius(),
            Bound::Annulus(a) => a.outer(),
        };
        (sep + extent).min(PI)
    }
}

impl From<CircleBound> for Bound {
    fn from(b: CircleBound) -> Self {
        Bound::Circle(b)
    }
}

impl From<AnnulusBound> for Bound {
    fn from(b: AnnulusBound) -> Self {
        Bound::Annulus(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RAD_TO_DEG;
    use approx::assert_abs_diff_eq;

    fn north_pole() -> Point {
        Point::from_radec_deg(0.0, 90.0).unwrap()
    }

    #[test]
    fn test_circle_construction() {
        assert!(CircleBound::from_degrees(north_pole(), 10.0).is_ok());
        assert!(CircleBound::from_degrees(north_pole(), 0.0).is_ok());
        assert!(CircleBound::from_degrees(north_pole(), 180.0).is_ok());
        assert!(CircleBound::from_degrees(north_pole(), -1.0).is_err());
        assert!(CircleBound::from_degrees(north_pole(), 181.0).is_err());
        assert!(CircleBound::new(north_pole(), f64::NAN).is_err());
    }

    #[test]
    fn test_annulus_construction() {
        let c = north_pole();
        assert!(AnnulusBound::from_degrees(c, 5.0, 10.0).is_ok());
        // inner >= outer is rejected
        assert!(AnnulusBound::from_degrees(c, 12.0, 10.0).is_err());
        assert!(AnnulusBound::from_degrees(c, 10.0, 10.0).is_err());
        assert!(AnnulusBound::from_degrees(c, -1.0, 10.0).is_err());
        assert!(AnnulusBound::from_degrees(c, 5.0, 181.0).is_err());
    }

    #[test]
    fn test_circle_contains() {
        let cap = CircleBound::from_degrees(north_pole(), 10.0).unwrap();
        assert!(cap.contains(&Point::from_radec_deg(120.0, 85.0).unwrap()));
        assert!(cap.contains(&Point::from_radec_deg(0.0, 80.0).unwrap())); // on the rim
        assert!(!cap.contains(&Point::from_radec_deg(0.0, 79.9).unwrap()));
        assert!(cap.contains(&north_pole()));
    }

    #[test]
    fn test_annulus_contains() {
        let shell = AnnulusBound::from_degrees(north_pole(), 5.0, 10.0).unwrap();
        assert!(shell.contains(&Point::from_radec_deg(30.0, 83.0).unwrap()));
        assert!(shell.contains(&Point::from_radec_deg(30.0, 85.0).unwrap())); // inner rim
        assert!(shell.contains(&Point::from_radec_deg(30.0, 80.0).unwrap())); // outer rim
        assert!(!shell.contains(&north_pole()));
        assert!(!shell.contains(&Point::from_radec_deg(30.0, 79.0).unwrap()));
    }

    #[test]
    fn test_areas() {
        let cap = CircleBound::from_degrees(north_pole(), 90.0).unwrap();
        assert_abs_diff_eq!(cap.area(), TWOPI, epsilon = 1e-12); // hemisphere

        let full = CircleBound::from_degrees(north_pole(), 180.0).unwrap();
        assert_abs_diff_eq!(full.area(), 2.0 * TWOPI, epsilon = 1e-12);

        let shell = AnnulusBound::from_degrees(north_pole(), 5.0, 10.0).unwrap();
        let expected = TWOPI
            * (libm::cos(5.0 / RAD_TO_DEG) - libm::cos(10.0 / RAD_TO_DEG));
        assert_abs_diff_eq!(shell.area(), expected, epsilon = 1e-15);

        // Shell area equals the difference of its caps.
        let outer_cap = CircleBound::from_degrees(north_pole(), 10.0).unwrap();
        let inner_cap = CircleBound::from_degrees(north_pole(), 5.0).unwrap();
        assert_abs_diff_eq!(
            shell.area(),
            outer_cap.area() - inner_cap.area(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_may_intersect_never_misses() {
        // Any pixel containing a point of the bound must report possible
        // intersection.
        let cap: Bound = CircleBound::from_degrees(north_pole(), 10.0).unwrap().into();
        for level in [0u8, 2, 4, 6] {
            for i in 0..40 {
                let dec = 80.0 + (i as f64) * 0.25;
                let ra = (i as f64) * 53.0 % 360.0;
                let p = Point::from_radec_deg(ra, dec).unwrap();
                assert!(cap.contains(&p));
                let pix = Pixel::from_point(&p, level).unwrap();
                assert!(
                    cap.may_intersect(&pix),
                    "missed {} at level {}",
                    pix,
                    level
                );
            }
        }
    }

    #[test]
    fn test_may_intersect_prunes_far_pixels() {
        let cap: Bound = CircleBound::from_degrees(north_pole(), 10.0).unwrap().into();
        let far = Point::from_radec_deg(0.0, -80.0).unwrap();
        let pix = Pixel::from_point(&far, 6).unwrap();
        assert!(!cap.may_intersect(&pix));
    }

    #[test]
    fn test_contains_pixel() {
        let cap: Bound = CircleBound::from_degrees(north_pole(), 10.0).unwrap().into();

        // A fine pixel at the pole is fully inside.
        let pix = Pixel::from_point(&north_pole(), 8).unwrap();
        assert!(cap.contains_pixel(&pix));

        // A pixel straddling the rim is not.
        let rim = Point::from_radec_deg(0.0, 80.0).unwrap();
        let pix = Pixel::from_point(&rim, 8).unwrap();
        assert!(!cap.contains_pixel(&pix));

        // Full containment implies all vertices are contained.
        let inside = Point::from_radec_deg(45.0, 87.0).unwrap();
        let pix = Pixel::from_point(&inside, 8).unwrap();
        if cap.contains_pixel(&pix) {
            for v in pix.vertices().iter() {
                assert!(cap.contains(v));
            }
        }
    }

    #[test]
    fn test_annulus_pixel_predicates() {
        let shell: Bound = AnnulusBound::from_degrees(north_pole(), 5.0, 10.0)
            .unwrap()
            .into();

        // The pole pixel is inside the hole: may intersect must be false for
        // a fine pixel, and containment certainly false.
        let pole_pix = Pixel::from_point(&north_pole(), 10).unwrap();
        assert!(!shell.contains_pixel(&pole_pix));
        assert!(!shell.may_intersect(&pole_pix));

        // A fine pixel in the middle of the shell is fully contained.
        let mid = Point::from_radec_deg(10.0, 82.5).unwrap();
        let pix = Pixel::from_point(&mid, 10).unwrap();
        assert!(shell.may_intersect(&pix));
        assert!(shell.contains_pixel(&pix));
    }

    #[test]
    fn test_bounding_radius_from() {
        let cap: Bound = CircleBound::from_degrees(north_pole(), 10.0).unwrap().into();
        let p = Point::from_radec_deg(0.0, 60.0).unwrap();
        let r = cap.bounding_radius_from(&p);
        // 30 degrees to the center plus a 10 degree radius.
        assert_abs_diff_eq!(r * RAD_TO_DEG, 40.0, epsilon = 1e-9);

        // From the center itself, the bound's own extent.
        let r = cap.bounding_radius_from(&north_pole());
        assert_abs_diff_eq!(r * RAD_TO_DEG, 10.0, epsilon = 1e-9);
    }
}

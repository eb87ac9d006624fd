//! Spherical pixelization and geometry for astronomical statistics.
//!
//! `astro-sphere` provides the geometric substrate for angular correlation
//! analysis on the celestial sphere: unit-vector points, a hierarchical
//! equal-area pixelization, geometric bounds with pixel coverings, jackknife
//! region maps, and angular separation bins. It is pure Rust with no runtime
//! FFI.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`point`] | Unit vectors on the sphere, RA/Dec conversion, separations |
//! | [`pixel`] | Hierarchical equal-area cells, subdivision, hierarchy order |
//! | [`bound`] | Spherical caps and annuli, containment, analytic areas |
//! | [`coverer`] | Pixel coverings of bounds, budgeted and center-rule |
//! | [`region`] | Equal-area contiguous jackknife regions |
//! | [`bins`] | Half-open angular separation bins, merge-based accumulation |
//! | [`math`] | Tolerant float comparators, angular separation |
//! | [`constants`] | Unit conversions, tolerance, pixelization limits |
//! | [`errors`] | [`SphereError`] and [`SphereResult`] |
//!
//! # Covering Pipeline
//!
//! A typical analysis sets up its geometry once and then runs lookups from
//! many threads:
//!
//! ```
//! use astro_sphere::{AngularBins, Bound, CircleBound, Coverer, Point, RegionMap};
//!
//! // 1. Describe the survey footprint as a bound.
//! let center = Point::from_radec_deg(180.0, 45.0)?;
//! let footprint: Bound = CircleBound::from_degrees(center, 5.0)?.into();
//!
//! // 2. Approximate it with pixels for indexing.
//! let coverer = Coverer::new(8)?;
//! let covering = coverer.get_covering(&footprint);
//! assert!(!covering.is_empty());
//!
//! // 3. Partition it into jackknife regions for error estimation.
//! let regions = RegionMap::new(&footprint, 8)?;
//! assert_eq!(regions.region_for(&center)?, regions.region_for(&center)?);
//!
//! // 4. Bin pair separations.
//! let mut bins = AngularBins::log(0.01, 5.0, 16)?;
//! bins.accumulate(0.3, 1.0);
//! # Ok::<(), astro_sphere::SphereError>(())
//! ```
//!
//! # Re-exports
//!
//! Common types are re-exported at the crate root for convenience:
//!
//! ```
//! use astro_sphere::{Point, Pixel, Bound, CircleBound, AnnulusBound};
//! use astro_sphere::{Coverer, Covering, RegionMap, AngularBin, AngularBins};
//! use astro_sphere::{SphereError, SphereResult};
//! ```
//!
//! # Design Notes
//!
//! - **Radians internally**: All geometric computations use radians;
//!   constructors and accessors ending in `_deg` convert at the boundary.
//!
//! - **Tolerant comparisons**: Geometric predicates go through the
//!   [`math`] comparator family with a fixed absolute tolerance, so points
//!   on a bound's rim test as contained regardless of rounding direction.
//!
//! - **Immutable geometry**: [`Pixel`], [`Bound`], and [`RegionMap`] are
//!   immutable after construction and safe to share across threads without
//!   locking. The only mutable accumulator, [`AngularBins`], is designed
//!   for worker-local copies merged at synchronization points.

pub mod bins;
pub mod bound;
pub mod constants;
pub mod coverer;
pub mod errors;
pub mod math;
pub mod pixel;
pub mod point;
pub mod region;

pub use bins::{AngularBin, AngularBins};
pub use bound::{AnnulusBound, Bound, CircleBound};
pub use coverer::{Coverer, Covering};
pub use errors::{SphereError, SphereResult};
pub use pixel::Pixel;
pub use point::Point;
pub use region::RegionMap;

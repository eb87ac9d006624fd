//! Jackknife region maps.
//!
//! Resampling-based error estimation needs the analysis area split into N
//! roughly equal-area, spatially contiguous regions: correlation estimators
//! are then re-run leaving one region out at a time, and the scatter across
//! the N resamplings estimates the statistical error.
//!
//! [`RegionMap`] builds that partition once from a bound: the bound is
//! covered at a single level with the center rule, the covering is walked in
//! hierarchy order — the space-filling order of the pixelization, so
//! consecutive cells are spatial neighbors — and a running-area accumulator
//! assigns contiguous region ids `[0, N)`. Cells at one level are equal
//! area, so the regions differ by at most one cell.
//!
//! The map is immutable after construction and safe for unsynchronized
//! concurrent lookups.
//!
//! ```
//! use astro_sphere::{Bound, CircleBound, Point, RegionMap};
//!
//! let center = Point::from_radec_deg(0.0, 90.0).unwrap();
//! let cap: Bound = CircleBound::from_degrees(center, 30.0).unwrap().into();
//! let map = RegionMap::new(&cap, 8).unwrap();
//!
//! let id = map.region_for(&center).unwrap();
//! assert!(id < 8);
//!
//! // Points outside the covered area are an explicit error, never region 0.
//! let outside = Point::from_radec_deg(0.0, -45.0).unwrap();
//! assert!(map.region_for(&outside).is_err());
//! ```

use crate::bound::Bound;
use crate::constants::MAX_LEVEL;
use crate::coverer::Coverer;
use crate::errors::{SphereError, SphereResult};
use crate::pixel::Pixel;
use crate::point::Point;

/// Minimum covering cells per region the automatic level selection aims
/// for. Several cells per region keep the equal-area cut balanced.
const MIN_CELLS_PER_REGION: u64 = 8;

/// An immutable partition of a covered sky area into equal-area jackknife
/// regions.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionMap {
    level: u8,
    n_regions: u32,
    total_area: f64,
    region_areas: Vec<f64>,
    /// (cell, region id) pairs sorted in hierarchy order.
    cells: Vec<(Pixel, u32)>,
}

impl RegionMap {
    /// Builds a region map over `bound`, selecting the covering level
    /// automatically so each region spans at least
    /// [`MIN_CELLS_PER_REGION`] cells.
    ///
    /// Fails with [`SphereError::InvalidArgument`] if `n_regions` is zero,
    /// or with [`SphereError::PrecisionLimit`] if the bound cannot be
    /// resolved into enough cells even at [`MAX_LEVEL`].
    pub fn new(bound: &Bound, n_regions: u32) -> SphereResult<Self> {
        if n_regions == 0 {
            return Err(SphereError::invalid_argument(
                "RegionMap::new",
                "region count must be at least 1",
            ));
        }
        let target_cells = MIN_CELLS_PER_REGION * n_regions as u64;

        // Seed from the analytic area, then deepen until the actual
        // covering is large enough.
        let mut level = 0u8;
        while level < MAX_LEVEL
            && bound.area() / Pixel::level_area_sr(level) < target_cells as f64
        {
            level += 1;
        }
        let coverer = Coverer::new(level)?;
        let mut covering = coverer.get_simple_covering(bound, level)?;
        while (covering.len() as u64) < target_cells && level < MAX_LEVEL {
            level += 1;
            covering = coverer.get_simple_covering(bound, level)?;
        }
        if (covering.len() as u64) < n_regions as u64 {
            return Err(SphereError::precision_limit(
                "RegionMap::new",
                &format!(
                    "bound resolves to {} cells at MAX_LEVEL, fewer than {} regions",
                    covering.len(),
                    n_regions
                ),
            ));
        }
        Self::from_covering(covering, level, n_regions)
    }

    /// Builds a region map with an explicit covering level.
    ///
    /// Fails with [`SphereError::InvalidArgument`] if `n_regions` is zero,
    /// `level` exceeds [`MAX_LEVEL`], or the covering has fewer cells than
    /// regions.
    pub fn with_level(bound: &Bound, n_regions: u32, level: u8) -> SphereResult<Self> {
        if n_regions == 0 {
            return Err(SphereError::invalid_argument(
                "RegionMap::with_level",
                "region count must be at least 1",
            ));
        }
        let coverer = Coverer::new(level)?;
        let covering = coverer.get_simple_covering(bound, level)?;
        if (covering.len() as u64) < n_regions as u64 {
            return Err(SphereError::invalid_argument(
                "RegionMap::with_level",
                &format!(
                    "covering at level {} has {} cells, fewer than {} regions",
                    level,
                    covering.len(),
                    n_regions
                ),
            ));
        }
        Self::from_covering(covering, level, n_regions)
    }

    fn from_covering(covering: Vec<Pixel>, level: u8, n_regions: u32) -> SphereResult<Self> {
        let cell_area = Pixel::level_area_sr(level);
        let total_area = cell_area * covering.len() as f64;
        let target = total_area / n_regions as f64;

        let mut region_areas = vec![0.0f64; n_regions as usize];
        let mut cells = Vec::with_capacity(covering.len());
        let mut area_before = 0.0f64;
        for pix in covering {
            // Cut on the cell midpoint: the cell joins the region its
            // middle falls into along the running accumulator.
            let id = (((area_before + 0.5 * cell_area) / target) as u32).min(n_regions - 1);
            region_areas[id as usize] += cell_area;
            cells.push((pix, id));
            area_before += cell_area;
        }

        Ok(Self {
            level,
            n_regions,
            total_area,
            region_areas,
            cells,
        })
    }

    /// Number of regions; ids are the contiguous integers `[0, n_regions)`.
    #[inline]
    pub fn n_regions(&self) -> u32 {
        self.n_regions
    }

    /// Covering level the map was built at.
    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Total covered area in steradians.
    #[inline]
    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    /// Area of one region in steradians.
    ///
    /// Fails with [`SphereError::InvalidArgument`] for an id outside
    /// `[0, n_regions)`.
    pub fn region_area(&self, id: u32) -> SphereResult<f64> {
        self.region_areas
            .get(id as usize)
            .copied()
            .ok_or_else(|| {
                SphereError::invalid_argument(
                    "RegionMap::region_area",
                    &format!("region id {} out of range [0, {})", id, self.n_regions),
                )
            })
    }

    /// Resolves the region id of a point.
    ///
    /// Fails with [`SphereError::OutOfRange`] if the point lies outside the
    /// covered area. A miss is always surfaced; no default id is ever
    /// returned.
    pub fn region_for(&self, point: &Point) -> SphereResult<u32> {
        let pix = Pixel::containing(point, self.level);
        match self.cells.binary_search_by(|(cell, _)| cell.cmp(&pix)) {
            Ok(i) => Ok(self.cells[i].1),
            Err(_) => Err(SphereError::out_of_range(
                "RegionMap::region_for",
                &format!(
                    "point at (ra={:.4}, dec={:.4}) deg outside the covered area",
                    point.ra_deg(),
                    point.dec_deg()
                ),
            )),
        }
    }

    /// The (cell, region id) pairs of the map in hierarchy order.
    ///
    /// External code can persist these pairs and rebuild lookups from them.
    pub fn cells(&self) -> impl Iterator<Item = (Pixel, u32)> + '_ {
        self.cells.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::CircleBound;
    use approx::assert_abs_diff_eq;

    fn pole_cap(radius_deg: f64) -> Bound {
        let pole = Point::from_radec_deg(0.0, 90.0).unwrap();
        CircleBound::from_degrees(pole, radius_deg).unwrap().into()
    }

    #[test]
    fn test_rejects_zero_regions() {
        assert!(RegionMap::new(&pole_cap(30.0), 0).is_err());
        assert!(RegionMap::with_level(&pole_cap(30.0), 0, 4).is_err());
    }

    #[test]
    fn test_rejects_too_coarse_level() {
        // At level 0 a 5 degree cap covers at most a cell or two.
        assert!(RegionMap::with_level(&pole_cap(5.0), 16, 0).is_err());
    }

    #[test]
    fn test_region_ids_contiguous() {
        let map = RegionMap::new(&pole_cap(30.0), 8).unwrap();
        let mut seen = vec![false; 8];
        for (_, id) in map.cells() {
            assert!(id < 8);
            seen[id as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every region id must be used");
    }

    #[test]
    fn test_region_areas_sum_to_total() {
        let map = RegionMap::new(&pole_cap(30.0), 8).unwrap();
        let sum: f64 = (0..8).map(|id| map.region_area(id).unwrap()).sum();
        assert_abs_diff_eq!(sum, map.total_area(), epsilon = 1e-12);

        // And the covered total tracks the analytic bound area.
        let analytic = pole_cap(30.0).area();
        assert!((map.total_area() - analytic).abs() / analytic < 0.05);
    }

    #[test]
    fn test_region_balance() {
        let map = RegionMap::new(&pole_cap(30.0), 8).unwrap();
        let areas: Vec<f64> = (0..8).map(|id| map.region_area(id).unwrap()).collect();
        let max = areas.iter().cloned().fold(f64::MIN, f64::max);
        let min = areas.iter().cloned().fold(f64::MAX, f64::min);
        assert!(min > 0.0);
        assert!(
            max / min <= 1.2,
            "imbalance {} exceeds 1.2 (max {}, min {})",
            max / min,
            max,
            min
        );
    }

    #[test]
    fn test_region_for_resolves_and_is_idempotent() {
        let map = RegionMap::new(&pole_cap(30.0), 8).unwrap();
        for i in 0..50 {
            let ra = (i as f64 * 47.0) % 360.0;
            let dec = 66.0 + (i as f64 * 0.53) % 23.0;
            let p = Point::from_radec_deg(ra, dec).unwrap();
            let id = map.region_for(&p).unwrap();
            assert!(id < 8);
            assert_eq!(map.region_for(&p).unwrap(), id);
        }
    }

    #[test]
    fn test_region_for_outside_is_error() {
        let map = RegionMap::new(&pole_cap(30.0), 8).unwrap();
        let outside = Point::from_radec_deg(10.0, -10.0).unwrap();
        let err = map.region_for(&outside).unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, SphereError::OutOfRange { .. }));
    }

    #[test]
    fn test_regions_are_contiguous_runs() {
        // Walking cells in hierarchy order, the region id never decreases.
        let map = RegionMap::new(&pole_cap(30.0), 8).unwrap();
        let ids: Vec<u32> = map.cells().map(|(_, id)| id).collect();
        for w in ids.windows(2) {
            assert!(w[1] == w[0] || w[1] == w[0] + 1);
        }
    }

    #[test]
    fn test_single_region() {
        let map = RegionMap::new(&pole_cap(20.0), 1).unwrap();
        let p = Point::from_radec_deg(100.0, 80.0).unwrap();
        assert_eq!(map.region_for(&p).unwrap(), 0);
        assert_abs_diff_eq!(map.region_area(0).unwrap(), map.total_area(), epsilon = 1e-12);
    }

    #[test]
    fn test_with_level_matches_auto_level_semantics() {
        let bound = pole_cap(40.0);
        let auto = RegionMap::new(&bound, 4).unwrap();
        let explicit = RegionMap::with_level(&bound, 4, auto.level()).unwrap();
        let p = Point::from_radec_deg(33.0, 75.0).unwrap();
        assert_eq!(
            auto.region_for(&p).unwrap(),
            explicit.region_for(&p).unwrap()
        );
    }

    #[test]
    fn test_region_area_bad_id() {
        let map = RegionMap::new(&pole_cap(30.0), 4).unwrap();
        assert!(map.region_area(4).is_err());
    }
}

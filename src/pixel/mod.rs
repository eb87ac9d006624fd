//! Hierarchical sky pixels.
//!
//! [`Pixel`] is a cell in a level-indexed quad subdivision of the sphere:
//! 12 base cells at level 0, and exactly four children per cell at each
//! deeper level. Cells at a given level tile the sphere without gaps or
//! overlaps and all have the same area, so a cell's area is a deterministic
//! function of its level alone.
//!
//! The cell index uses the nested scheme: the base face occupies the high
//! bits and each level of subdivision appends two bits of Z-order position,
//! so `parent` and `children` are two-bit shifts and sorting by index walks
//! the sphere along a spatially local, space-filling order. That ordering is
//! what makes contiguous index ranges spatially contiguous regions, which
//! the jackknife region map relies on.
//!
//! ```
//! use astro_sphere::{Pixel, Point};
//!
//! let p = Point::from_radec_deg(83.6, 22.0).unwrap();
//! let pix = Pixel::from_point(&p, 10).unwrap();
//! assert!(pix.contains(&p));
//! assert_eq!(pix.parent().unwrap().level(), 9);
//!
//! let kids = pix.children().unwrap();
//! let child_sum: f64 = kids.iter().map(|c| c.area_sr()).sum();
//! assert!((child_sum - pix.area_sr()).abs() < 1e-18);
//! ```

mod projection;

use crate::constants::{MAX_LEVEL, PI};
use crate::errors::{SphereError, SphereResult};
use crate::point::Point;
use std::cmp::Ordering;
use std::fmt;

/// A cell in the hierarchical pixelization of the sphere.
///
/// Identified by a subdivision level in `[0, MAX_LEVEL]` and a nested index
/// in `[0, 12 * 4^level)`. Ordering is the hierarchy order: cells sort by
/// their position along the space-filling curve, with an ancestor sorting
/// immediately before its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pixel {
    level: u8,
    index: u64,
}

impl Pixel {
    /// The twelve level-0 base cells.
    pub fn base_cells() -> [Pixel; 12] {
        let mut cells = [Pixel { level: 0, index: 0 }; 12];
        for (face, cell) in cells.iter_mut().enumerate() {
            cell.index = face as u64;
        }
        cells
    }

    /// Creates a pixel from a raw (level, index) pair.
    ///
    /// Fails with [`SphereError::InvalidArgument`] if the level exceeds
    /// [`MAX_LEVEL`] or the index is outside `[0, 12 * 4^level)`.
    pub fn from_raw(level: u8, index: u64) -> SphereResult<Self> {
        if level > MAX_LEVEL {
            return Err(SphereError::invalid_argument(
                "Pixel::from_raw",
                &format!("level {} exceeds MAX_LEVEL {}", level, MAX_LEVEL),
            ));
        }
        let n_cells = 12u64 << (2 * level as u32);
        if index >= n_cells {
            return Err(SphereError::invalid_argument(
                "Pixel::from_raw",
                &format!("index {} out of range for level {}", index, level),
            ));
        }
        Ok(Self { level, index })
    }

    /// Locates the pixel containing a point at the requested level.
    ///
    /// Fails with [`SphereError::InvalidArgument`] if the level exceeds
    /// [`MAX_LEVEL`].
    pub fn from_point(point: &Point, level: u8) -> SphereResult<Self> {
        if level > MAX_LEVEL {
            return Err(SphereError::invalid_argument(
                "Pixel::from_point",
                &format!("level {} exceeds MAX_LEVEL {}", level, MAX_LEVEL),
            ));
        }
        Ok(Self::containing(point, level))
    }

    /// Infallible point location for a level already known to be valid.
    pub(crate) fn containing(point: &Point, level: u8) -> Self {
        let phi = libm::atan2(point.y(), point.x());
        let nside = 1u64 << level;
        let (face, ix, iy) = projection::ang_to_face_xy(phi, point.z(), nside);
        let index =
            ((face as u64) << (2 * level as u32)) | projection::xy_to_zorder(ix, iy, level);
        Self { level, index }
    }

    /// Subdivision level; 0 is coarsest.
    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Nested cell index at this level.
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// The containing cell one level up.
    ///
    /// Fails with [`SphereError::InvalidArgument`] at level 0.
    pub fn parent(&self) -> SphereResult<Pixel> {
        if self.level == 0 {
            return Err(SphereError::invalid_argument(
                "Pixel::parent",
                "base cells have no parent",
            ));
        }
        Ok(Self {
            level: self.level - 1,
            index: self.index >> 2,
        })
    }

    /// The four child cells one level down, in hierarchy order.
    ///
    /// Fails with [`SphereError::InvalidArgument`] at [`MAX_LEVEL`].
    pub fn children(&self) -> SphereResult<[Pixel; 4]> {
        if self.level >= MAX_LEVEL {
            return Err(SphereError::invalid_argument(
                "Pixel::children",
                &format!("cannot subdivide below MAX_LEVEL {}", MAX_LEVEL),
            ));
        }
        let base = self.index << 2;
        let level = self.level + 1;
        Ok([
            Self { level, index: base },
            Self {
                level,
                index: base + 1,
            },
            Self {
                level,
                index: base + 2,
            },
            Self {
                level,
                index: base + 3,
            },
        ])
    }

    /// Cell area in steradians: `4π / (12 * 4^level)`.
    ///
    /// Deterministic from level; all cells at a level are equal-area.
    #[inline]
    pub fn area_sr(&self) -> f64 {
        Self::level_area_sr(self.level)
    }

    /// Area of any cell at the given level, in steradians.
    #[inline]
    pub fn level_area_sr(level: u8) -> f64 {
        PI / (3.0 * (1u64 << (2 * level as u32)) as f64)
    }

    /// The direction of the cell center.
    pub fn center(&self) -> Point {
        let (face, ix, iy) = self.face_xy();
        let nside = 1u64 << self.level;
        let x = (ix as f64 + 0.5) / nside as f64;
        let y = (iy as f64 + 0.5) / nside as f64;
        let (z, phi) = projection::face_xy_to_ang(face, x, y);
        Point::from_z_phi(z, phi)
    }

    /// The four corner directions of the cell.
    pub fn vertices(&self) -> [Point; 4] {
        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        self.boundary_points(&corners)
    }

    /// A conservative angular radius of the cell about its center.
    ///
    /// Takes the largest center-to-boundary separation over the corners and
    /// edge midpoints, padded by 5% to cover the slight bulge of cell edges
    /// between sampled boundary points. Every point of the cell lies within
    /// this radius of the center.
    pub fn bounding_radius(&self) -> f64 {
        let samples = [
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (0.5, 0.0),
            (1.0, 0.5),
            (0.5, 1.0),
            (0.0, 0.5),
        ];
        let center = self.center();
        let boundary = self.boundary_points(&samples);
        let mut max_sep = 0.0f64;
        for p in boundary.iter() {
            max_sep = max_sep.max(center.angular_separation(p));
        }
        max_sep * 1.05
    }

    /// Returns `true` if the point lies in this cell.
    pub fn contains(&self, point: &Point) -> bool {
        Self::containing(point, self.level).index == self.index
    }

    /// Returns `true` if `other` is a strict descendant of this cell.
    pub fn is_ancestor_of(&self, other: &Pixel) -> bool {
        self.level < other.level
            && (other.index >> (2 * (other.level - self.level) as u32)) == self.index
    }

    /// Position of the cell's start along the space-filling curve, expressed
    /// at [`MAX_LEVEL`] resolution. Drives the hierarchy ordering.
    #[inline]
    fn range_start(&self) -> u64 {
        self.index << (2 * (MAX_LEVEL - self.level) as u32)
    }

    fn face_xy(&self) -> (u8, u64, u64) {
        let face = (self.index >> (2 * self.level as u32)) as u8;
        let zorder = self.index & ((1u64 << (2 * self.level as u32)) - 1);
        let (ix, iy) = projection::zorder_to_xy(zorder, self.level);
        (face, ix, iy)
    }

    fn boundary_points<const N: usize>(&self, offsets: &[(f64, f64); N]) -> [Point; N] {
        let (face, ix, iy) = self.face_xy();
        let nside = 1u64 << self.level;
        let mut points = [Point::from_unit_unchecked(0.0, 0.0, 1.0); N];
        for (point, (dx, dy)) in points.iter_mut().zip(offsets.iter()) {
            let x = (ix as f64 + dx) / nside as f64;
            let y = (iy as f64 + dy) / nside as f64;
            let (z, phi) = projection::face_xy_to_ang(face, x, y);
            *point = Point::from_z_phi(z, phi);
        }
        points
    }
}

impl Ord for Pixel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.range_start()
            .cmp(&other.range_start())
            .then(self.level.cmp(&other.level))
    }
}

impl PartialOrd for Pixel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pixel(level={}, index={})", self.level, self.index)
    }
}

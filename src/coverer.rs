//! Hierarchical pixel coverings of sky bounds.
//!
//! The coverer converts a [`Bound`] into a collection of [`Pixel`]s at or
//! below a target subdivision level, trading cell count against
//! approximation error. Refinement is top-down from the 12 base cells with
//! an explicit work queue, so stack depth stays bounded regardless of the
//! target level:
//!
//! - a cell the bound cannot touch is discarded (`may_intersect` pruning),
//! - a cell fully inside the bound is accepted without descending,
//! - a partially overlapping cell is split into its four children until the
//!   target level (or the cell budget) is reached, at which point it is
//!   accepted as an approximation.
//!
//! Every covering satisfies two contracts:
//!
//! - **completeness**: every point the bound contains lies in some returned
//!   cell (modulo boundary tolerance), because pruning only discards cells
//!   the conservative intersection test rejects;
//! - **antichain**: no returned cell is an ancestor of another, because a
//!   cell is only ever replaced by its children, never kept alongside them.
//!
//! The coverer holds no mutable state and retains no reference to the
//! bounds it covers: covering is a pure function of (bound, budget), so
//! independent bounds may be covered concurrently. [`Coverer::get_coverings`]
//! does exactly that with a parallel iterator.
//!
//! ```
//! use astro_sphere::{Bound, CircleBound, Coverer, Point};
//!
//! let center = Point::from_radec_deg(0.0, 90.0).unwrap();
//! let cap: Bound = CircleBound::from_degrees(center, 10.0).unwrap().into();
//!
//! let coverer = Coverer::new(6).unwrap();
//! let covering = coverer.get_covering(&cap);
//! assert!(!covering.is_empty());
//!
//! // Every covered point is inside some cell of the covering.
//! let p = Point::from_radec_deg(200.0, 85.0).unwrap();
//! assert!(covering.iter().any(|pix| pix.contains(&p)));
//! ```

use crate::bound::Bound;
use crate::constants::MAX_LEVEL;
use crate::errors::{SphereError, SphereResult};
use crate::pixel::Pixel;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A covering produced under a cell budget.
#[derive(Debug, Clone)]
pub struct Covering {
    /// Cells of the covering, sorted in hierarchy order.
    pub pixels: Vec<Pixel>,
    /// `false` when the budget could not be honored even with the coarsest
    /// valid covering (fewer cells than intersecting base cells). The
    /// pixels are still a correct best-effort covering.
    pub within_budget: bool,
}

/// Work-queue entry: partially overlapping cells ordered so the cell with
/// the largest possible over-covered excess (the coarsest, i.e. largest,
/// cell) refines first. Ties break on hierarchy order, which makes the
/// refinement sequence deterministic for a given bound and budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate(Pixel);

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .level()
            .cmp(&self.0.level())
            .then_with(|| other.0.cmp(&self.0))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Converts bounds into pixel coverings at or below a target level.
#[derive(Debug, Clone, Copy)]
pub struct Coverer {
    max_level: u8,
}

impl Coverer {
    /// Creates a coverer refining no deeper than `max_level`.
    ///
    /// Fails with [`SphereError::InvalidArgument`] if `max_level` exceeds
    /// [`MAX_LEVEL`].
    pub fn new(max_level: u8) -> SphereResult<Self> {
        if max_level > MAX_LEVEL {
            return Err(SphereError::invalid_argument(
                "Coverer::new",
                &format!("max_level {} exceeds MAX_LEVEL {}", max_level, MAX_LEVEL),
            ));
        }
        Ok(Self { max_level })
    }

    /// Deepest level this coverer refines to.
    #[inline]
    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Covers a bound with no cell budget.
    ///
    /// Partially overlapping cells are refined all the way to the target
    /// level before being accepted, so this is the tightest covering the
    /// level permits. The result is complete, an antichain, and sorted in
    /// hierarchy order.
    pub fn get_covering(&self, bound: &Bound) -> Vec<Pixel> {
        self.covering_impl(bound, None).pixels
    }

    /// Covers a bound with at most `max_pixels` cells.
    ///
    /// Completeness is never sacrificed: when the budget disallows further
    /// refinement, the partially overlapping cell is accepted whole, which
    /// over-covers rather than under-covers. The one case the budget cannot
    /// be honored is a budget below the number of intersecting base cells —
    /// level 0 is already the coarsest valid covering — which is reported
    /// via [`Covering::within_budget`] rather than silently mis-covered.
    ///
    /// Fails with [`SphereError::InvalidArgument`] if `max_pixels` is zero.
    pub fn get_covering_with_budget(
        &self,
        bound: &Bound,
        max_pixels: usize,
    ) -> SphereResult<Covering> {
        if max_pixels == 0 {
            return Err(SphereError::invalid_argument(
                "Coverer::get_covering_with_budget",
                "cell budget must be at least 1",
            ));
        }
        Ok(self.covering_impl(bound, Some(max_pixels)))
    }

    /// Covers a bound at a single fixed level using the center rule: a cell
    /// belongs to the covering iff the bound contains its center.
    ///
    /// Unlike [`get_covering`](Self::get_covering) this is not a superset
    /// of the bound, but boundary over- and under-coverage cancel to first
    /// order, so the summed cell area tracks the bound's analytic area.
    /// The region map builds from this covering for exactly that reason.
    ///
    /// Fails with [`SphereError::InvalidArgument`] if `level` exceeds
    /// [`MAX_LEVEL`].
    pub fn get_simple_covering(&self, bound: &Bound, level: u8) -> SphereResult<Vec<Pixel>> {
        if level > MAX_LEVEL {
            return Err(SphereError::invalid_argument(
                "Coverer::get_simple_covering",
                &format!("level {} exceeds MAX_LEVEL {}", level, MAX_LEVEL),
            ));
        }
        let mut accepted = Vec::new();
        let mut stack: Vec<Pixel> = Pixel::base_cells()
            .into_iter()
            .filter(|cell| bound.may_intersect(cell))
            .collect();
        while let Some(pix) = stack.pop() {
            if pix.level() == level {
                if bound.contains(&pix.center()) {
                    accepted.push(pix);
                }
                continue;
            }
            match pix.children() {
                Ok(kids) => {
                    for kid in kids {
                        if bound.may_intersect(&kid) {
                            stack.push(kid);
                        }
                    }
                }
                // unreachable: the loop never descends past `level`
                Err(_) => accepted.push(pix),
            }
        }
        accepted.sort_unstable();
        Ok(accepted)
    }

    /// Covers each bound independently in parallel.
    ///
    /// Covering is a pure function of the bound, so the batch is
    /// embarrassingly parallel.
    pub fn get_coverings(&self, bounds: &[Bound]) -> Vec<Vec<Pixel>> {
        bounds.par_iter().map(|b| self.get_covering(b)).collect()
    }

    fn covering_impl(&self, bound: &Bound, budget: Option<usize>) -> Covering {
        let mut accepted: Vec<Pixel> = Vec::new();
        let mut queue: BinaryHeap<Candidate> = Pixel::base_cells()
            .into_iter()
            .filter(|cell| bound.may_intersect(cell))
            .map(Candidate)
            .collect();

        while let Some(Candidate(pix)) = queue.pop() {
            if bound.contains_pixel(&pix) {
                accepted.push(pix);
                continue;
            }
            if pix.level() >= self.max_level {
                // partial overlap accepted as an approximation
                accepted.push(pix);
                continue;
            }
            let kids = match pix.children() {
                Ok(kids) => kids,
                Err(_) => {
                    accepted.push(pix);
                    continue;
                }
            };
            let intersecting: Vec<Pixel> = kids
                .into_iter()
                .filter(|kid| bound.may_intersect(kid))
                .collect();
            if intersecting.is_empty() {
                // the parent was a false positive of the conservative test
                continue;
            }
            if let Some(max_pixels) = budget {
                if accepted.len() + queue.len() + intersecting.len() > max_pixels {
                    accepted.push(pix);
                    continue;
                }
            }
            for kid in intersecting {
                queue.push(Candidate(kid));
            }
        }

        accepted.sort_unstable();
        let within_budget = budget.map_or(true, |max_pixels| accepted.len() <= max_pixels);
        Covering {
            pixels: accepted,
            within_budget,
        }
    }
}

//! Angular separation bins for pairwise statistics.
//!
//! Pair-count estimators histogram the angular separation of object pairs
//! into a sequence of half-open intervals `[theta_min, theta_max)` in
//! degrees. [`AngularBins`] keeps the sequence ordered and non-overlapping,
//! which makes lookup a binary search, and carries the accumulated pair
//! counts and weights per bin.
//!
//! Accumulation is not thread-safe by design. Parallel pair counting (for
//! example one worker per jackknife region) should give each worker a
//! private accumulator from [`clone_empty`](AngularBins::clone_empty) and
//! [`merge`](AngularBins::merge) them at the synchronization point; no
//! per-bin locking is needed under that discipline.
//!
//! ```
//! use astro_sphere::AngularBins;
//!
//! let mut bins = AngularBins::log(0.01, 10.0, 20).unwrap();
//!
//! assert!(bins.accumulate(0.5, 1.0));
//! assert!(!bins.accumulate(15.0, 1.0)); // outside every bin
//!
//! let k = bins.bin_for(0.5).unwrap();
//! assert_eq!(bins.get(k).unwrap().counts(), 1.0);
//! ```

use crate::errors::{SphereError, SphereResult};
use crate::math::{double_ge, double_lt};

/// One half-open separation interval `[theta_min, theta_max)` in degrees,
/// with its accumulated pair statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngularBin {
    theta_min: f64,
    theta_max: f64,
    counts: f64,
    total_weight: f64,
}

impl AngularBin {
    /// Creates an empty bin over `[theta_min, theta_max)`.
    ///
    /// Fails with [`SphereError::InvalidArgument`] unless
    /// `theta_min < theta_max` and both are finite.
    pub fn new(theta_min: f64, theta_max: f64) -> SphereResult<Self> {
        if !theta_min.is_finite() || !theta_max.is_finite() || theta_min >= theta_max {
            return Err(SphereError::invalid_argument(
                "AngularBin::new",
                &format!(
                    "bin edges ({}, {}) must be finite with theta_min < theta_max",
                    theta_min, theta_max
                ),
            ));
        }
        Ok(Self {
            theta_min,
            theta_max,
            counts: 0.0,
            total_weight: 0.0,
        })
    }

    /// Lower edge in degrees (inclusive).
    #[inline]
    pub fn theta_min(&self) -> f64 {
        self.theta_min
    }

    /// Upper edge in degrees (exclusive).
    #[inline]
    pub fn theta_max(&self) -> f64 {
        self.theta_max
    }

    /// Midpoint of the bin in degrees.
    #[inline]
    pub fn theta_mid(&self) -> f64 {
        0.5 * (self.theta_min + self.theta_max)
    }

    /// Returns `true` if the separation falls in `[theta_min, theta_max)`,
    /// tolerant at both edges: the lower edge is inclusive, the upper edge
    /// exclusive.
    #[inline]
    pub fn contains(&self, theta: f64) -> bool {
        double_ge(theta, self.theta_min) && double_lt(theta, self.theta_max)
    }

    /// Adds one pair with the given weight.
    #[inline]
    pub fn add_pair(&mut self, weight: f64) {
        self.counts += 1.0;
        self.total_weight += weight;
    }

    /// Accumulated pair count.
    #[inline]
    pub fn counts(&self) -> f64 {
        self.counts
    }

    /// Accumulated pair weight.
    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Clears accumulated statistics, leaving the edges untouched.
    pub fn reset(&mut self) {
        self.counts = 0.0;
        self.total_weight = 0.0;
    }
}

/// An ordered, non-overlapping sequence of angular bins.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngularBins {
    bins: Vec<AngularBin>,
}

impl AngularBins {
    /// Builds contiguous bins from explicit edges: `n` edges give `n - 1`
    /// bins.
    ///
    /// Fails with [`SphereError::InvalidArgument`] unless there are at
    /// least two edges and they increase strictly.
    pub fn from_edges(edges: &[f64]) -> SphereResult<Self> {
        if edges.len() < 2 {
            return Err(SphereError::invalid_argument(
                "AngularBins::from_edges",
                "at least two edges are required",
            ));
        }
        let mut bins = Vec::with_capacity(edges.len() - 1);
        for pair in edges.windows(2) {
            bins.push(AngularBin::new(pair[0], pair[1])?);
        }
        Ok(Self { bins })
    }

    /// Builds `n` equal-width bins between `theta_min` and `theta_max`
    /// degrees.
    pub fn linear(theta_min: f64, theta_max: f64, n: usize) -> SphereResult<Self> {
        if n == 0 {
            return Err(SphereError::invalid_argument(
                "AngularBins::linear",
                "bin count must be at least 1",
            ));
        }
        let width = (theta_max - theta_min) / n as f64;
        let edges: Vec<f64> = (0..=n)
            .map(|i| {
                if i == n {
                    theta_max
                } else {
                    theta_min + width * i as f64
                }
            })
            .collect();
        Self::from_edges(&edges)
    }

    /// Builds `n` logarithmically spaced bins between `theta_min` and
    /// `theta_max` degrees.
    ///
    /// Fails with [`SphereError::InvalidArgument`] unless `theta_min > 0`.
    pub fn log(theta_min: f64, theta_max: f64, n: usize) -> SphereResult<Self> {
        if n == 0 {
            return Err(SphereError::invalid_argument(
                "AngularBins::log",
                "bin count must be at least 1",
            ));
        }
        if !(theta_min > 0.0) {
            return Err(SphereError::invalid_argument(
                "AngularBins::log",
                "logarithmic binning requires theta_min > 0",
            ));
        }
        let log_min = libm::log10(theta_min);
        let log_max = libm::log10(theta_max);
        let step = (log_max - log_min) / n as f64;
        let edges: Vec<f64> = (0..=n)
            .map(|i| {
                if i == n {
                    theta_max
                } else {
                    libm::pow(10.0, log_min + step * i as f64)
                }
            })
            .collect();
        Self::from_edges(&edges)
    }

    /// Number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// The bin at position `k`, if any.
    pub fn get(&self, k: usize) -> Option<&AngularBin> {
        self.bins.get(k)
    }

    /// Iterates the bins in order of increasing `theta_min`.
    pub fn iter(&self) -> impl Iterator<Item = &AngularBin> {
        self.bins.iter()
    }

    /// Finds the bin containing a separation by binary search over
    /// `theta_min`.
    ///
    /// Returns `None` when the separation falls outside every bin — the
    /// explicit not-found result; nothing is ever accumulated into a
    /// default bin.
    pub fn bin_for(&self, theta: f64) -> Option<usize> {
        let idx = self.bins.partition_point(|b| b.theta_min() <= theta);
        // The tolerant edge tests can disagree with the exact partition by
        // one position on either side.
        if idx > 0 && self.bins[idx - 1].contains(theta) {
            return Some(idx - 1);
        }
        if idx < self.bins.len() && self.bins[idx].contains(theta) {
            return Some(idx);
        }
        None
    }

    /// Accumulates one pair at separation `theta` with the given weight.
    ///
    /// Returns `false` (and accumulates nothing) when `theta` falls
    /// outside every bin.
    pub fn accumulate(&mut self, theta: f64, weight: f64) -> bool {
        match self.bin_for(theta) {
            Some(k) => {
                self.bins[k].add_pair(weight);
                true
            }
            None => false,
        }
    }

    /// A copy of this binning scheme with zeroed statistics, for use as a
    /// worker-local accumulator.
    pub fn clone_empty(&self) -> Self {
        let mut copy = self.clone();
        copy.reset();
        copy
    }

    /// Sums another accumulator's statistics into this one.
    ///
    /// The synchronization-point half of the worker-local-then-merge
    /// discipline. Fails with [`SphereError::InvalidArgument`] if the two
    /// schemes do not share identical bin edges.
    pub fn merge(&mut self, other: &AngularBins) -> SphereResult<()> {
        if self.bins.len() != other.bins.len() {
            return Err(SphereError::invalid_argument(
                "AngularBins::merge",
                "bin counts differ",
            ));
        }
        for (mine, theirs) in self.bins.iter().zip(other.bins.iter()) {
            if mine.theta_min != theirs.theta_min || mine.theta_max != theirs.theta_max {
                return Err(SphereError::invalid_argument(
                    "AngularBins::merge",
                    "bin edges differ",
                ));
            }
        }
        for (mine, theirs) in self.bins.iter_mut().zip(other.bins.iter()) {
            mine.counts += theirs.counts;
            mine.total_weight += theirs.total_weight;
        }
        Ok(())
    }

    /// Clears accumulated statistics in every bin.
    pub fn reset(&mut self) {
        for bin in &mut self.bins {
            bin.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bin_validation() {
        assert!(AngularBin::new(0.1, 1.0).is_ok());
        assert!(AngularBin::new(1.0, 0.1).is_err());
        assert!(AngularBin::new(1.0, 1.0).is_err());
        assert!(AngularBin::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_from_edges_validation() {
        assert!(AngularBins::from_edges(&[0.1, 1.0, 10.0]).is_ok());
        assert!(AngularBins::from_edges(&[0.1]).is_err());
        assert!(AngularBins::from_edges(&[0.1, 0.1, 1.0]).is_err());
        assert!(AngularBins::from_edges(&[1.0, 0.5, 2.0]).is_err());
    }

    #[test]
    fn test_linear_spacing() {
        let bins = AngularBins::linear(0.0, 10.0, 5).unwrap();
        assert_eq!(bins.len(), 5);
        for (k, bin) in bins.iter().enumerate() {
            assert_abs_diff_eq!(bin.theta_min(), 2.0 * k as f64, epsilon = 1e-12);
            assert_abs_diff_eq!(bin.theta_max(), 2.0 * (k + 1) as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_log_spacing() {
        let bins = AngularBins::log(0.01, 100.0, 4).unwrap();
        assert_eq!(bins.len(), 4);
        // Four decades, one bin each.
        assert_abs_diff_eq!(bins.get(0).unwrap().theta_min(), 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(bins.get(1).unwrap().theta_min(), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(bins.get(2).unwrap().theta_min(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bins.get(3).unwrap().theta_min(), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bins.get(3).unwrap().theta_max(), 100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_log_requires_positive_min() {
        assert!(AngularBins::log(0.0, 10.0, 5).is_err());
        assert!(AngularBins::log(-1.0, 10.0, 5).is_err());
    }

    #[test]
    fn test_half_open_edges() {
        let bins = AngularBins::from_edges(&[0.1, 1.0, 10.0]).unwrap();
        // Lower edge is inclusive.
        assert_eq!(bins.bin_for(0.1), Some(0));
        assert_eq!(bins.bin_for(1.0), Some(1));
        // Upper edge of the last bin is exclusive.
        assert_eq!(bins.bin_for(10.0), None);
        // Interior values resolve normally.
        assert_eq!(bins.bin_for(0.5), Some(0));
        assert_eq!(bins.bin_for(5.0), Some(1));
        // Out of range on both sides.
        assert_eq!(bins.bin_for(0.05), None);
        assert_eq!(bins.bin_for(50.0), None);
    }

    #[test]
    fn test_bin_for_matches_linear_scan() {
        let bins = AngularBins::log(0.01, 10.0, 30).unwrap();
        for i in 0..400 {
            let theta = 0.005 + i as f64 * 0.03;
            let scanned = bins.iter().position(|b| b.contains(theta));
            assert_eq!(bins.bin_for(theta), scanned, "theta {}", theta);
        }
    }

    #[test]
    fn test_accumulate() {
        let mut bins = AngularBins::linear(0.0, 10.0, 10).unwrap();
        assert!(bins.accumulate(2.5, 0.5));
        assert!(bins.accumulate(2.7, 1.5));
        assert!(!bins.accumulate(10.5, 1.0));

        let bin = bins.get(2).unwrap();
        assert_abs_diff_eq!(bin.counts(), 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(bin.total_weight(), 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_worker_local_merge_matches_serial() {
        let scheme = AngularBins::log(0.01, 10.0, 16).unwrap();
        let thetas: Vec<f64> = (0..500).map(|i| 0.011 + i as f64 * 0.019).collect();

        // Serial accumulation.
        let mut serial = scheme.clone_empty();
        for &t in &thetas {
            serial.accumulate(t, 1.0);
        }

        // Two workers splitting the sample, merged at the end.
        let mut shared = scheme.clone_empty();
        let (left, right) = thetas.split_at(thetas.len() / 2);
        for chunk in [left, right] {
            let mut local = shared.clone_empty();
            for &t in chunk {
                local.accumulate(t, 1.0);
            }
            shared.merge(&local).unwrap();
        }

        for (a, b) in serial.iter().zip(shared.iter()) {
            assert_eq!(a.counts(), b.counts());
            assert_eq!(a.total_weight(), b.total_weight());
        }
    }

    #[test]
    fn test_merge_rejects_mismatched_schemes() {
        let mut a = AngularBins::linear(0.0, 10.0, 10).unwrap();
        let b = AngularBins::linear(0.0, 10.0, 5).unwrap();
        assert!(a.merge(&b).is_err());
        let c = AngularBins::linear(0.0, 20.0, 10).unwrap();
        assert!(a.merge(&c).is_err());
    }

    #[test]
    fn test_reset() {
        let mut bins = AngularBins::linear(0.0, 10.0, 10).unwrap();
        bins.accumulate(5.0, 2.0);
        bins.reset();
        assert!(bins.iter().all(|b| b.counts() == 0.0));
        assert!(bins.iter().all(|b| b.total_weight() == 0.0));
        // Edges survive a reset.
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.bin_for(5.0), Some(5));
    }
}

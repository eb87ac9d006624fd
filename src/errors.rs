//! Error types for spherical-geometry operations.
//!
//! This module provides a unified error type [`SphereError`] covering the
//! failure modes of the library: malformed geometric parameters, queries that
//! fall outside a mapped area, and resolution limits of the pixel hierarchy.
//!
//! # Error Categories
//!
//! | Variant | Use Case | Recoverable? |
//! |---------|----------|--------------|
//! | [`InvalidArgument`](SphereError::InvalidArgument) | Malformed bound parameters, level beyond `MAX_LEVEL`, non-monotonic bin edges | No |
//! | [`OutOfRange`](SphereError::OutOfRange) | Point outside a region map, angle outside all bins | Yes |
//! | [`PrecisionLimit`](SphereError::PrecisionLimit) | Request cannot be satisfied even at the deepest subdivision level | No |
//!
//! # Usage
//!
//! Most fallible functions return [`SphereResult<T>`], which is
//! `Result<T, SphereError>`. Use the constructor methods for consistent
//! error creation:
//!
//! ```
//! use astro_sphere::{SphereError, SphereResult};
//!
//! fn checked_radius(radius: f64) -> SphereResult<f64> {
//!     if radius < 0.0 {
//!         return Err(SphereError::invalid_argument(
//!             "checked_radius",
//!             "radius must be non-negative",
//!         ));
//!     }
//!     Ok(radius)
//! }
//! ```
//!
//! All construction-time validation fails fast: no partially constructed
//! bound, coverer, or region map is ever observable. Query-time misses
//! ([`OutOfRange`](SphereError::OutOfRange)) are surfaced explicitly and
//! never replaced by a silent default.

use thiserror::Error;

/// Unified error type for spherical-geometry operations.
///
/// Use the constructor methods
/// ([`invalid_argument`](Self::invalid_argument),
/// [`out_of_range`](Self::out_of_range),
/// [`precision_limit`](Self::precision_limit)) for consistent error creation.
#[derive(Error, Debug)]
pub enum SphereError {
    /// Malformed input: bad bound parameters, a subdivision level beyond
    /// [`MAX_LEVEL`](crate::constants::MAX_LEVEL), non-monotonic bin edges.
    #[error("Invalid argument in {context}: {message}")]
    InvalidArgument { context: String, message: String },

    /// A query fell outside the mapped domain (point outside a region map,
    /// separation angle outside every bin).
    ///
    /// This is the only recoverable variant — the caller can skip or
    /// reclassify the offending sample.
    #[error("Out of range in {context}: {message}")]
    OutOfRange { context: String, message: String },

    /// The request cannot be satisfied even at the deepest subdivision level.
    #[error("Precision limit in {context}: {message}")]
    PrecisionLimit { context: String, message: String },
}

/// Convenience alias for `Result<T, SphereError>`.
pub type SphereResult<T> = Result<T, SphereError>;

impl SphereError {
    /// Creates an [`InvalidArgument`](Self::InvalidArgument) error.
    pub fn invalid_argument(context: &str, message: &str) -> Self {
        Self::InvalidArgument {
            context: context.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an [`OutOfRange`](Self::OutOfRange) error (the only
    /// recoverable variant).
    pub fn out_of_range(context: &str, message: &str) -> Self {
        Self::OutOfRange {
            context: context.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a [`PrecisionLimit`](Self::PrecisionLimit) error.
    pub fn precision_limit(context: &str, message: &str) -> Self {
        Self::PrecisionLimit {
            context: context.to_string(),
            message: message.to_string(),
        }
    }

    /// Returns `true` if the caller can reasonably continue after this error.
    ///
    /// Only [`OutOfRange`](Self::OutOfRange) is recoverable: the offending
    /// point or angle can be skipped and the analysis carried on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = SphereError::invalid_argument("annulus_bound", "inner radius exceeds outer");
        assert_eq!(
            err.to_string(),
            "Invalid argument in annulus_bound: inner radius exceeds outer"
        );
    }

    #[test]
    fn test_out_of_range_display() {
        let err = SphereError::out_of_range("region_for", "point outside covered area");
        assert!(err.to_string().contains("Out of range in region_for"));
        assert!(err.to_string().contains("point outside covered area"));
    }

    #[test]
    fn test_precision_limit_display() {
        let err = SphereError::precision_limit("get_covering", "budget below base cell count");
        assert!(err.to_string().contains("Precision limit in get_covering"));
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(SphereError::out_of_range("bin_for", "theta beyond last bin").is_recoverable());
        assert!(!SphereError::invalid_argument("circle_bound", "negative radius").is_recoverable());
        assert!(!SphereError::precision_limit("region_map", "too many regions").is_recoverable());
    }

    #[test]
    fn test_send_sync() {
        fn _assert_send<T: Send>() {}
        fn _assert_sync<T: Sync>() {}
        _assert_send::<SphereError>();
        _assert_sync::<SphereError>();
    }
}

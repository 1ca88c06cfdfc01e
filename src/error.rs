//! Error types for grid-knn operations.
//!
//! Construction of a grid either succeeds completely or fails with one of
//! these errors; no partially built index is ever returned. Query-time
//! contract violations (bad `k`, wrong query dimension) are reported the same
//! way instead of looping or panicking.

use std::io;
use thiserror::Error;

/// Result type alias using [`GridError`].
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors that can occur while building or querying an index.
#[derive(Error, Debug)]
pub enum GridError {
    /// Point dimensions do not match the expected dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected point dimension.
        expected: usize,
        /// Actual point dimension provided.
        actual: usize,
    },

    /// The flat coordinate array cannot be split into whole points.
    #[error("malformed coordinates: {len} values is not a multiple of dimension {dimension}")]
    MalformedCoordinates {
        /// Number of coordinate values supplied.
        len: usize,
        /// Point dimension.
        dimension: usize,
    },

    /// Operation requires a non-empty point set but received empty input.
    #[error("empty point set: operation requires at least one point")]
    EmptyPointSet,

    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate in point {index}")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
    },

    /// A point lies outside the bounding box of the grid.
    #[error("point {index} {point:?} is not within the bounding box")]
    PointOutOfBounds {
        /// Index of the offending point in the input.
        index: usize,
        /// Coordinates of the offending point.
        point: Vec<f64>,
    },

    /// Invalid parameter value provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Fewer points are indexed than the query asks for.
    #[error("insufficient points: required {required}, got {actual}")]
    InsufficientPoints {
        /// Number of neighbors requested.
        required: usize,
        /// Number of points in the index.
        actual: usize,
    },

    /// The lattice would need more cells than can be addressed.
    #[error("cell count overflow: {0:?} cells per dimension")]
    CellCountOverflow(Vec<usize>),

    /// The insert worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// Index is in a state its invariants rule out.
    #[error("index corrupted: {0}")]
    IndexCorrupted(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A point file has an invalid layout.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),
}

impl GridError {
    /// Creates a new `DimensionMismatch` error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Creates a new `MalformedCoordinates` error.
    pub fn malformed_coordinates(len: usize, dimension: usize) -> Self {
        Self::MalformedCoordinates { len, dimension }
    }

    /// Creates a new `InsufficientPoints` error.
    pub fn insufficient_points(required: usize, actual: usize) -> Self {
        Self::InsufficientPoints { required, actual }
    }

    /// Creates a new `PointOutOfBounds` error.
    pub fn point_out_of_bounds(index: usize, point: &[f64]) -> Self {
        Self::PointOutOfBounds {
            index,
            point: point.to_vec(),
        }
    }

    /// Creates a new `InvalidParameter` error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Creates a new `IndexCorrupted` error.
    pub fn index_corrupted(msg: impl Into<String>) -> Self {
        Self::IndexCorrupted(msg.into())
    }

    /// Creates a new `InvalidFormat` error.
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}

impl From<rayon::ThreadPoolBuildError> for GridError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::dimension_mismatch(3, 2);
        assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 2");

        let err = GridError::insufficient_points(100, 50);
        assert_eq!(err.to_string(), "insufficient points: required 100, got 50");

        let err = GridError::malformed_coordinates(7, 3);
        assert_eq!(
            err.to_string(),
            "malformed coordinates: 7 values is not a multiple of dimension 3"
        );

        let err = GridError::EmptyPointSet;
        assert_eq!(
            err.to_string(),
            "empty point set: operation requires at least one point"
        );
    }

    #[test]
    fn test_out_of_bounds_names_point() {
        let err = GridError::point_out_of_bounds(4, &[-1.0, -2.0, -3.0]);
        let msg = err.to_string();
        assert!(msg.contains("point 4"));
        assert!(msg.contains("-2.0"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: GridError = io_err.into();
        assert!(matches!(err, GridError::Io(_)));
    }
}

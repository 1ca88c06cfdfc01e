//! Distance computation over point accessors.
//!
//! Only the Euclidean metric is supported. Search code works on squared
//! distances throughout; [`euclidean`] is for presenting final results.

pub mod scalar;

use crate::point::PointAccessor;

pub use scalar::{euclidean_distance, euclidean_distance_squared};

/// Squared Euclidean distance between two points.
///
/// # Panics
/// Panics if the points have different dimensions.
#[inline]
pub fn squared_euclidean<P, Q>(p: &P, q: &Q) -> f64
where
    P: PointAccessor + ?Sized,
    Q: PointAccessor + ?Sized,
{
    euclidean_distance_squared(p.coords(), q.coords())
}

/// Euclidean distance between two points.
#[inline]
pub fn euclidean<P, Q>(p: &P, q: &Q) -> f64
where
    P: PointAccessor + ?Sized,
    Q: PointAccessor + ?Sized,
{
    squared_euclidean(p, q).sqrt()
}

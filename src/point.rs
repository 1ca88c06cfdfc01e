//! Point accessors: borrowed views over interleaved coordinate buffers.
//!
//! Points are never copied one by one. A [`PointView`] is a
//! `(buffer, offset, dimension)` triple borrowing the buffer it reads from,
//! so a view cannot outlive the storage behind it.

use std::fmt;
use std::ops::Index;

use crate::error::{GridError, Result};

/// Read access to the coordinates of a single point.
///
/// Implemented for views into point buffers as well as plain slices, arrays
/// and vectors, so queries can be issued with whatever the caller holds.
pub trait PointAccessor {
    /// The coordinates of the point.
    fn coords(&self) -> &[f64];

    /// Number of coordinates.
    #[inline]
    fn dimension(&self) -> usize {
        self.coords().len()
    }

    /// Coordinate in dimension `idx`.
    ///
    /// # Panics
    /// Panics if `idx >= self.dimension()`.
    #[inline]
    fn coord(&self, idx: usize) -> f64 {
        self.coords()[idx]
    }

    /// True if every coordinate is finite.
    fn is_finite(&self) -> bool {
        self.coords().iter().all(|c| c.is_finite())
    }
}

impl PointAccessor for [f64] {
    #[inline]
    fn coords(&self) -> &[f64] {
        self
    }
}

impl<const N: usize> PointAccessor for [f64; N] {
    #[inline]
    fn coords(&self) -> &[f64] {
        self
    }
}

impl PointAccessor for Vec<f64> {
    #[inline]
    fn coords(&self) -> &[f64] {
        self
    }
}

impl<P: PointAccessor + ?Sized> PointAccessor for &P {
    #[inline]
    fn coords(&self) -> &[f64] {
        (**self).coords()
    }
}

/// A borrowed view of one point inside a coordinate buffer.
#[derive(Clone, Copy, PartialEq)]
pub struct PointView<'a> {
    buffer: &'a [f64],
    offset: usize,
    dimension: usize,
}

impl<'a> PointView<'a> {
    /// Create a view of the point starting at `offset`.
    ///
    /// # Errors
    /// Returns an error if `offset + dimension` exceeds the buffer.
    pub fn new(buffer: &'a [f64], offset: usize, dimension: usize) -> Result<Self> {
        match offset.checked_add(dimension) {
            Some(end) if end <= buffer.len() => Ok(Self {
                buffer,
                offset,
                dimension,
            }),
            _ => Err(GridError::invalid_parameter(format!(
                "point view [{}..{}+{}] exceeds buffer of length {}",
                offset,
                offset,
                dimension,
                buffer.len()
            ))),
        }
    }

    /// View an entire slice as one point.
    #[inline]
    pub fn from_slice(coords: &'a [f64]) -> Self {
        Self {
            buffer: coords,
            offset: 0,
            dimension: coords.len(),
        }
    }

    /// Offset of the first coordinate inside the backing buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The coordinates, borrowed for the lifetime of the backing buffer.
    #[inline]
    pub fn as_slice(&self) -> &'a [f64] {
        &self.buffer[self.offset..self.offset + self.dimension]
    }

    /// Copy the coordinates into an owned vector.
    pub fn to_vec(&self) -> Vec<f64> {
        self.as_slice().to_vec()
    }
}

impl PointAccessor for PointView<'_> {
    #[inline]
    fn coords(&self) -> &[f64] {
        self.as_slice()
    }

    #[inline]
    fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Index<usize> for PointView<'_> {
    type Output = f64;

    #[inline]
    fn index(&self, idx: usize) -> &f64 {
        &self.as_slice()[idx]
    }
}

impl fmt::Debug for PointView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point{:?}", self.as_slice())
    }
}

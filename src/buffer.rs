//! Owned, append-only storage for interleaved point coordinates.

use std::ops::Range;

use crate::error::{GridError, Result};
use crate::point::{PointAccessor, PointView};

/// A growable buffer of points stored point-major, `dimension` values each.
///
/// The coordinate count is always a multiple of the dimension. Buffers back
/// both whole datasets and the individual cell buckets of a grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointBuffer {
    dimension: usize,
    coordinates: Vec<f64>,
}

impl PointBuffer {
    /// Create an empty buffer for points of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            coordinates: Vec::new(),
        }
    }

    /// Create an empty buffer with room for `points` points.
    pub fn with_capacity(dimension: usize, points: usize) -> Self {
        Self {
            dimension,
            coordinates: Vec::with_capacity(dimension * points),
        }
    }

    /// Take ownership of a flat coordinate array.
    ///
    /// # Errors
    /// Returns an error if `dimension` is zero or the array length is not a
    /// multiple of `dimension`.
    pub fn from_vec(dimension: usize, coordinates: Vec<f64>) -> Result<Self> {
        if dimension == 0 {
            return Err(GridError::invalid_parameter("dimension must be greater than 0"));
        }
        if !coordinates.len().is_multiple_of(dimension) {
            return Err(GridError::malformed_coordinates(coordinates.len(), dimension));
        }
        Ok(Self {
            dimension,
            coordinates,
        })
    }

    /// Copy a flat coordinate array into a new buffer.
    pub fn from_slice(dimension: usize, coordinates: &[f64]) -> Result<Self> {
        Self::from_vec(dimension, coordinates.to_vec())
    }

    /// Dimension of the stored points.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored points.
    #[inline]
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.coordinates.len() / self.dimension
        }
    }

    /// True if no point is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Append one point.
    ///
    /// # Panics
    /// Panics if the point's dimension differs from the buffer's.
    #[inline]
    pub fn push<P: PointAccessor + ?Sized>(&mut self, point: &P) {
        let coords = point.coords();
        assert_eq!(
            coords.len(),
            self.dimension,
            "Point dimensions must match"
        );
        self.coordinates.extend_from_slice(coords);
    }

    /// Append every point of another buffer.
    ///
    /// # Panics
    /// Panics if the dimensions differ.
    pub fn append(&mut self, other: &PointBuffer) {
        assert_eq!(other.dimension, self.dimension, "Point dimensions must match");
        self.coordinates.extend_from_slice(&other.coordinates);
    }

    /// View of the point at `idx`, or `None` if out of range.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<PointView<'_>> {
        if self.dimension == 0 {
            return None;
        }
        let start = idx.checked_mul(self.dimension)?;
        PointView::new(&self.coordinates, start, self.dimension).ok()
    }

    /// View of the point at `idx`.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn point(&self, idx: usize) -> PointView<'_> {
        match self.get(idx) {
            Some(view) => view,
            None => panic!("point index {} out of range for {} points", idx, self.len()),
        }
    }

    /// Iterate over all points in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = PointView<'_>> + '_ {
        (0..self.len()).map(move |idx| self.point(idx))
    }

    /// Coordinates of a contiguous range of points.
    ///
    /// # Panics
    /// Panics if the range exceeds the stored points.
    pub fn slice(&self, points: Range<usize>) -> &[f64] {
        &self.coordinates[points.start * self.dimension..points.end * self.dimension]
    }

    /// All coordinates as one flat slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.coordinates
    }

    /// Index of the first point with a NaN or infinite coordinate.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.iter().position(|p| !p.is_finite())
    }

    /// Heap bytes held by the coordinates.
    pub fn memory_bytes(&self) -> usize {
        self.coordinates.capacity() * std::mem::size_of::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_validates_length() {
        assert!(PointBuffer::from_vec(3, vec![0.0; 9]).is_ok());
        assert!(matches!(
            PointBuffer::from_vec(3, vec![0.0; 8]),
            Err(GridError::MalformedCoordinates { len: 8, dimension: 3 })
        ));
        assert!(PointBuffer::from_vec(0, vec![]).is_err());
    }

    #[test]
    fn test_push_and_index() {
        let mut buffer = PointBuffer::new(2);
        assert!(buffer.is_empty());

        buffer.push(&[1.0, 2.0]);
        buffer.push(&[3.0, 4.0]);
        buffer.push(&vec![5.0, 6.0]);

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.point(1).as_slice(), &[3.0, 4.0]);
        assert_eq!(buffer.point(2).offset(), 4);
        assert!(buffer.get(3).is_none());
        assert_eq!(buffer.slice(1..3), &[3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    #[should_panic(expected = "Point dimensions must match")]
    fn test_push_rejects_wrong_dimension() {
        let mut buffer = PointBuffer::new(3);
        buffer.push(&[1.0, 2.0]);
    }

    #[test]
    fn test_iter_and_append() {
        let mut a = PointBuffer::from_vec(2, vec![0.0, 0.0, 1.0, 1.0]).unwrap();
        let b = PointBuffer::from_vec(2, vec![2.0, 2.0]).unwrap();
        a.append(&b);

        let firsts: Vec<f64> = a.iter().map(|p| p[0]).collect();
        assert_eq!(firsts, vec![0.0, 1.0, 2.0]);
        assert_eq!(a.iter().len(), 3);
    }

    #[test]
    fn test_first_non_finite() {
        let buffer = PointBuffer::from_vec(2, vec![0.0, 0.0, 1.0, f64::INFINITY]).unwrap();
        assert_eq!(buffer.first_non_finite(), Some(1));
    }
}

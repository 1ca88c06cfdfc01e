//! Minimum bounding rectangle (MBR) over a point set.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{GridError, Result};
use crate::point::{PointAccessor, PointView};

/// An axis-aligned box given by its low and high corners.
///
/// Containment is inclusive on both ends. Boxes built from a point set carry
/// an epsilon on the high corner so the maximal points are strictly inside
/// the last cell of a grid laid over the box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    low: Vec<f64>,
    high: Vec<f64>,
}

impl BoundingBox {
    /// Build the box around a flat coordinate array using the default epsilon.
    ///
    /// # Errors
    /// Returns an error if `dimension` is zero, the input is empty, its
    /// length is not a multiple of `dimension`, or the padded extent of some
    /// dimension is not finite.
    pub fn build(coordinates: &[f64], dimension: usize) -> Result<Self> {
        Self::build_with_epsilon(coordinates, dimension, constants::mbr::EPSILON)
    }

    /// Build the box around a flat coordinate array, padding the high corner
    /// by `epsilon` in every dimension.
    pub fn build_with_epsilon(coordinates: &[f64], dimension: usize, epsilon: f64) -> Result<Self> {
        if dimension == 0 {
            return Err(GridError::invalid_parameter("dimension must be greater than 0"));
        }
        if coordinates.is_empty() {
            return Err(GridError::EmptyPointSet);
        }
        if !coordinates.len().is_multiple_of(dimension) {
            return Err(GridError::malformed_coordinates(coordinates.len(), dimension));
        }

        let mut low = coordinates[..dimension].to_vec();
        let mut high = low.clone();

        for point in coordinates.chunks_exact(dimension).skip(1) {
            for (d, &c) in point.iter().enumerate() {
                if c < low[d] {
                    low[d] = c;
                }
                if c > high[d] {
                    high[d] = c;
                }
            }
        }

        for h in &mut high {
            *h += epsilon;
        }

        let mbr = Self { low, high };
        mbr.check_finite_widths()?;
        Ok(mbr)
    }

    /// Create a box from explicit corners, without padding.
    ///
    /// # Errors
    /// Returns an error if the corners differ in dimension, are empty, hold a
    /// non-finite coordinate or width, or `low[i] > high[i]` for some `i`.
    pub fn from_corners(low: Vec<f64>, high: Vec<f64>) -> Result<Self> {
        if low.len() != high.len() {
            return Err(GridError::dimension_mismatch(low.len(), high.len()));
        }
        if low.is_empty() {
            return Err(GridError::invalid_parameter("dimension must be greater than 0"));
        }
        if let Some(d) = (0..low.len()).find(|&d| !(low[d] <= high[d])) {
            return Err(GridError::invalid_parameter(format!(
                "low corner exceeds high corner in dimension {}: {} > {}",
                d, low[d], high[d]
            )));
        }
        if let Some(d) = (0..low.len()).find(|&d| !low[d].is_finite() || !high[d].is_finite()) {
            return Err(GridError::invalid_parameter(format!(
                "corner coordinate in dimension {} is not finite",
                d
            )));
        }

        let mbr = Self { low, high };
        mbr.check_finite_widths()?;
        Ok(mbr)
    }

    fn check_finite_widths(&self) -> Result<()> {
        match self.widths().iter().position(|w| !w.is_finite()) {
            Some(d) => Err(GridError::invalid_parameter(format!(
                "box width overflows in dimension {}",
                d
            ))),
            None => Ok(()),
        }
    }

    /// Number of dimensions.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.low.len()
    }

    /// The low corner.
    #[inline]
    pub fn low(&self) -> PointView<'_> {
        PointView::from_slice(&self.low)
    }

    /// The high corner.
    #[inline]
    pub fn high(&self) -> PointView<'_> {
        PointView::from_slice(&self.high)
    }

    /// Extent of the box in each dimension.
    pub fn widths(&self) -> Vec<f64> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(l, h)| h - l)
            .collect()
    }

    /// Product of all widths.
    pub fn volume(&self) -> f64 {
        self.widths().iter().product()
    }

    /// True if `low[i] <= p[i] <= high[i]` in every dimension.
    ///
    /// Points of a different dimension are never within the box.
    pub fn is_within<P: PointAccessor + ?Sized>(&self, point: &P) -> bool {
        let coords = point.coords();
        coords.len() == self.dimension()
            && coords
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(c, (l, h))| *l <= *c && *c <= *h)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MBR [")?;
        writeln!(f, "  low:  {:?}", self.low)?;
        writeln!(f, "  high: {:?}", self.high)?;
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Vec<f64> {
        vec![
            0.0, 0.0, 0.0, //
            1.0, 1.0, 1.0, //
            2.0, 0.0, -1.0, //
            3.5, 1.0, 0.0, //
            4.5, -2.5, 5.0,
        ]
    }

    #[test]
    fn test_build_pads_high_corner() {
        let mbr = BoundingBox::build(&sample(), 3).unwrap();

        assert_eq!(mbr.low().as_slice(), &[0.0, -2.5, -1.0]);
        assert_relative_eq!(mbr.high()[0], 4.6, epsilon = 1e-12);
        assert_relative_eq!(mbr.high()[1], 1.1, epsilon = 1e-12);
        assert_relative_eq!(mbr.high()[2], 5.1, epsilon = 1e-12);

        let widths = mbr.widths();
        assert_relative_eq!(widths[0], 4.6, epsilon = 1e-12);
        assert_relative_eq!(widths[1], 3.6, epsilon = 1e-12);
        assert_relative_eq!(widths[2], 6.1, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_unbounded_extent() {
        assert!(BoundingBox::from_corners(vec![0.0], vec![f64::INFINITY]).is_err());
        assert!(BoundingBox::from_corners(vec![f64::NEG_INFINITY], vec![0.0]).is_err());
        assert!(matches!(
            BoundingBox::from_corners(vec![0.0, -1e308], vec![1.0, 1e308]),
            Err(GridError::InvalidParameter(_))
        ));
        assert!(BoundingBox::build(&[0.0, -1e308, 1.0, 1e308], 2).is_err());

        let wide = BoundingBox::from_corners(vec![-1e300], vec![1e300]).unwrap();
        assert_eq!(wide.widths(), vec![2e300]);
    }

    #[test]
    fn test_build_rejects_bad_input() {
        assert!(matches!(
            BoundingBox::build(&[1.0, 2.0, 3.0, 4.0], 3),
            Err(GridError::MalformedCoordinates { .. })
        ));
        assert!(matches!(BoundingBox::build(&[], 3), Err(GridError::EmptyPointSet)));
        assert!(BoundingBox::build(&[1.0], 0).is_err());
    }

    #[test]
    fn test_every_input_point_is_within() {
        let coords = sample();
        let mbr = BoundingBox::build(&coords, 3).unwrap();
        for point in coords.chunks_exact(3) {
            assert!(mbr.is_within(point));
        }
    }

    #[test]
    fn test_containment_is_inclusive() {
        let mbr = BoundingBox::from_corners(vec![0.0, 0.0], vec![1.0, 2.0]).unwrap();
        assert!(mbr.is_within(&[0.0, 0.0]));
        assert!(mbr.is_within(&[1.0, 2.0]));
        assert!(!mbr.is_within(&[1.0 + 1e-9, 1.0]));
        assert!(!mbr.is_within(&[-1.0, -2.0]));
        assert!(!mbr.is_within(&[0.5]));
        assert_relative_eq!(mbr.volume(), 2.0);
    }

    #[test]
    fn test_from_corners_validates() {
        assert!(BoundingBox::from_corners(vec![1.0], vec![0.0]).is_err());
        assert!(BoundingBox::from_corners(vec![0.0, 0.0], vec![1.0]).is_err());
        assert!(BoundingBox::from_corners(vec![], vec![]).is_err());
        assert!(BoundingBox::from_corners(vec![f64::NAN], vec![1.0]).is_err());
    }
}

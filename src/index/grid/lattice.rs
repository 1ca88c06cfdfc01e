//! Cell lattice geometry.
//!
//! A [`CellLattice`] divides a bounding box into `cells[0] × … × cells[d-1]`
//! equally sized cells, flattened row-major with dimension 0 varying fastest:
//! `linear = Σ cart[i] * stride[i]` where `stride[0] = 1` and
//! `stride[i+1] = stride[i] * cells[i]`.

use smallvec::SmallVec;

use crate::constants::query::INLINE_DIMENSIONS;
use crate::error::{GridError, Result};
use crate::mbr::BoundingBox;
use crate::point::PointAccessor;

/// Cartesian cell coordinates, inline for low dimensions.
pub type CellCoordinates = SmallVec<[usize; INLINE_DIMENSIONS]>;

/// Derive the number of cells per dimension for `num_points` points spread
/// over a box with the given widths.
///
/// The cell edge `e` is chosen so that `V / e^d` cells hold
/// `cell_fill_optimum` points each on average, then every dimension gets
/// `ceil(width / e)` cells. Dimensions of zero width get a single cell and
/// are left out of the volume.
pub fn cells_per_dimension(widths: &[f64], num_points: usize, cell_fill_optimum: usize) -> Vec<usize> {
    let spanned: Vec<f64> = widths.iter().copied().filter(|w| *w > 0.0).collect();
    if spanned.is_empty() {
        return vec![1; widths.len()];
    }

    let volume: f64 = spanned.iter().product();
    let target_cells = num_points as f64 / cell_fill_optimum as f64;
    let edge = (volume / target_cells).powf(1.0 / spanned.len() as f64);

    widths
        .iter()
        .map(|&width| {
            let cells = (width / edge).ceil();
            if cells.is_finite() && cells >= 1.0 {
                // Saturating cast; oversized lattices are caught by the stride table.
                cells as usize
            } else {
                1
            }
        })
        .collect()
}

/// Regular lattice of cells laid over a bounding box.
#[derive(Clone, Debug)]
pub struct CellLattice {
    origin: Vec<f64>,
    cells_per_dimension: Vec<usize>,
    strides: Vec<usize>,
    cell_widths: Vec<f64>,
    num_cells: usize,
}

impl CellLattice {
    /// Lay a lattice sized for `num_points` points over `bounding_box`.
    ///
    /// # Errors
    /// Returns [`GridError::CellCountOverflow`] if the total number of cells
    /// cannot be represented.
    pub fn new(bounding_box: &BoundingBox, num_points: usize, cell_fill_optimum: usize) -> Result<Self> {
        let cells = cells_per_dimension(&bounding_box.widths(), num_points, cell_fill_optimum);
        Self::with_cells(bounding_box, cells)
    }

    /// Lay a lattice with an explicit number of cells per dimension.
    pub fn with_cells(bounding_box: &BoundingBox, cells_per_dimension: Vec<usize>) -> Result<Self> {
        if cells_per_dimension.len() != bounding_box.dimension() {
            return Err(GridError::dimension_mismatch(
                bounding_box.dimension(),
                cells_per_dimension.len(),
            ));
        }
        if cells_per_dimension.contains(&0) {
            return Err(GridError::invalid_parameter(format!(
                "every dimension needs at least one cell, got {:?}",
                cells_per_dimension
            )));
        }

        let mut strides = Vec::with_capacity(cells_per_dimension.len());
        let mut num_cells = 1usize;
        for &cells in &cells_per_dimension {
            strides.push(num_cells);
            num_cells = match num_cells.checked_mul(cells) {
                Some(product) => product,
                None => return Err(GridError::CellCountOverflow(cells_per_dimension)),
            };
        }

        let cell_widths = bounding_box
            .widths()
            .iter()
            .zip(&cells_per_dimension)
            .map(|(width, &cells)| width / cells as f64)
            .collect();

        Ok(Self {
            origin: bounding_box.low().to_vec(),
            cells_per_dimension,
            strides,
            cell_widths,
            num_cells,
        })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.cells_per_dimension.len()
    }

    #[inline]
    pub fn cells_per_dimension(&self) -> &[usize] {
        &self.cells_per_dimension
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn cell_widths(&self) -> &[f64] {
        &self.cell_widths
    }

    /// Total number of cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    /// Row of the cell containing `value` along `dim`.
    ///
    /// Values below the box map to row 0 and values at or beyond the high
    /// corner map to the last row.
    #[inline]
    pub fn cell_coordinate(&self, dim: usize, value: f64) -> usize {
        let row = ((value - self.origin[dim]) / self.cell_widths[dim]).floor();
        // `as` saturates: negative and NaN go to 0, +inf to usize::MAX.
        (row as usize).min(self.cells_per_dimension[dim] - 1)
    }

    /// Cartesian coordinates of the cell containing `point`.
    pub fn cartesian_of<P: PointAccessor + ?Sized>(&self, point: &P) -> CellCoordinates {
        point
            .coords()
            .iter()
            .enumerate()
            .map(|(dim, &value)| self.cell_coordinate(dim, value))
            .collect()
    }

    /// Linear index of the cell containing `point`.
    #[inline]
    pub fn cell_of<P: PointAccessor + ?Sized>(&self, point: &P) -> usize {
        point
            .coords()
            .iter()
            .enumerate()
            .map(|(dim, &value)| self.cell_coordinate(dim, value) * self.strides[dim])
            .sum()
    }

    /// Linear index of the cell at the given Cartesian coordinates.
    #[inline]
    pub fn linear_index(&self, cartesian: &[usize]) -> usize {
        cartesian
            .iter()
            .zip(&self.strides)
            .map(|(coordinate, stride)| coordinate * stride)
            .sum()
    }

    /// Cartesian coordinates of the cell with the given linear index.
    pub fn cartesian(&self, linear: usize) -> CellCoordinates {
        self.cells_per_dimension
            .iter()
            .zip(&self.strides)
            .map(|(&cells, &stride)| (linear / stride) % cells)
            .collect()
    }

    /// Low and high corner of the cell with the given linear index.
    pub fn cell_bounds(&self, linear: usize) -> (Vec<f64>, Vec<f64>) {
        let cartesian = self.cartesian(linear);
        let low: Vec<f64> = cartesian
            .iter()
            .enumerate()
            .map(|(dim, &row)| self.origin[dim] + row as f64 * self.cell_widths[dim])
            .collect();
        let high = low
            .iter()
            .zip(&self.cell_widths)
            .map(|(l, w)| l + w)
            .collect();
        (low, high)
    }

    /// Squared distance from `query` to the nearest face of the region
    /// covered by rings `0..=iteration` around `home`.
    ///
    /// A face contributes only while the region has not yet reached the
    /// lattice edge on that side. Returns infinity once the region covers
    /// the whole lattice. Points farther than the returned value cannot be
    /// admitted yet, since cells outside the region may hold closer ones.
    pub fn closest_border_dist_squared<P>(&self, query: &P, home: &[usize], iteration: usize) -> f64
    where
        P: PointAccessor + ?Sized,
    {
        let mut closest = f64::INFINITY;

        for (dim, &value) in query.coords().iter().enumerate() {
            let cells = self.cells_per_dimension[dim];
            let row = home[dim];
            let width = self.cell_widths[dim];
            let shift = iteration as f64 * width;

            let to_left = ((value - self.origin[dim]) - row as f64 * width).clamp(0.0, width);
            let to_right = width - to_left;

            if iteration < row {
                closest = closest.min(to_left + shift);
            }
            if row.saturating_add(iteration) < cells - 1 {
                closest = closest.min(to_right + shift);
            }
        }

        if closest.is_infinite() {
            f64::INFINITY
        } else {
            closest * closest
        }
    }
}

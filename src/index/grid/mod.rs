//! Uniform grid index with exact kNN search.
//!
//! The grid lays a regular lattice of cells over the bounding box of the
//! input and stores every point in the bucket of the cell containing it.
//! Cell size is derived from a target fill factor so that, for evenly
//! spread data, each bucket holds about `cell_fill_optimum` points.
//!
//! # Example
//!
//! ```
//! use grid_knn::{Grid, KnnIndex};
//!
//! let coordinates = vec![
//!     0.0, 0.0, //
//!     1.0, 1.0, //
//!     2.0, 0.5, //
//!     4.0, 3.0,
//! ];
//! let grid = Grid::new(2, &coordinates).unwrap();
//!
//! let neighbors = grid.k_nearest_neighbors(2, &[1.2, 0.9]).unwrap();
//! let closest = neighbors.into_sorted_vec();
//! assert_eq!(closest[0].point.as_slice(), &[1.0, 1.0]);
//! ```
//!
//! # Building in Parallel
//!
//! Inputs larger than [`GridConfig::thread_load`] are split into contiguous
//! chunks and inserted from a dedicated rayon pool, with one mutex per cell
//! held only while the build runs. The built grid is plain immutable data.

mod insert;
mod lattice;
mod ring;
mod search;

pub use lattice::{cells_per_dimension, CellCoordinates, CellLattice};

use std::fmt;
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use crate::bpq::BoundedQueue;
use crate::buffer::PointBuffer;
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::index::traits::{validate_query, KnnIndex};
use crate::mbr::BoundingBox;
use crate::metrics::{GridStatistics, SearchStatistics, SearchStatsBuilder};
use crate::point::{PointAccessor, PointView};

/// An immutable grid of point buckets answering exact kNN queries.
#[derive(Debug)]
pub struct Grid {
    config: GridConfig,
    bounding_box: BoundingBox,
    lattice: CellLattice,
    cells: Vec<PointBuffer>,
    len: usize,
}

impl Grid {
    /// Build a grid over a flat coordinate array with the default configuration.
    ///
    /// # Errors
    /// Fails if `dimension` is zero, the input is empty or not a whole number
    /// of points, or a coordinate is not finite.
    pub fn new(dimension: usize, coordinates: &[f64]) -> Result<Self> {
        Self::with_config(dimension, coordinates, GridConfig::default())
    }

    /// Build a grid over a flat coordinate array.
    ///
    /// The bounding box is computed from the input and padded by
    /// `config.epsilon`.
    pub fn with_config(dimension: usize, coordinates: &[f64], config: GridConfig) -> Result<Self> {
        config.validate()?;
        validate_coordinates(dimension, coordinates)?;
        let bounding_box = BoundingBox::build_with_epsilon(coordinates, dimension, config.epsilon)?;
        Self::build(dimension, coordinates, bounding_box, config)
    }

    /// Build a grid over the points of a buffer.
    pub fn from_buffer(points: &PointBuffer, config: GridConfig) -> Result<Self> {
        Self::with_config(points.dimension(), points.as_slice(), config)
    }

    /// Build a grid over a caller-supplied bounding box.
    ///
    /// The epsilon in `config` is not applied.
    ///
    /// # Errors
    /// Besides the checks of [`with_config`](Self::with_config), fails with
    /// [`GridError::PointOutOfBounds`] if any point lies outside `bounding_box`.
    pub fn with_bounds(
        dimension: usize,
        coordinates: &[f64],
        bounding_box: BoundingBox,
        config: GridConfig,
    ) -> Result<Self> {
        config.validate()?;
        validate_coordinates(dimension, coordinates)?;
        if bounding_box.dimension() != dimension {
            return Err(GridError::dimension_mismatch(dimension, bounding_box.dimension()));
        }
        Self::build(dimension, coordinates, bounding_box, config)
    }

    fn build(
        dimension: usize,
        coordinates: &[f64],
        bounding_box: BoundingBox,
        config: GridConfig,
    ) -> Result<Self> {
        let start = Instant::now();
        let len = coordinates.len() / dimension;

        let lattice = CellLattice::new(&bounding_box, len, config.cell_fill_optimum)?;
        debug!(
            "Grid lattice: cells per dimension {:?}, cell widths {:?}, {} cells",
            lattice.cells_per_dimension(),
            lattice.cell_widths(),
            lattice.num_cells()
        );

        let threads = config.insert_threads(len);
        let cells = if threads > 1 {
            insert::insert_parallel(&lattice, &bounding_box, coordinates, dimension, threads)?
        } else {
            insert::insert_sequential(&lattice, &bounding_box, coordinates, dimension)?
        };

        info!(
            "Built grid of {} points in {} cells using {} thread(s) in {:.2?}",
            len,
            lattice.num_cells(),
            threads,
            start.elapsed()
        );

        Ok(Self {
            config,
            bounding_box,
            lattice,
            cells,
            len,
        })
    }

    /// The configuration the grid was built with.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The bounding box covered by the lattice.
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// The cell lattice.
    pub fn lattice(&self) -> &CellLattice {
        &self.lattice
    }

    /// Number of cells in each dimension.
    pub fn cells_per_dimension(&self) -> &[usize] {
        self.lattice.cells_per_dimension()
    }

    /// Extent of the bounding box in each dimension.
    pub fn widths(&self) -> Vec<f64> {
        self.bounding_box.widths()
    }

    /// Edge length of a cell in each dimension.
    pub fn cell_widths(&self) -> &[f64] {
        self.lattice.cell_widths()
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.lattice.num_cells()
    }

    /// The bucket of the cell with the given linear index.
    ///
    /// # Panics
    /// Panics if `cell >= self.num_cells()`.
    pub fn bucket(&self, cell: usize) -> &PointBuffer {
        &self.cells[cell]
    }

    /// Iterate over all buckets in linear cell order.
    pub fn buckets(&self) -> impl ExactSizeIterator<Item = &PointBuffer> + '_ {
        self.cells.iter()
    }

    /// Linear index of the cell containing `point`.
    ///
    /// Points outside the bounding box map to the nearest boundary cell.
    pub fn cell_number<P: PointAccessor + ?Sized>(&self, point: &P) -> Result<usize> {
        if point.dimension() != self.dimension() {
            return Err(GridError::dimension_mismatch(self.dimension(), point.dimension()));
        }
        Ok(self.lattice.cell_of(point))
    }

    /// Cartesian coordinates of the cell with the given linear index.
    pub fn cartesian(&self, cell: usize) -> CellCoordinates {
        self.lattice.cartesian(cell)
    }

    /// Box covered by the cell with the given linear index.
    pub fn cell_bounds(&self, cell: usize) -> Result<BoundingBox> {
        if cell >= self.num_cells() {
            return Err(GridError::invalid_parameter(format!(
                "cell {} out of range for {} cells",
                cell,
                self.num_cells()
            )));
        }
        let (low, high) = self.lattice.cell_bounds(cell);
        BoundingBox::from_corners(low, high)
    }

    /// Linear indices of the cells in ring `iteration` around `home_cell`.
    pub fn ring_cells(&self, iteration: usize, home_cell: usize) -> Vec<usize> {
        let home = self.lattice.cartesian(home_cell);
        let mut ring = Vec::new();
        ring::collect_ring(&self.lattice, &home, iteration, &mut ring);
        ring
    }

    /// Squared distance from `query` to the nearest open face of the region
    /// searched after `iteration` rings; infinite once the region covers the
    /// whole grid.
    pub fn closest_border_dist_squared<P>(&self, query: &P, iteration: usize) -> Result<f64>
    where
        P: PointAccessor + ?Sized,
    {
        if query.dimension() != self.dimension() {
            return Err(GridError::dimension_mismatch(self.dimension(), query.dimension()));
        }
        let home = self.lattice.cartesian_of(query);
        Ok(self.lattice.closest_border_dist_squared(query, &home, iteration))
    }

    /// Find the `k` nearest points and report how the search went.
    pub fn k_nearest_neighbors_with_stats<Q>(
        &self,
        k: usize,
        query: &Q,
    ) -> Result<(BoundedQueue<PointView<'_>>, SearchStatistics)>
    where
        Q: PointAccessor + ?Sized,
    {
        validate_query(self.len, self.dimension(), k, query)?;
        let start = Instant::now();
        let mut stats = SearchStatsBuilder::new();
        let neighbors = search::k_nearest(self, k, query, &mut stats)?;
        stats.set_query_time(start.elapsed());
        Ok((neighbors, stats.build()))
    }

    /// Run one kNN query per point of `queries` in parallel.
    ///
    /// Results are in query order.
    pub fn batch_k_nearest_neighbors(
        &self,
        k: usize,
        queries: &PointBuffer,
    ) -> Result<Vec<BoundedQueue<PointView<'_>>>> {
        (0..queries.len())
            .into_par_iter()
            .map(|idx| self.k_nearest_neighbors(k, &queries.point(idx)))
            .collect()
    }

    /// Layout statistics of the built grid.
    pub fn statistics(&self) -> GridStatistics {
        let sizes: Vec<usize> = self.cells.iter().map(PointBuffer::len).collect();
        let memory_bytes = self.cells.iter().map(PointBuffer::memory_bytes).sum::<usize>()
            + self.cells.capacity() * std::mem::size_of::<PointBuffer>();
        GridStatistics::from_bucket_sizes(
            self.dimension(),
            self.cells_per_dimension().to_vec(),
            &sizes,
            memory_bytes,
        )
    }
}

impl KnnIndex for Grid {
    fn k_nearest_neighbors<Q>(&self, k: usize, query: &Q) -> Result<BoundedQueue<PointView<'_>>>
    where
        Q: PointAccessor + ?Sized,
    {
        validate_query(self.len, self.dimension(), k, query)?;
        let mut stats = SearchStatsBuilder::new();
        search::k_nearest(self, k, query, &mut stats)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn dimension(&self) -> usize {
        self.bounding_box.dimension()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid [")?;
        writeln!(f, "  dimension: {}", self.dimension())?;
        writeln!(f, "  points: {}", self.len)?;
        writeln!(f, "  cells per dimension: {:?}", self.cells_per_dimension())?;
        writeln!(f, "  cells: {}", self.num_cells())?;
        writeln!(
            f,
            "  mean fill: {:.2}",
            self.len as f64 / self.num_cells() as f64
        )?;
        writeln!(f, "  {}", self.bounding_box.to_string().replace('\n', "\n  "))?;
        write!(f, "]")
    }
}

/// Reject inputs that cannot be indexed.
fn validate_coordinates(dimension: usize, coordinates: &[f64]) -> Result<()> {
    if dimension == 0 {
        return Err(GridError::invalid_parameter("dimension must be greater than 0"));
    }
    if coordinates.is_empty() {
        return Err(GridError::EmptyPointSet);
    }
    if !coordinates.len().is_multiple_of(dimension) {
        return Err(GridError::malformed_coordinates(coordinates.len(), dimension));
    }
    if let Some(index) = coordinates
        .chunks_exact(dimension)
        .position(|point| !point.is_finite())
    {
        return Err(GridError::NonFiniteCoordinate { index });
    }
    Ok(())
}

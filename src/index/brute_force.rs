//! Brute force index for exact nearest neighbor search.
//!
//! This implementation serves as the ground truth baseline for the grid. It
//! computes distances to all points and keeps the k closest.

use std::ops::Range;

use log::debug;
use rayon::prelude::*;

use crate::bpq::BoundedQueue;
use crate::buffer::PointBuffer;
use crate::constants::brute_force::{CHUNK_SIZE, PARALLEL_THRESHOLD};
use crate::distance::squared_euclidean;
use crate::error::{GridError, Result};
use crate::index::traits::{validate_query, KnnIndex};
use crate::point::{PointAccessor, PointView};

/// Brute force index that performs exact nearest neighbor search.
///
/// This index computes distances to all stored points for each query,
/// guaranteeing exact results at the cost of O(n) search time.
#[derive(Debug, Clone)]
pub struct BruteForceIndex {
    points: PointBuffer,
}

impl BruteForceIndex {
    /// Create an index over the points of a buffer.
    ///
    /// # Errors
    /// Fails if the buffer has dimension zero or holds a non-finite coordinate.
    pub fn new(points: PointBuffer) -> Result<Self> {
        if points.dimension() == 0 {
            return Err(GridError::invalid_parameter("dimension must be greater than 0"));
        }
        if let Some(index) = points.first_non_finite() {
            return Err(GridError::NonFiniteCoordinate { index });
        }
        Ok(Self { points })
    }

    /// Create an index over a copy of a flat coordinate array.
    pub fn from_coordinates(dimension: usize, coordinates: &[f64]) -> Result<Self> {
        Self::new(PointBuffer::from_slice(dimension, coordinates)?)
    }

    /// The indexed points.
    pub fn points(&self) -> &PointBuffer {
        &self.points
    }

    /// Scan a contiguous range of points into a fresh queue.
    fn scan<Q>(&self, range: Range<usize>, k: usize, query: &Q) -> BoundedQueue<PointView<'_>>
    where
        Q: PointAccessor + ?Sized,
    {
        let mut queue = BoundedQueue::new(k);
        for idx in range {
            let point = self.points.point(idx);
            let distance = squared_euclidean(&point, query);
            queue.try_push(point, distance);
        }
        queue
    }

    /// Map-reduce search using Rayon for multi-core scaling.
    ///
    /// Chunks of points are scanned in parallel into local queues, which are
    /// then merged. Small indexes are scanned sequentially.
    pub fn k_nearest_neighbors_parallel<Q>(
        &self,
        k: usize,
        query: &Q,
    ) -> Result<BoundedQueue<PointView<'_>>>
    where
        Q: PointAccessor + Sync + ?Sized,
    {
        validate_query(self.points.len(), self.points.dimension(), k, query)?;

        let len = self.points.len();
        if len < PARALLEL_THRESHOLD {
            return Ok(self.scan(0..len, k, query));
        }

        let num_chunks = len.div_ceil(CHUNK_SIZE);
        debug!(
            "Parallel brute force over {} points in {} chunks",
            len, num_chunks
        );

        let queue = (0..num_chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * CHUNK_SIZE;
                self.scan(start..(start + CHUNK_SIZE).min(len), k, query)
            })
            .reduce(
                || BoundedQueue::new(k),
                |mut a, b| {
                    a.merge(b);
                    a
                },
            );

        Ok(queue)
    }

    /// Batch search for multiple queries in parallel.
    ///
    /// Processes all queries concurrently using Rayon, returning results
    /// for each query in the same order as the input.
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
}

impl KnnIndex for BruteForceIndex {
    fn k_nearest_neighbors<Q>(&self, k: usize, query: &Q) -> Result<BoundedQueue<PointView<'_>>>
    where
        Q: PointAccessor + ?Sized,
    {
        validate_query(self.points.len(), self.points.dimension(), k, query)?;
        Ok(self.scan(0..self.points.len(), k, query))
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn dimension(&self) -> usize {
        self.points.dimension()
    }
}

//! Common interface for exact kNN processors.
//!
//! The grid and the brute-force oracle implement the same trait, so tests and
//! benches can run one against the other through identical calls.

use crate::bpq::{BoundedQueue, Neighbor};
use crate::error::{GridError, Result};
use crate::point::{PointAccessor, PointView};

/// An index answering exact k-nearest-neighbor queries.
///
/// # Thread Safety
///
/// Implementations are immutable once built and must be `Send + Sync`;
/// independent queries may run concurrently without synchronization.
pub trait KnnIndex: Send + Sync {
    /// Find the `k` points closest to `query`.
    ///
    /// The returned queue holds exactly `k` candidates keyed by squared
    /// distance. Popping yields the farthest first; use
    /// [`BoundedQueue::into_sorted_vec`] for closest-first order.
    ///
    /// # Errors
    /// Fails if `k` is zero or exceeds [`len`](Self::len), or if the query
    /// has the wrong dimension or a non-finite coordinate.
    fn k_nearest_neighbors<Q>(&self, k: usize, query: &Q) -> Result<BoundedQueue<PointView<'_>>>
    where
        Q: PointAccessor + ?Sized;

    /// Find the single point closest to `query`.
    fn nearest_neighbor<Q>(&self, query: &Q) -> Result<Neighbor<PointView<'_>>>
    where
        Q: PointAccessor + ?Sized,
    {
        let mut queue = self.k_nearest_neighbors(1, query)?;
        queue
            .pop()
            .ok_or_else(|| GridError::index_corrupted("kNN query with k = 1 returned no point"))
    }

    /// Number of indexed points.
    fn len(&self) -> usize;

    /// True if the index holds no point.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension of the indexed points.
    fn dimension(&self) -> usize;
}

/// Check the arguments of a kNN query against an index.
pub(crate) fn validate_query<Q>(index_len: usize, dimension: usize, k: usize, query: &Q) -> Result<()>
where
    Q: PointAccessor + ?Sized,
{
    if k == 0 {
        return Err(GridError::invalid_parameter("k must be greater than 0"));
    }
    if k > index_len {
        return Err(GridError::insufficient_points(k, index_len));
    }
    if query.dimension() != dimension {
        return Err(GridError::dimension_mismatch(dimension, query.dimension()));
    }
    if !query.is_finite() {
        return Err(GridError::invalid_parameter(format!(
            "query has a non-finite coordinate: {:?}",
            query.coords()
        )));
    }
    Ok(())
}

//! Exact kNN search by expanding rings.
//!
//! Each iteration widens the searched region by one ring of cells. The
//! distance from the query to the region's nearest open face bounds the
//! distance to every point not yet seen, so candidates closer than that bound
//! are final and go straight to the queue. Farther candidates wait in an
//! ordered deferred set until a later bound covers them.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use super::ring::collect_ring;
use super::Grid;
use crate::bpq::BoundedQueue;
use crate::distance::squared_euclidean;
use crate::error::{GridError, Result};
use crate::metrics::SearchStatsBuilder;
use crate::point::{PointAccessor, PointView};

/// Points seen beyond the current bound, keyed by squared distance.
type Deferred<'a> = BTreeMap<OrderedFloat<f64>, Vec<PointView<'a>>>;

/// Run a kNN query whose arguments have already been validated.
pub fn k_nearest<'a, Q>(
    grid: &'a Grid,
    k: usize,
    query: &Q,
    stats: &mut SearchStatsBuilder,
) -> Result<BoundedQueue<PointView<'a>>>
where
    Q: PointAccessor + ?Sized,
{
    let lattice = grid.lattice();
    let home = lattice.cartesian_of(query);

    let mut queue = BoundedQueue::new(k);
    let mut deferred: Deferred<'a> = BTreeMap::new();
    let mut deferred_len = 0usize;
    let mut ring = Vec::new();
    let mut iteration = 0usize;

    while queue.not_full() {
        let threshold = lattice.closest_border_dist_squared(query, &home, iteration);
        // With no open face left every candidate is final, including
        // those whose squared distance overflowed.
        let is_final = |distance: f64| distance < threshold || threshold == f64::INFINITY;
        stats.add_iteration();

        while let Some(entry) = deferred.first_entry() {
            if !is_final(entry.key().0) {
                break;
            }
            let (distance, points) = entry.remove_entry();
            deferred_len -= points.len();
            for point in points {
                queue.try_push(point, distance.0);
            }
        }

        collect_ring(lattice, &home, iteration, &mut ring);
        stats.add_cells_visited(ring.len());

        for &cell in &ring {
            let bucket = grid.bucket(cell);
            stats.add_points_scanned(bucket.len());

            for point in bucket.iter() {
                let distance = squared_euclidean(&point, query);
                if is_final(distance) {
                    queue.try_push(point, distance);
                } else {
                    deferred.entry(OrderedFloat(distance)).or_default().push(point);
                    deferred_len += 1;
                    stats.add_deferred(deferred_len);
                }
            }
        }

        if threshold.is_infinite() && queue.not_full() {
            return Err(GridError::index_corrupted(format!(
                "searched all {} cells but found only {} of {} neighbors",
                lattice.num_cells(),
                queue.len(),
                k
            )));
        }

        iteration += 1;
    }

    Ok(queue)
}

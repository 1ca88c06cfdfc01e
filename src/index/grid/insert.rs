//! Bulk loading of points into cell buckets.

use std::ops::Range;

use log::debug;
use parking_lot::Mutex;
use rayon::prelude::*;

use super::lattice::CellLattice;
use crate::buffer::PointBuffer;
use crate::error::{GridError, Result};
use crate::mbr::BoundingBox;

/// Split `num_points` points into `threads` contiguous ranges.
///
/// Every range holds `num_points / threads` points except the last, which
/// also takes the remainder.
pub fn chunk_ranges(num_points: usize, threads: usize) -> Vec<Range<usize>> {
    let threads = threads.max(1);
    let chunk = num_points / threads;
    (0..threads)
        .map(|t| {
            let start = t * chunk;
            let end = if t + 1 == threads { num_points } else { start + chunk };
            start..end
        })
        .collect()
}

/// Insert every point on the calling thread.
pub fn insert_sequential(
    lattice: &CellLattice,
    bounding_box: &BoundingBox,
    coordinates: &[f64],
    dimension: usize,
) -> Result<Vec<PointBuffer>> {
    let mut buckets = vec![PointBuffer::new(dimension); lattice.num_cells()];

    for (index, point) in coordinates.chunks_exact(dimension).enumerate() {
        if !bounding_box.is_within(point) {
            return Err(GridError::point_out_of_bounds(index, point));
        }
        buckets[lattice.cell_of(point)].push(point);
    }

    Ok(buckets)
}

/// Insert points concurrently from `threads` workers, one contiguous chunk
/// each, with a mutex guarding every bucket.
///
/// The first out-of-bounds point a worker meets aborts the build.
pub fn insert_parallel(
    lattice: &CellLattice,
    bounding_box: &BoundingBox,
    coordinates: &[f64],
    dimension: usize,
    threads: usize,
) -> Result<Vec<PointBuffer>> {
    let num_points = coordinates.len() / dimension;
    let buckets: Vec<Mutex<PointBuffer>> = (0..lattice.num_cells())
        .map(|_| Mutex::new(PointBuffer::new(dimension)))
        .collect();

    let ranges = chunk_ranges(num_points, threads);
    debug!(
        "Parallel insert of {} points with {} workers, chunk size {}",
        num_points,
        threads,
        ranges.first().map_or(0, |r| r.len())
    );

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    pool.install(|| {
        ranges.into_par_iter().try_for_each(|range| {
            let chunk = &coordinates[range.start * dimension..range.end * dimension];
            for (offset, point) in chunk.chunks_exact(dimension).enumerate() {
                if !bounding_box.is_within(point) {
                    return Err(GridError::point_out_of_bounds(range.start + offset, point));
                }
                buckets[lattice.cell_of(point)].lock().push(point);
            }
            Ok(())
        })
    })?;

    Ok(buckets.into_iter().map(Mutex::into_inner).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(points: &[f64]) -> (BoundingBox, CellLattice) {
        let bbox = BoundingBox::build(points, 2).unwrap();
        let lattice = CellLattice::new(&bbox, points.len() / 2, 2).unwrap();
        (bbox, lattice)
    }

    fn grid_points(side: usize) -> Vec<f64> {
        (0..side * side)
            .flat_map(|i| [(i % side) as f64, (i / side) as f64])
            .collect()
    }

    #[test]
    fn test_chunk_ranges_absorb_remainder() {
        let ranges = chunk_ranges(10, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
        assert_eq!(chunk_ranges(4, 1), vec![0..4]);
        assert_eq!(chunk_ranges(8, 4).iter().map(|r| r.len()).sum::<usize>(), 8);
    }

    #[test]
    fn test_sequential_conserves_points() {
        let points = grid_points(10);
        let (bbox, lattice) = setup(&points);
        let buckets = insert_sequential(&lattice, &bbox, &points, 2).unwrap();

        assert_eq!(buckets.len(), lattice.num_cells());
        assert_eq!(buckets.iter().map(PointBuffer::len).sum::<usize>(), 100);
    }

    #[test]
    fn test_parallel_matches_sequential_buckets() {
        let points = grid_points(12);
        let (bbox, lattice) = setup(&points);
        let sequential = insert_sequential(&lattice, &bbox, &points, 2).unwrap();
        let parallel = insert_parallel(&lattice, &bbox, &points, 2, 4).unwrap();

        assert_eq!(sequential.len(), parallel.len());
        for (a, b) in sequential.iter().zip(&parallel) {
            let mut a: Vec<Vec<f64>> = a.iter().map(|p| p.to_vec()).collect();
            let mut b: Vec<Vec<f64>> = b.iter().map(|p| p.to_vec()).collect();
            a.sort_by(|x, y| x.partial_cmp(y).unwrap());
            b.sort_by(|x, y| x.partial_cmp(y).unwrap());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_out_of_bounds_point_rejected() {
        let bbox = BoundingBox::from_corners(vec![0.0, 0.0], vec![10.0, 10.0]).unwrap();
        let lattice = CellLattice::with_cells(&bbox, vec![2, 2]).unwrap();
        let points = [1.0, 1.0, -1.0, -2.0, 3.0, 3.0];

        let result = insert_sequential(&lattice, &bbox, &points, 2);
        assert!(matches!(result, Err(GridError::PointOutOfBounds { index: 1, .. })));

        let result = insert_parallel(&lattice, &bbox, &points, 2, 2);
        assert!(matches!(result, Err(GridError::PointOutOfBounds { index: 1, .. })));
    }
}

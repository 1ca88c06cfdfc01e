//! Expanding-ring enumeration.
//!
//! Ring `i` around a home cell is the set of cells at Chebyshev distance
//! exactly `i`, clipped to the lattice. Each ring cell is produced once by
//! assigning it to the first dimension `d` in which it sits on a `±i` face:
//! dimensions before `d` then range over the shrunk window `±(i-1)` and
//! dimensions after `d` over the full window `±i`.

use super::lattice::{CellCoordinates, CellLattice};

/// Collect the linear indices of ring `iteration` around `home` into `out`.
///
/// `out` is cleared first. Rings past the lattice extent come back empty.
pub fn collect_ring(lattice: &CellLattice, home: &[usize], iteration: usize, out: &mut Vec<usize>) {
    out.clear();

    if iteration == 0 {
        out.push(lattice.linear_index(home));
        return;
    }

    let cells = lattice.cells_per_dimension();
    let dimension = lattice.dimension();
    let mut low = CellCoordinates::from_elem(0, dimension);
    let mut high = CellCoordinates::from_elem(0, dimension);
    let mut cursor = CellCoordinates::from_elem(0, dimension);

    for face_dim in 0..dimension {
        let row = home[face_dim];
        let lower_face = row.checked_sub(iteration);
        let upper_face = Some(row.saturating_add(iteration)).filter(|&r| r < cells[face_dim]);

        for face in [lower_face, upper_face].into_iter().flatten() {
            for dim in 0..dimension {
                if dim == face_dim {
                    low[dim] = face;
                    high[dim] = face;
                } else {
                    let reach = if dim < face_dim { iteration - 1 } else { iteration };
                    low[dim] = home[dim].saturating_sub(reach);
                    high[dim] = home[dim].saturating_add(reach).min(cells[dim] - 1);
                }
            }

            cursor.copy_from_slice(&low);
            loop {
                out.push(lattice.linear_index(&cursor));
                if !advance(&mut cursor, &low, &high) {
                    break;
                }
            }
        }
    }
}

/// Step an odometer over the box `low..=high`. Returns false after the last
/// position.
fn advance(cursor: &mut [usize], low: &[usize], high: &[usize]) -> bool {
    for dim in 0..cursor.len() {
        if cursor[dim] < high[dim] {
            cursor[dim] += 1;
            return true;
        }
        cursor[dim] = low[dim];
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mbr::BoundingBox;
    use std::collections::HashSet;

    fn lattice(cells: Vec<usize>) -> CellLattice {
        let dimension = cells.len();
        let bbox = BoundingBox::from_corners(vec![0.0; dimension], vec![1.0; dimension]).unwrap();
        CellLattice::with_cells(&bbox, cells).unwrap()
    }

    fn chebyshev(lattice: &CellLattice, a: usize, b: &[usize]) -> usize {
        lattice
            .cartesian(a)
            .iter()
            .zip(b)
            .map(|(x, y)| x.abs_diff(*y))
            .max()
            .unwrap_or(0)
    }

    /// Rings around `home` until one comes back empty.
    fn all_rings(lattice: &CellLattice, home: &[usize]) -> Vec<Vec<usize>> {
        let mut rings = Vec::new();
        let mut ring = Vec::new();
        for iteration in 0.. {
            collect_ring(lattice, home, iteration, &mut ring);
            if ring.is_empty() {
                break;
            }
            rings.push(ring.clone());
        }
        rings
    }

    #[test]
    fn test_ring_zero_is_home() {
        let lattice = lattice(vec![2, 2, 3]);
        let mut ring = Vec::new();
        collect_ring(&lattice, &[1, 0, 2], 0, &mut ring);
        assert_eq!(ring, vec![1 + 2 * 4]);
    }

    #[test]
    fn test_rings_partition_small_lattice() {
        let lattice = lattice(vec![2, 2, 3]);

        for home_linear in 0..lattice.num_cells() {
            let home = lattice.cartesian(home_linear);
            let rings = all_rings(&lattice, &home);

            let mut seen = HashSet::new();
            for (iteration, ring) in rings.iter().enumerate() {
                for &cell in ring {
                    assert!(seen.insert(cell), "cell {} emitted twice", cell);
                    assert_eq!(chebyshev(&lattice, cell, &home), iteration);
                }
            }
            assert_eq!(seen.len(), 12);
            assert_eq!(rings.iter().map(Vec::len).sum::<usize>(), 12);
        }
    }

    #[test]
    fn test_rings_past_exhaustion_are_empty() {
        let lattice = lattice(vec![2, 2, 3]);
        let mut ring = Vec::new();
        for iteration in 3..10 {
            collect_ring(&lattice, &[0, 0, 0], iteration, &mut ring);
            assert!(ring.is_empty());
        }
        collect_ring(&lattice, &[0, 0, 0], 2, &mut ring);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_interior_ring_sizes() {
        let lattice = lattice(vec![9, 9]);
        let mut ring = Vec::new();
        for iteration in 1..=4 {
            collect_ring(&lattice, &[4, 4], iteration, &mut ring);
            assert_eq!(ring.len(), 8 * iteration);
        }
    }

    #[test]
    fn test_rings_partition_uneven_lattice() {
        let lattice = lattice(vec![5, 1, 4, 3]);
        let home = [3, 0, 1, 2];
        let rings = all_rings(&lattice, &home);

        let mut cells: Vec<usize> = rings.concat();
        cells.sort_unstable();
        assert_eq!(cells, (0..lattice.num_cells()).collect::<Vec<_>>());
    }
}

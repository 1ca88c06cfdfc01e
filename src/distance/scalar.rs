//! Slice-level distance kernels.
//! Every other distance function in the crate bottoms out here.

/// Compute the squared Euclidean distance between two coordinate slices.
///
/// Returns sum((a[i] - b[i])^2)
///
/// Nearest-neighbor search only compares distances, so the hot path never
/// takes the square root.
///
/// # Panics
/// Panics if the slices have different lengths.
#[inline]
pub fn euclidean_distance_squared(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "Point dimensions must match");

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

/// Compute the Euclidean (L2) distance between two coordinate slices.
///
/// Returns sqrt(sum((a[i] - b[i])^2))
#[inline]
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    euclidean_distance_squared(a, b).sqrt()
}

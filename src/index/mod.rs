//! Exact kNN index implementations.

pub mod brute_force;
pub mod grid;
pub mod traits;

pub use brute_force::BruteForceIndex;
pub use grid::{CellLattice, Grid};
pub use traits::KnnIndex;

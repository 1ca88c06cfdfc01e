//! grid-knn: Exact k-nearest-neighbor search over a uniform grid.
//!
//! This crate bulk-loads fixed-dimension point clouds into a regular lattice
//! of cells and answers exact kNN queries by searching rings of cells around
//! the query until no unvisited cell can hold a closer point.
//!
//! # Features
//!
//! - **Adaptive Cell Size**: Lattice sized from a target points-per-cell fill
//! - **Parallel Bulk Load**: Large inputs are inserted from a Rayon pool
//! - **Exact Results**: Ring traversal with deferred candidates, no approximation
//! - **Brute Force Oracle**: Sequential and map-reduce scans for verification
//! - **Synthetic Data**: Seeded uniform, gaussian and clustered generators
//!
//! # Example
//!
//! ```
//! use grid_knn::{BoundingBox, Grid, GridConfig, KnnIndex, PointDistribution, PointGenerator};
//!
//! let bbox = BoundingBox::from_corners(vec![0.0; 3], vec![100.0; 3]).unwrap();
//! let points = PointGenerator::new(42, bbox)
//!     .generate(10_000, PointDistribution::Uniform)
//!     .unwrap();
//!
//! let grid = Grid::from_buffer(&points, GridConfig::default()).unwrap();
//! let neighbors = grid.k_nearest_neighbors(10, &[50.0, 50.0, 50.0]).unwrap();
//! assert_eq!(neighbors.len(), 10);
//!
//! for neighbor in neighbors.into_sorted_vec() {
//!     println!("{:?} at {:.3}", neighbor.point, neighbor.euclidean_distance());
//! }
//! ```

pub mod bpq;
pub mod buffer;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod index;
pub mod mbr;
pub mod metrics;
pub mod persistence;
pub mod point;

// Re-export commonly used types at crate root
pub use bpq::{BoundedQueue, Neighbor};
pub use buffer::PointBuffer;
pub use config::GridConfig;
pub use dataset::{recall_at_k, Dataset, PointDistribution, PointGenerator};
pub use distance::{euclidean, squared_euclidean};
pub use error::{GridError, Result};
pub use index::{BruteForceIndex, CellLattice, Grid, KnnIndex};
pub use mbr::BoundingBox;
pub use metrics::{GridStatistics, SearchStatistics};
pub use point::{PointAccessor, PointView};

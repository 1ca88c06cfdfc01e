//! Statistics for grid monitoring and query profiling.
//!
//! # Grid Statistics
//!
//! Use [`GridStatistics`] to see how evenly the lattice is filled:
//!
//! ```ignore
//! let grid = Grid::new(3, &coordinates)?;
//! println!("{}", grid.statistics().summary());
//! // Output:
//! // GridStatistics:
//! //   Points: 1000000 in 5000 cells (312 empty)
//! //   Cells per dimension: [17, 17, 18]
//! //   Bucket fill: min=0, max=251, mean=200.0, std=14.1
//! //   Memory: 22.93 MB
//! ```
//!
//! # Search Statistics
//!
//! Use [`SearchStatistics`] to profile one query:
//!
//! ```ignore
//! let (neighbors, stats) = grid.k_nearest_neighbors_with_stats(10, &query)?;
//! println!("{} rings, {} points scanned", stats.iterations, stats.points_scanned);
//! ```

use std::time::Duration;

/// Statistics about the layout of a built grid.
#[derive(Clone, Debug, Default)]
pub struct GridStatistics {
    /// Number of indexed points.
    pub num_points: usize,
    /// Point dimension.
    pub dimension: usize,
    /// Total number of cells.
    pub num_cells: usize,
    /// Number of cells holding no point.
    pub empty_cells: usize,
    /// Cell count in each dimension.
    pub cells_per_dimension: Vec<usize>,
    /// Smallest bucket size.
    pub bucket_size_min: usize,
    /// Largest bucket size.
    pub bucket_size_max: usize,
    /// Mean bucket size.
    pub bucket_size_mean: f64,
    /// Standard deviation of bucket sizes.
    pub bucket_size_std: f64,
    /// Estimated heap memory held by the buckets, in bytes.
    pub memory_bytes: usize,
}

impl GridStatistics {
    /// Compute statistics from per-cell bucket sizes.
    pub fn from_bucket_sizes(
        dimension: usize,
        cells_per_dimension: Vec<usize>,
        sizes: &[usize],
        memory_bytes: usize,
    ) -> Self {
        let num_cells = sizes.len();
        let num_points: usize = sizes.iter().sum();
        let mean = if num_cells == 0 {
            0.0
        } else {
            num_points as f64 / num_cells as f64
        };
        let variance = if num_cells == 0 {
            0.0
        } else {
            sizes
                .iter()
                .map(|&s| {
                    let diff = s as f64 - mean;
                    diff * diff
                })
                .sum::<f64>()
                / num_cells as f64
        };

        Self {
            num_points,
            dimension,
            num_cells,
            empty_cells: sizes.iter().filter(|&&s| s == 0).count(),
            cells_per_dimension,
            bucket_size_min: sizes.iter().copied().min().unwrap_or(0),
            bucket_size_max: sizes.iter().copied().max().unwrap_or(0),
            bucket_size_mean: mean,
            bucket_size_std: variance.sqrt(),
            memory_bytes,
        }
    }

    /// Fraction of cells holding no point.
    pub fn empty_ratio(&self) -> f64 {
        if self.num_cells == 0 {
            0.0
        } else {
            self.empty_cells as f64 / self.num_cells as f64
        }
    }

    /// Create a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "GridStatistics:\n  \
             Points: {} in {} cells ({} empty)\n  \
             Dimension: {}, Cells per dimension: {:?}\n  \
             Bucket fill: min={}, max={}, mean={:.1}, std={:.1}\n  \
             Memory: {:.2} MB",
            self.num_points,
            self.num_cells,
            self.empty_cells,
            self.dimension,
            self.cells_per_dimension,
            self.bucket_size_min,
            self.bucket_size_max,
            self.bucket_size_mean,
            self.bucket_size_std,
            self.memory_bytes as f64 / (1024.0 * 1024.0),
        )
    }
}

/// Statistics about a single kNN query.
#[derive(Clone, Debug, Default)]
pub struct SearchStatistics {
    /// Total query execution time.
    pub query_time: Duration,
    /// Number of ring iterations performed.
    pub iterations: usize,
    /// Number of cells whose buckets were scanned.
    pub cells_visited: usize,
    /// Number of points whose distance was computed.
    pub points_scanned: usize,
    /// Number of points that went through the deferred set.
    pub points_deferred: usize,
    /// Largest size the deferred set reached.
    pub deferred_peak: usize,
}

impl SearchStatistics {
    /// Get query time in milliseconds.
    pub fn query_time_ms(&self) -> f32 {
        self.query_time.as_secs_f32() * 1000.0
    }

    /// Create a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "SearchStatistics:\n  \
             Time: {:.3}ms\n  \
             Ring iterations: {}\n  \
             Cells visited: {}\n  \
             Points scanned: {}\n  \
             Points deferred: {} (peak {})",
            self.query_time_ms(),
            self.iterations,
            self.cells_visited,
            self.points_scanned,
            self.points_deferred,
            self.deferred_peak,
        )
    }
}

/// Builder for collecting search statistics during a query.
#[derive(Default)]
pub struct SearchStatsBuilder {
    stats: SearchStatistics,
}

impl SearchStatsBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one ring iteration.
    pub fn add_iteration(&mut self) {
        self.stats.iterations += 1;
    }

    /// Add to the count of visited cells.
    pub fn add_cells_visited(&mut self, count: usize) {
        self.stats.cells_visited += count;
    }

    /// Add to the count of scanned points.
    pub fn add_points_scanned(&mut self, count: usize) {
        self.stats.points_scanned += count;
    }

    /// Record one deferred point and the deferred set size after insertion.
    pub fn add_deferred(&mut self, deferred_len: usize) {
        self.stats.points_deferred += 1;
        self.stats.deferred_peak = self.stats.deferred_peak.max(deferred_len);
    }

    /// Set the query execution time.
    pub fn set_query_time(&mut self, duration: Duration) {
        self.stats.query_time = duration;
    }

    /// Build the final statistics.
    pub fn build(self) -> SearchStatistics {
        self.stats
    }
}

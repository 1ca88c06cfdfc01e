//! Named constants for configuration values.
//!
//! This module centralizes default values used throughout the crate. Grid
//! build parameters reach the grid through [`GridConfig`](crate::GridConfig)
//! defaults.

/// Defaults for grid construction.
pub mod grid {
    /// Target number of points per cell.
    /// Measurements on uniform data showed this works well for k < 1000.
    pub const CELL_FILL_OPTIMUM_DEFAULT: usize = 200;

    /// Upper bound on insert worker threads.
    pub const MAX_THREADS_DEFAULT: usize = 20;

    /// Number of points a single insert thread is expected to handle.
    /// Builds at or below this size run single-threaded without locks.
    pub const THREAD_LOAD_DEFAULT: usize = 100_000_000;
}

/// Defaults for bounding boxes.
pub mod mbr {
    /// Padding added to the high corner of a box built from a point set, so
    /// points on the upper boundary still fall inside the last cell.
    pub const EPSILON: f64 = 0.1;
}

/// Constants for the brute-force scanner.
pub mod brute_force {
    /// Points per chunk in the map phase of the parallel scan.
    pub const CHUNK_SIZE: usize = 16_384;

    /// Below this many points the parallel scan runs sequentially.
    pub const PARALLEL_THRESHOLD: usize = 65_536;
}

/// Defaults for synthetic point generation.
pub mod dataset {
    /// Draws per point before a generator restricted to its box gives up.
    pub const MAX_REJECTIONS: usize = 10_000;

    /// Seed used when none is given.
    pub const DEFAULT_SEED: u64 = 42;
}

/// Scratch sizes for per-query buffers.
pub mod query {
    /// Dimensions held inline before cell-coordinate scratch spills to the heap.
    pub const INLINE_DIMENSIONS: usize = 8;
}

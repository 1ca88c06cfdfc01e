//! Configuration for grid construction.
//!
//! All tuning knobs of the grid live in [`GridConfig`]. Defaults come from
//! [`crate::constants`].

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{GridError, Result};

/// Parameters controlling how a [`Grid`](crate::Grid) is laid out and built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Target average number of points per cell.
    pub cell_fill_optimum: usize,

    /// Maximum number of insert worker threads.
    pub max_threads: usize,

    /// Points per insert thread. Builds with more points than this are
    /// split across `min(max_threads, ceil(n / thread_load))` workers.
    pub thread_load: usize,

    /// Padding added to the high corner of the computed bounding box.
    pub epsilon: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_fill_optimum: constants::grid::CELL_FILL_OPTIMUM_DEFAULT,
            max_threads: constants::grid::MAX_THREADS_DEFAULT,
            thread_load: constants::grid::THREAD_LOAD_DEFAULT,
            epsilon: constants::mbr::EPSILON,
        }
    }
}

impl GridConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target number of points per cell.
    pub fn with_cell_fill_optimum(mut self, cell_fill_optimum: usize) -> Self {
        self.cell_fill_optimum = cell_fill_optimum;
        self
    }

    /// Set the maximum number of insert threads.
    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Set the per-thread insert load.
    pub fn with_thread_load(mut self, thread_load: usize) -> Self {
        self.thread_load = thread_load;
        self
    }

    /// Set the bounding-box padding.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        if self.cell_fill_optimum == 0 {
            return Err(GridError::invalid_parameter(
                "cell_fill_optimum must be greater than 0",
            ));
        }
        if self.max_threads == 0 {
            return Err(GridError::invalid_parameter(
                "max_threads must be greater than 0",
            ));
        }
        if self.thread_load == 0 {
            return Err(GridError::invalid_parameter(
                "thread_load must be greater than 0",
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(GridError::invalid_parameter(format!(
                "epsilon must be finite and non-negative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// Number of insert workers for a build of `num_points` points.
    ///
    /// Returns 1 when the build should run single-threaded.
    pub fn insert_threads(&self, num_points: usize) -> usize {
        if num_points <= self.thread_load {
            return 1;
        }
        num_points
            .div_ceil(self.thread_load)
            .min(self.max_threads)
            .max(1)
    }
}

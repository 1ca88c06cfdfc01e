//! Dataset utilities for generating point clouds and evaluating kNN results.
//!
//! [`PointGenerator`] draws reproducible point clouds from a seeded RNG, and
//! [`Dataset`] bundles a generated cloud with query points and brute-force
//! ground truth.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::buffer::PointBuffer;
use crate::constants::dataset::{DEFAULT_SEED, MAX_REJECTIONS};
use crate::error::{GridError, Result};
use crate::index::BruteForceIndex;
use crate::mbr::BoundingBox;

/// Shape of a generated point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointDistribution {
    /// Uniform over the generator's bounding box.
    Uniform,
    /// One normal distribution shared by every coordinate.
    Gaussian { mean: f64, stddev: f64 },
    /// Normal clusters around centers drawn uniformly in the box. Points are
    /// dealt to clusters round-robin.
    GaussianClusters { clusters: usize, stddev: f64 },
}

/// Seeded generator of random point clouds.
///
/// Two generators with the same seed and box produce identical output.
pub struct PointGenerator {
    rng: StdRng,
    bounding_box: BoundingBox,
    reject_outside: bool,
}

impl PointGenerator {
    /// Create a generator drawing within `bounding_box`.
    pub fn new(seed: u64, bounding_box: BoundingBox) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            bounding_box,
            reject_outside: false,
        }
    }

    /// Create a generator with the default seed.
    pub fn with_default_seed(bounding_box: BoundingBox) -> Self {
        Self::new(DEFAULT_SEED, bounding_box)
    }

    /// Redraw gaussian points that fall outside the bounding box.
    ///
    /// Uniform points are always inside.
    pub fn with_rejection(mut self, reject_outside: bool) -> Self {
        self.reject_outside = reject_outside;
        self
    }

    /// The box points are drawn in.
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Draw `num_points` points.
    ///
    /// # Errors
    /// Fails on a negative or non-finite standard deviation, zero clusters,
    /// or when rejection cannot find a point inside the box.
    pub fn generate(&mut self, num_points: usize, distribution: PointDistribution) -> Result<PointBuffer> {
        let dimension = self.bounding_box.dimension();
        let mut points = PointBuffer::with_capacity(dimension, num_points);

        match distribution {
            PointDistribution::Uniform => {
                let axes = self.uniform_axes();
                let mut point = vec![0.0; dimension];
                for _ in 0..num_points {
                    for (coord, axis) in point.iter_mut().zip(&axes) {
                        *coord = axis.sample(&mut self.rng);
                    }
                    points.push(&point);
                }
            }
            PointDistribution::Gaussian { mean, stddev } => {
                let normal = normal(mean, stddev)?;
                let mut point = vec![0.0; dimension];
                for index in 0..num_points {
                    self.draw_gaussian(&mut point, index, |coord, rng, _| {
                        *coord = normal.sample(rng);
                    })?;
                    points.push(&point);
                }
            }
            PointDistribution::GaussianClusters { clusters, stddev } => {
                if clusters == 0 {
                    return Err(GridError::invalid_parameter("clusters must be greater than 0"));
                }
                normal(0.0, stddev)?;

                let axes = self.uniform_axes();
                let centers = (0..clusters)
                    .map(|_| {
                        axes.iter()
                            .map(|axis| normal(axis.sample(&mut self.rng), stddev))
                            .collect::<Result<Vec<_>>>()
                    })
                    .collect::<Result<Vec<_>>>()?;

                let mut point = vec![0.0; dimension];
                for index in 0..num_points {
                    let cluster = &centers[index % clusters];
                    self.draw_gaussian(&mut point, index, |coord, rng, dim| {
                        *coord = cluster[dim].sample(rng);
                    })?;
                    points.push(&point);
                }
            }
        }

        Ok(points)
    }

    fn uniform_axes(&self) -> Vec<Uniform<f64>> {
        self.bounding_box
            .low()
            .as_slice()
            .iter()
            .zip(self.bounding_box.high().as_slice())
            .map(|(&low, &high)| Uniform::new_inclusive(low, high))
            .collect()
    }

    /// Fill `point` coordinate by coordinate, redrawing while rejection is on
    /// and the point lies outside the box.
    fn draw_gaussian<F>(&mut self, point: &mut [f64], index: usize, mut sample: F) -> Result<()>
    where
        F: FnMut(&mut f64, &mut StdRng, usize),
    {
        for _ in 0..MAX_REJECTIONS {
            for (dim, coord) in point.iter_mut().enumerate() {
                sample(coord, &mut self.rng, dim);
            }
            if !self.reject_outside || self.bounding_box.is_within(&*point) {
                return Ok(());
            }
        }
        Err(GridError::invalid_parameter(format!(
            "no point inside the bounding box after {} draws for point {}",
            MAX_REJECTIONS, index
        )))
    }
}

fn normal(mean: f64, stddev: f64) -> Result<Normal<f64>> {
    if !stddev.is_finite() || stddev < 0.0 {
        return Err(GridError::invalid_parameter(format!(
            "stddev must be finite and non-negative, got {}",
            stddev
        )));
    }
    Normal::new(mean, stddev).map_err(|e| GridError::invalid_parameter(e.to_string()))
}

/// A dataset containing points, queries, and ground truth for evaluation.
pub struct Dataset {
    pub points: PointBuffer,
    pub queries: PointBuffer,
    /// Ascending squared distances of the true `k` nearest points, per query.
    pub ground_truth: Vec<Vec<f64>>,
}

impl Dataset {
    /// Generate a random synthetic dataset.
    ///
    /// Points follow `distribution`; queries are uniform in the same box.
    pub fn generate(
        num_points: usize,
        num_queries: usize,
        bounding_box: BoundingBox,
        distribution: PointDistribution,
        seed: u64,
    ) -> Result<Self> {
        let mut generator = PointGenerator::new(seed, bounding_box);
        let points = generator.generate(num_points, distribution)?;
        let queries = generator.generate(num_queries, PointDistribution::Uniform)?;

        Ok(Self {
            points,
            queries,
            ground_truth: Vec::new(),
        })
    }

    /// Dimension of points and queries.
    pub fn dimension(&self) -> usize {
        self.points.dimension()
    }

    /// Compute ground truth nearest neighbors using brute force search.
    ///
    /// For each query, stores the squared distances of its `k` nearest points.
    pub fn compute_ground_truth(&mut self, k: usize) -> Result<()> {
        let index = BruteForceIndex::new(self.points.clone())?;

        self.ground_truth = (0..self.queries.len())
            .map(|idx| {
                index
                    .k_nearest_neighbors_parallel(k, &self.queries.point(idx))
                    .map(|queue| queue.distances())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(())
    }
}

/// Compute recall@k between predicted and ground truth distances.
///
/// A predicted neighbor counts as found if its distance does not exceed the
/// true k-th distance, so ties at the boundary are not penalized. Returns a
/// value between 0.0 and 1.0.
pub fn recall_at_k(predicted: &[f64], ground_truth: &[f64], k: usize) -> f32 {
    if k == 0 {
        return 1.0;
    }
    let Some(&kth) = ground_truth.get(k - 1) else {
        return 0.0;
    };
    let found = predicted.iter().take(k).filter(|&&d| d <= kth).count();
    found as f32 / k as f32
}

//! Correctness tests verifying grid kNN results match the brute force oracle.
//!
//! Run with: cargo test

use grid_knn::{
    recall_at_k, BoundingBox, BruteForceIndex, Dataset, Grid, GridConfig, GridError, KnnIndex,
    PointBuffer, PointDistribution, PointGenerator,
};

fn cube(dimension: usize, side: f64) -> BoundingBox {
    BoundingBox::from_corners(vec![0.0; dimension], vec![side; dimension]).unwrap()
}

/// Compare grid and oracle distance lists for every query of the dataset.
fn assert_matches_oracle(grid: &Grid, dataset: &Dataset, k: usize) {
    for (q, expected) in dataset.ground_truth.iter().enumerate() {
        let query = dataset.queries.point(q);
        let actual = grid.k_nearest_neighbors(k, &query).unwrap().distances();
        assert_eq!(
            &actual, expected,
            "mismatch for query {} ({:?}) with k={}",
            q, query, k
        );
    }
}

#[test]
fn test_grid_matches_oracle_across_distributions() {
    let distributions = [
        PointDistribution::Uniform,
        PointDistribution::Gaussian { mean: 50.0, stddev: 10.0 },
        PointDistribution::GaussianClusters { clusters: 5, stddev: 2.0 },
    ];

    for distribution in distributions {
        let mut dataset = Dataset::generate(5_000, 50, cube(3, 100.0), distribution, 17).unwrap();
        dataset.compute_ground_truth(10).unwrap();

        let config = GridConfig::new().with_cell_fill_optimum(16);
        let grid = Grid::from_buffer(&dataset.points, config).unwrap();

        assert_matches_oracle(&grid, &dataset, 10);
    }
}

#[test]
fn test_grid_matches_oracle_across_dimensions() {
    for dimension in [1, 2, 4, 6] {
        let mut dataset =
            Dataset::generate(3_000, 30, cube(dimension, 10.0), PointDistribution::Uniform, 23).unwrap();
        dataset.compute_ground_truth(5).unwrap();

        let grid = Grid::from_buffer(&dataset.points, GridConfig::new().with_cell_fill_optimum(8)).unwrap();
        assert_eq!(grid.cells_per_dimension().len(), dimension);

        assert_matches_oracle(&grid, &dataset, 5);
    }
}

#[test]
fn test_grid_matches_oracle_for_every_k() {
    let points = PointGenerator::new(3, cube(2, 1.0))
        .generate(60, PointDistribution::Uniform)
        .unwrap();
    let grid = Grid::from_buffer(&points, GridConfig::new().with_cell_fill_optimum(3)).unwrap();
    let oracle = BruteForceIndex::new(points.clone()).unwrap();

    let queries = [[0.5, 0.5], [0.0, 0.0], [1.0, 0.3], [0.99, 0.01]];
    for query in queries {
        for k in 1..=points.len() {
            let expected = oracle.k_nearest_neighbors(k, &query).unwrap().distances();
            let actual = grid.k_nearest_neighbors(k, &query).unwrap();
            assert_eq!(actual.len(), k);
            assert_eq!(actual.distances(), expected, "query {:?}, k {}", query, k);
        }
    }
}

#[test]
fn test_parallel_build_matches_sequential() {
    let points = PointGenerator::new(99, cube(3, 50.0))
        .generate(20_000, PointDistribution::GaussianClusters { clusters: 8, stddev: 3.0 })
        .unwrap();

    let config = GridConfig::new().with_cell_fill_optimum(32);
    let sequential = Grid::from_buffer(&points, config.clone()).unwrap();
    let parallel = Grid::from_buffer(&points, config.with_thread_load(3_000).with_max_threads(6)).unwrap();

    assert_eq!(sequential.len(), parallel.len());
    assert_eq!(
        parallel.buckets().map(PointBuffer::len).sum::<usize>(),
        points.len()
    );

    let queries = PointGenerator::new(100, cube(3, 50.0))
        .generate(25, PointDistribution::Uniform)
        .unwrap();
    for query in queries.iter() {
        let a = sequential.k_nearest_neighbors(20, &query).unwrap().distances();
        let b = parallel.k_nearest_neighbors(20, &query).unwrap().distances();
        assert_eq!(a, b);
    }
}

#[test]
fn test_queries_outside_bounding_box() {
    let mut dataset = Dataset::generate(2_000, 0, cube(2, 10.0), PointDistribution::Uniform, 5).unwrap();
    dataset.queries = PointBuffer::from_vec(2, vec![-20.0, 5.0, 30.0, 30.0, 5.0, -0.5, -100.0, -100.0]).unwrap();
    dataset.compute_ground_truth(7).unwrap();

    let grid = Grid::from_buffer(&dataset.points, GridConfig::new().with_cell_fill_optimum(10)).unwrap();
    assert_matches_oracle(&grid, &dataset, 7);
}

#[test]
fn test_duplicate_points() {
    let mut coordinates = Vec::new();
    for _ in 0..50 {
        coordinates.extend_from_slice(&[1.0, 1.0]);
    }
    coordinates.extend_from_slice(&[5.0, 5.0, 9.0, 9.0]);

    let grid = Grid::with_config(2, &coordinates, GridConfig::new().with_cell_fill_optimum(2)).unwrap();

    let neighbors = grid.k_nearest_neighbors(51, &[1.0, 1.0]).unwrap();
    let distances = neighbors.distances();
    assert!(distances[..50].iter().all(|&d| d == 0.0));
    assert_eq!(distances[50], 32.0);
}

#[test]
fn test_recall_is_perfect_on_clustered_data() {
    let mut dataset = Dataset::generate(
        8_000,
        40,
        cube(3, 100.0),
        PointDistribution::GaussianClusters { clusters: 3, stddev: 1.5 },
        71,
    )
    .unwrap();
    dataset.compute_ground_truth(25).unwrap();

    let grid = Grid::from_buffer(&dataset.points, GridConfig::default()).unwrap();
    let batch = grid.batch_k_nearest_neighbors(25, &dataset.queries).unwrap();

    for (result, truth) in batch.iter().zip(&dataset.ground_truth) {
        assert_eq!(recall_at_k(&result.distances(), truth, 25), 1.0);
    }
}

#[test]
fn test_bounded_grid_rejects_outside_point() {
    let bbox = cube(3, 10.0);
    let coordinates = [1.0, 1.0, 1.0, 9.0, 9.0, 9.0, -1.0, -2.0, -3.0];

    let err = Grid::with_bounds(3, &coordinates, bbox.clone(), GridConfig::default()).unwrap_err();
    assert!(matches!(err, GridError::PointOutOfBounds { index: 2, .. }));

    let grid = Grid::with_bounds(3, &coordinates[..6], bbox, GridConfig::default()).unwrap();
    assert_eq!(grid.len(), 2);
}

#[test]
fn test_k_out_of_range_fails_fast() {
    let grid = Grid::new(2, &[0.0, 0.0, 1.0, 1.0, 2.0, 2.0]).unwrap();
    assert!(matches!(
        grid.k_nearest_neighbors(4, &[0.0, 0.0]),
        Err(GridError::InsufficientPoints { required: 4, actual: 3 })
    ));
    assert!(grid.k_nearest_neighbors(0, &[0.0, 0.0]).is_err());
    assert_eq!(grid.k_nearest_neighbors(3, &[0.0, 0.0]).unwrap().len(), 3);
}

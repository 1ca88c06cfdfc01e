//! Basic usage example: build a grid, query it, and check it against brute force.
//!
//! Run with: RUST_LOG=info cargo run --example basic_usage

use grid_knn::{
    BoundingBox, BruteForceIndex, Grid, GridConfig, KnnIndex, PointDistribution, PointGenerator,
};

fn main() -> grid_knn::Result<()> {
    env_logger::init();

    println!("=== Grid kNN Demo ===\n");

    let dimension = 3;
    let num_points = 500_000;
    let bbox = BoundingBox::from_corners(vec![0.0; dimension], vec![1_000.0; dimension])?;

    let points = PointGenerator::new(42, bbox.clone())
        .generate(num_points, PointDistribution::GaussianClusters { clusters: 8, stddev: 40.0 })?;
    println!("Generated {} clustered points in {} dimensions\n", num_points, dimension);

    let start = std::time::Instant::now();
    let grid = Grid::from_buffer(&points, GridConfig::default())?;
    println!("Built grid in {:.2?}", start.elapsed());
    println!("{}\n", grid);
    println!("{}\n", grid.statistics().summary());

    println!("=== Query ===\n");

    let query = [500.0, 500.0, 500.0];
    let (neighbors, stats) = grid.k_nearest_neighbors_with_stats(5, &query)?;
    for (rank, neighbor) in neighbors.into_sorted_vec().iter().enumerate() {
        println!(
            "#{} {:?} at distance {:.4}",
            rank + 1,
            neighbor.point,
            neighbor.euclidean_distance()
        );
    }
    println!("\n{}\n", stats.summary());

    println!("=== Brute Force Check ===\n");

    let oracle = BruteForceIndex::new(points)?;
    let queries = PointGenerator::new(7, bbox).generate(100, PointDistribution::Uniform)?;

    let start = std::time::Instant::now();
    let grid_results = grid.batch_k_nearest_neighbors(10, &queries)?;
    let grid_time = start.elapsed();

    let start = std::time::Instant::now();
    let oracle_results = oracle.batch_k_nearest_neighbors(10, &queries)?;
    let oracle_time = start.elapsed();

    let matching = grid_results
        .iter()
        .zip(&oracle_results)
        .filter(|(a, b)| a.distances() == b.distances())
        .count();

    println!("Grid:        {} queries in {:.2?}", queries.len(), grid_time);
    println!("Brute force: {} queries in {:.2?}", queries.len(), oracle_time);
    println!("Exact matches: {}/{}", matching, queries.len());

    Ok(())
}

//! Helpers shared by the integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use zkp_three_coloring::{generate, Color, Graph};

/// Routes library logs to the test writer. Safe to call from every test.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("zkp_three_coloring=error"))
        .try_init();
}

/// Seeded random graph with at least one edge.
pub fn random_graph(size: usize, density: f64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    loop {
        let (graph, _) = generate(size, density, &mut rng).expect("valid parameters");
        if graph.edge_count() > 0 {
            return graph;
        }
    }
}

/// Path `0 - 1 - ... - (n-1)` colored Red/Green alternately.
pub fn alternating_path(nodes: usize) -> Graph {
    let colors = (0..nodes)
        .map(|i| if i % 2 == 0 { Color::Red } else { Color::Green })
        .collect();
    let edges: Vec<(usize, usize)> = (1..nodes).map(|i| (i - 1, i)).collect();
    Graph::from_edges(colors, &edges).expect("alternating path is properly colored")
}

use crate::error::{Error, Result};
use crate::graph::{Color, Graph};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const EDGE_DENSITY: f64 = 0.5;
pub const DEFAULT_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceParameters {
    pub nodes: usize,
    pub edge_density: f64,
    pub edges: usize,
    /// Node count per color, indexed by `Color::to_u8`.
    pub color_classes: [usize; 3],
}

/// Samples a random coloring, then connects differently colored pairs with
/// probability `edge_density`. Same-colored pairs are never connected, so the
/// coloring is a valid witness by construction.
pub fn generate(
    size: usize,
    edge_density: f64,
    rng: &mut impl Rng,
) -> Result<(Graph, InstanceParameters)> {
    if size < 1 {
        return Err(Error::InvalidGraphSize(size));
    }
    if !(edge_density > 0.0 && edge_density <= 1.0) {
        return Err(Error::InvalidEdgeDensity(edge_density));
    }

    let colors: Vec<Color> = (0..size).map(|_| random_color(rng)).collect();
    let mut adjacency = vec![vec![false; size]; size];
    for i in 0..size {
        for j in 0..i {
            if colors[i] != colors[j] && rng.random::<f64>() < edge_density {
                adjacency[i][j] = true;
                adjacency[j][i] = true;
            }
        }
    }

    let mut color_classes = [0usize; 3];
    for color in &colors {
        color_classes[color.to_u8() as usize] += 1;
    }

    let graph = Graph::assemble(colors, adjacency);
    let params = InstanceParameters {
        nodes: size,
        edge_density,
        edges: graph.edge_count(),
        color_classes,
    };
    Ok((graph, params))
}

fn random_color(rng: &mut impl Rng) -> Color {
    match rng.random_range(0..3) {
        0 => Color::Red,
        1 => Color::Green,
        _ => Color::Blue,
    }
}

use crate::error::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    pub fn to_u8(self) -> u8 {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Blue => 2,
        }
    }

    /// Canonical bytes fed to the commitment hash. Nothing else sees this encoding.
    pub fn label(self) -> &'static [u8] {
        match self {
            Color::Red => b"r",
            Color::Green => b"g",
            Color::Blue => b"b",
        }
    }

    fn symbol(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Green => 'g',
            Color::Blue => 'b',
        }
    }
}

/// Undirected edge, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

/// Graph together with a valid 3-coloring of it.
///
/// The adjacency matrix is symmetric with a zero diagonal and never changes after
/// construction; every edge joins nodes of different colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct Graph {
    colors: Vec<Color>,
    adjacency: Vec<Vec<bool>>,
    #[serde(skip_serializing)]
    edges: Vec<Edge>,
}

/// Wire form of a [`Graph`]; decoding goes through [`Graph::from_parts`].
#[derive(Deserialize)]
struct RawGraph {
    colors: Vec<Color>,
    adjacency: Vec<Vec<bool>>,
}

impl TryFrom<RawGraph> for Graph {
    type Error = Error;

    fn try_from(raw: RawGraph) -> Result<Self> {
        Graph::from_parts(raw.colors, raw.adjacency)
    }
}

impl Graph {
    /// Builds a graph from a coloring and an adjacency matrix, checking every invariant.
    pub fn from_parts(colors: Vec<Color>, adjacency: Vec<Vec<bool>>) -> Result<Self> {
        let n = colors.len();
        if n == 0 {
            return Err(Error::InvalidGraphSize(0));
        }
        if adjacency.len() != n || adjacency.iter().any(|row| row.len() != n) {
            return Err(Error::MalformedGraph(format!(
                "adjacency matrix must be {n}x{n}"
            )));
        }
        for i in 0..n {
            if adjacency[i][i] {
                return Err(Error::MalformedGraph(format!("self-loop on node {i}")));
            }
            for j in (i + 1)..n {
                if adjacency[i][j] != adjacency[j][i] {
                    return Err(Error::MalformedGraph(format!(
                        "adjacency is not symmetric at ({i}, {j})"
                    )));
                }
                if adjacency[i][j] && colors[i] == colors[j] {
                    return Err(Error::ColoringConflict(i, j));
                }
            }
        }
        Ok(Self::assemble(colors, adjacency))
    }

    /// Convenience constructor from an edge list.
    pub fn from_edges(colors: Vec<Color>, edges: &[(usize, usize)]) -> Result<Self> {
        let n = colors.len();
        let mut adjacency = vec![vec![false; n]; n];
        for &(i, j) in edges {
            if let Some(&index) = [i, j].iter().find(|&&index| index >= n) {
                return Err(Error::IndexOutOfRange { index, size: n });
            }
            adjacency[i][j] = true;
            adjacency[j][i] = true;
        }
        Self::from_parts(colors, adjacency)
    }

    /// Caller guarantees the invariants; used by the generator which holds them by construction.
    pub(crate) fn assemble(colors: Vec<Color>, adjacency: Vec<Vec<bool>>) -> Self {
        let n = colors.len();
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if adjacency[i][j] {
                    edges.push(Edge { a: i, b: j });
                }
            }
        }
        Graph {
            colors,
            adjacency,
            edges,
        }
    }

    pub fn size(&self) -> usize {
        self.colors.len()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_adjacent(&self, i: usize, j: usize) -> bool {
        self.adjacency
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(false)
    }

    /// True when every edge joins two differently colored nodes.
    pub fn is_properly_colored(&self) -> bool {
        self.edges
            .iter()
            .all(|edge| self.colors[edge.a] != self.colors[edge.b])
    }

    /// Uniformly random edge, returned as `(a, b)` with `a < b`.
    pub fn random_edge(&self, rng: &mut impl Rng) -> Result<(usize, usize)> {
        if self.edges.is_empty() {
            return Err(Error::EmptyEdgeSet);
        }
        let edge = self.edges[rng.random_range(0..self.edges.len())];
        Ok((edge.a, edge.b))
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = self.colors.iter().map(|c| c.symbol().to_string()).collect();
        writeln!(f, "  {}", header.join(" "))?;
        for (i, row) in self.adjacency.iter().enumerate() {
            let cells: Vec<&str> = row.iter().map(|&e| if e { "x" } else { " " }).collect();
            writeln!(f, "{} {}", self.colors[i].symbol(), cells.join(" "))?;
        }
        Ok(())
    }
}

pub mod graph;

pub use graph::{Color, Edge, Graph};

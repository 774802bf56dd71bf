//! Adapters between the matrix and graph views
//!
//! An `n`-vertex graph is an `n x n` matrix whose non-zeros are the edges
//! and whose values are the edge weights. Vertex weights have no matrix
//! counterpart: they are dropped when a graph is viewed as a matrix and
//! synthesized as 1 when a matrix is viewed as a graph.

pub mod graph_as_matrix;
pub mod matrix_as_graph;

pub use graph_as_matrix::GraphAsMatrix;
pub use matrix_as_graph::MatrixAsGraph;

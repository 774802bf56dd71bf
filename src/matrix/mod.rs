// Owned matrix and graph containers

pub mod conversion;
pub mod csr;
pub mod graph;

pub use csr::SparseMatrixCSR;
pub use graph::SparseGraph;

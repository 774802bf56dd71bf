//! Conversion functions between the owned matrix and graph containers
//!
//! These mirror the streaming adapters in [`crate::adapters`]: a square
//! matrix is a graph whose edge weights are the matrix values, and a graph
//! is a matrix whose values are its edge weights (vertex weights dropped).

use crate::error::{FormatError, Result};
use crate::matrix::{SparseGraph, SparseMatrixCSR};
use crate::Value;

impl SparseMatrixCSR<Value> {
    /// Views this square matrix as a graph with edge weights and no vertex weights
    pub fn to_graph(&self) -> Result<SparseGraph> {
        if self.n_rows != self.n_cols {
            return Err(FormatError::BadParameter(format!(
                "Only square matrices can be converted to graphs ({} x {})",
                self.n_rows, self.n_cols
            )));
        }

        SparseGraph::new(
            self.row_ptr.clone(),
            self.col_idx.clone(),
            0,
            None,
            Some(self.values.clone()),
        )
    }
}

impl SparseGraph {
    /// Views this graph as an n_vtxs × n_vtxs matrix.
    ///
    /// Edge weights become values (1 when absent); vertex weights are dropped.
    pub fn to_matrix(&self) -> SparseMatrixCSR<Value> {
        let values = match &self.adjwgt {
            Some(adjwgt) => adjwgt.clone(),
            None => vec![1.0; self.n_edges()],
        };

        SparseMatrixCSR {
            n_rows: self.n_vtxs,
            n_cols: self.n_vtxs,
            row_ptr: self.xadj.clone(),
            col_idx: self.adjncy.clone(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_to_graph() {
        //    [0 2 0]
        //    [2 0 3]
        //    [0 3 0]
        let csr = SparseMatrixCSR::new(
            3,
            3,
            vec![0, 1, 3, 4],
            vec![1, 0, 2, 1],
            vec![2.0, 2.0, 3.0, 3.0],
        );

        let graph = csr.to_graph().unwrap();
        assert_eq!(graph.n_vtxs, 3);
        assert_eq!(graph.n_vwgt, 0);
        assert_eq!(graph.xadj, csr.row_ptr);
        assert_eq!(graph.adjwgt, Some(csr.values.clone()));
        assert!(graph.is_symmetric());

        assert_eq!(graph.to_matrix(), csr);
    }

    #[test]
    fn test_non_square_matrix_to_graph() {
        let csr = SparseMatrixCSR::<Value>::zeros(2, 3);
        assert!(matches!(csr.to_graph(), Err(FormatError::BadParameter(_))));
    }

    #[test]
    fn test_unweighted_graph_to_matrix() {
        let graph = SparseGraph::new(
            vec![0, 1, 2],
            vec![1, 0],
            1,
            Some(vec![5.0, 6.0]),
            None,
        )
        .unwrap();

        let matrix = graph.to_matrix();
        assert_eq!(matrix.n_rows, 2);
        assert_eq!(matrix.n_cols, 2);
        assert_eq!(matrix.values, vec![1.0, 1.0]);
    }
}

//! Utilities for converting between our containers and `sprs`

use crate::matrix::{SparseGraph, SparseMatrixCSR};
use num_traits::Num;
use sprs::CsMat;

/// Converts our CSR matrix format to sprs CsMat format.
///
/// `sprs` requires strictly increasing column indices within each row, and
/// coordinate formats read back rows in file order with repeated entries
/// kept, so rows are sorted and repeated entries summed on the way.
pub fn to_sprs_csr<T>(matrix: &SparseMatrixCSR<T>) -> CsMat<T>
where
    T: Copy + Num + Default + PartialOrd,
{
    let mut row_ptr = Vec::with_capacity(matrix.n_rows + 1);
    let mut col_idx = Vec::with_capacity(matrix.nnz());
    let mut values = Vec::with_capacity(matrix.nnz());
    row_ptr.push(0);

    for i in 0..matrix.n_rows {
        let start = col_idx.len();
        for (col, val) in matrix.sorted_row(i) {
            if col_idx.len() > start && col_idx.last() == Some(&col) {
                if let Some(last) = values.last_mut() {
                    *last = *last + val;
                }
            } else {
                col_idx.push(col);
                values.push(val);
            }
        }
        row_ptr.push(col_idx.len());
    }

    CsMat::new((matrix.n_rows, matrix.n_cols), row_ptr, col_idx, values)
}

/// Converts sprs CsMat to our SparseMatrixCSR format
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num + Default,
{
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSR {
        n_rows: shape.0,
        n_cols: shape.1,
        row_ptr: indptr,
        col_idx: indices,
        values: data,
    }
}

/// Converts a graph into its weighted adjacency matrix as a sprs CsMat
pub fn graph_to_sprs(graph: &SparseGraph) -> CsMat<f64> {
    to_sprs_csr(&graph.to_matrix())
}

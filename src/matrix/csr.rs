//! Compressed Sparse Row (CSR) matrix container

use std::fmt;

use ndarray::Array2;
use num_traits::Num;

use crate::error::{FormatError, Result};

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing indices into col_idx and values arrays
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// This is the owned counterpart of the caller-allocated `rowptr`/`rowind`/`rowval`
/// buffers that the readers and writers in this crate fill and drain.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSR<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i] is the index in col_idx and values where row i starts
    /// row_ptr[n_rows] is equal to nnz
    pub row_ptr: Vec<usize>,

    /// Column indices (size: nnz)
    pub col_idx: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<T> SparseMatrixCSR<T>
where
    T: Copy + Num,
{
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent; see [`Self::try_new`]
    /// for the checked variant.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        match Self::try_new(n_rows, n_cols, row_ptr, col_idx, values) {
            Ok(matrix) => matrix,
            Err(err) => panic!("{}", err),
        }
    }

    /// Creates a new CSR matrix, validating that:
    /// - row_ptr.len() is n_rows + 1
    /// - col_idx.len() equals values.len()
    /// - row_ptr is monotonic and row_ptr[n_rows] equals col_idx.len()
    /// - every column index is below n_cols
    pub fn try_new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if row_ptr.len() != n_rows + 1 {
            return Err(FormatError::BadParameter(
                "row_ptr.len() must be n_rows + 1".to_string(),
            ));
        }
        if col_idx.len() != values.len() {
            return Err(FormatError::BadParameter(
                "col_idx.len() must equal values.len()".to_string(),
            ));
        }
        if row_ptr[0] != 0 || row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(FormatError::BadParameter(
                "row_ptr must start at 0 and be non-decreasing".to_string(),
            ));
        }
        if row_ptr[n_rows] != col_idx.len() {
            return Err(FormatError::BadParameter(
                "row_ptr[n_rows] must equal col_idx.len()".to_string(),
            ));
        }
        if let Some(&col) = col_idx.iter().find(|&&col| col >= n_cols) {
            return Err(FormatError::BadParameter(format!(
                "Column index {} out of bounds (n_cols = {})",
                col, n_cols
            )));
        }

        Ok(Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        })
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns the number of stored entries in row i
    pub fn degree(&self, i: usize) -> usize {
        self.row_ptr[i + 1] - self.row_ptr[i]
    }

    /// Returns an iterator over the non-zero elements in row i
    ///
    /// Each item is a tuple (col_idx, value) representing a non-zero element
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.n_rows, "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, val)| (col, val))
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self {
            n_rows: n,
            n_cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n).collect(),
            values: vec![T::one(); n],
        }
    }

    /// Expands the matrix into a dense array, summing duplicate entries
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.n_rows, self.n_cols), T::zero());
        for i in 0..self.n_rows {
            for (j, &val) in self.row_iter(i) {
                dense[[i, j]] = dense[[i, j]] + val;
            }
        }
        dense
    }
}

impl<T: Copy + PartialOrd> SparseMatrixCSR<T> {
    /// Returns the entries of row i ordered by column.
    ///
    /// Coordinate formats do not preserve intra-row order, so comparisons
    /// between matrices go through this.
    pub fn sorted_row(&self, i: usize) -> Vec<(usize, T)> {
        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];
        let mut row: Vec<_> = self.col_idx[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter().copied())
            .collect();
        row.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        });
        row
    }
}

impl<T: fmt::Debug + Copy + Num> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSR {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        let max_rows_to_print = 5.min(self.n_rows);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let start = self.row_ptr[i];
                let end = self.row_ptr[i + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(end - start);

                    for j in start..(start + max_elements) {
                        write!(f, "({}, {:?}) ", self.col_idx[j], self.values[j])?;
                    }

                    if end - start > max_elements {
                        write!(f, "... ({} more)", end - start - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}

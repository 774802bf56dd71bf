//! Assembly of unordered coordinate triplets into CSR arrays
//!
//! Coordinate formats list entries in any order, so rows cannot be streamed
//! straight into place. The [`CoordinateAssembler`] writes columns and values
//! into the caller's buffers as they arrive, counts entries per row, and then
//! moves every entry to its final slot with a counting sort:
//!
//! 1. count entries per row into `rowptr[row + 1]`
//! 2. prefix-sum `rowptr` so `rowptr[i]` is the start of row `i`
//! 3. place each entry at `rowptr[row]++`, recording `source[dest] = index`
//! 4. permute `rowind`/`rowval` through `source`
//! 5. shift `rowptr` down one slot, since step 3 advanced each start to the
//!    start of the next row
//!
//! This is O(nnz) time and space with no comparison sort and no second read
//! of the source file.

pub mod symmetric;

pub use symmetric::{push_mirrored, Orientation, SymmetricExpansion};

use crate::error::{FormatError, Result};
use crate::utils::prefix_sum_in_place;
use crate::Value;

/// Builds CSR arrays in caller-provided buffers from triplets in any order
pub struct CoordinateAssembler<'a> {
    nrows: usize,
    rowptr: &'a mut [usize],
    rowind: &'a mut [usize],
    rowval: Option<&'a mut [Value]>,
    rows: Vec<usize>,
}

impl<'a> CoordinateAssembler<'a> {
    /// Prepares the buffers for `nrows` rows.
    ///
    /// `rowind` (and `rowval` when given) bound how many triplets can be
    /// pushed; `expected` only sizes the internal row buffer.
    pub fn new(
        nrows: usize,
        expected: usize,
        rowptr: &'a mut [usize],
        rowind: &'a mut [usize],
        rowval: Option<&'a mut [Value]>,
    ) -> Result<Self> {
        crate::stream::check_buffer("rowptr", rowptr.len(), nrows + 1)?;

        rowptr[..=nrows].fill(0);

        Ok(Self {
            nrows,
            rowptr,
            rowind,
            rowval,
            rows: Vec::with_capacity(reserve_hint(expected)),
        })
    }

    /// Number of triplets pushed so far
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Buffers one 0-based triplet
    pub fn push(&mut self, row: usize, col: usize, value: Value) -> Result<()> {
        if row >= self.nrows {
            return Err(FormatError::BadParameter(format!(
                "Row {} out of bounds for {} rows",
                row, self.nrows
            )));
        }

        let nnz = self.rows.len();
        let capacity = match self.rowval.as_deref() {
            Some(rowval) => self.rowind.len().min(rowval.len()),
            None => self.rowind.len(),
        };
        if nnz >= capacity {
            return Err(FormatError::BadParameter(format!(
                "Output buffers hold {} entries, more are required",
                capacity
            )));
        }

        self.rows.push(row);
        self.rowind[nnz] = col;
        if let Some(rowval) = self.rowval.as_deref_mut() {
            rowval[nnz] = value;
        }
        self.rowptr[row + 1] += 1;
        Ok(())
    }

    /// Sorts the buffered triplets into CSR order and returns the entry count
    pub fn finish(self) -> usize {
        let Self {
            nrows,
            rowptr,
            rowind,
            rowval,
            rows,
        } = self;
        let nnz = rows.len();

        // counts to start offsets
        prefix_sum_in_place(&mut rowptr[..=nrows]);
        debug_assert_eq!(rowptr[0], 0);
        debug_assert_eq!(rowptr[nrows], nnz);

        // determine the source of each entry in final order
        let mut source = vec![0; nnz];
        for (index, &row) in rows.iter().enumerate() {
            let dest = rowptr[row];
            rowptr[row] += 1;
            source[dest] = index;
        }
        drop(rows);

        let columns = rowind[..nnz].to_vec();
        for (dest, &src) in source.iter().enumerate() {
            rowind[dest] = columns[src];
        }
        drop(columns);

        if let Some(rowval) = rowval {
            let values = rowval[..nnz].to_vec();
            for (dest, &src) in source.iter().enumerate() {
                rowval[dest] = values[src];
            }
        }

        // every start was advanced to the next row's start
        for i in (1..=nrows).rev() {
            rowptr[i] = rowptr[i - 1];
        }
        rowptr[0] = 0;
        debug_assert_eq!(rowptr[nrows], nnz);

        nnz
    }
}

/// Upper bound on the row buffer reserved before any triplet is read
fn reserve_hint(expected: usize) -> usize {
    const MAX_RESERVE: usize = 1 << 24;
    expected.min(MAX_RESERVE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_sort_example() {
        let mut rowptr = vec![0; 4];
        let mut rowind = vec![0; 4];
        let mut rowval = vec![0.0; 4];

        let mut asm =
            CoordinateAssembler::new(3, 4, &mut rowptr, &mut rowind, Some(&mut rowval)).unwrap();
        asm.push(2, 0, 5.0).unwrap();
        asm.push(0, 1, 1.0).unwrap();
        asm.push(0, 2, 2.0).unwrap();
        asm.push(1, 0, 3.0).unwrap();
        assert_eq!(asm.finish(), 4);

        assert_eq!(rowptr, vec![0, 2, 3, 4]);

        let mut row0: Vec<_> = (0..2).map(|k| (rowind[k], rowval[k])).collect();
        row0.sort_by_key(|e| e.0);
        assert_eq!(row0, vec![(1, 1.0), (2, 2.0)]);
        assert_eq!((rowind[2], rowval[2]), (0, 3.0));
        assert_eq!((rowind[3], rowval[3]), (0, 5.0));
    }

    #[test]
    fn test_in_order_triplets_keep_order() {
        let mut rowptr = vec![0; 3];
        let mut rowind = vec![0; 3];

        let mut asm = CoordinateAssembler::new(2, 3, &mut rowptr, &mut rowind, None).unwrap();
        asm.push(0, 2, 1.0).unwrap();
        asm.push(0, 0, 1.0).unwrap();
        asm.push(1, 1, 1.0).unwrap();
        asm.finish();

        assert_eq!(rowptr, vec![0, 2, 3]);
        assert_eq!(rowind, vec![2, 0, 1]);
    }

    #[test]
    fn test_empty_rows() {
        let mut rowptr = vec![7; 5];
        let mut rowind = vec![0; 1];

        let mut asm = CoordinateAssembler::new(4, 1, &mut rowptr, &mut rowind, None).unwrap();
        asm.push(3, 0, 1.0).unwrap();
        assert_eq!(asm.len(), 1);
        asm.finish();

        assert_eq!(rowptr, vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_buffer_overflow() {
        let mut rowptr = vec![0; 2];
        let mut rowind = vec![0; 1];

        let mut asm = CoordinateAssembler::new(1, 1, &mut rowptr, &mut rowind, None).unwrap();
        asm.push(0, 0, 1.0).unwrap();
        assert!(matches!(
            asm.push(0, 0, 1.0),
            Err(FormatError::BadParameter(_))
        ));
    }

    #[test]
    fn test_row_out_of_bounds() {
        let mut rowptr = vec![0; 2];
        let mut rowind = vec![0; 1];

        let mut asm = CoordinateAssembler::new(1, 1, &mut rowptr, &mut rowind, None).unwrap();
        assert!(asm.push(1, 0, 1.0).is_err());
        assert!(asm.is_empty());
    }
}

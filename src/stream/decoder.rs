//! Fills CSR arrays by driving a [`RowReader`]

use log::{debug, info};

use crate::config::DEFAULT_PROGRESS_STEPS;
use crate::error::{FormatError, Result};
use crate::stream::{check_buffer, MatrixInfo, MatrixReader, Progress, RowReader};
use crate::Value;

/// Adapts a [`RowReader`] into a [`MatrixReader`]
#[derive(Debug)]
pub struct CsrDecoder<R> {
    reader: R,
    info: Option<MatrixInfo>,
    consumed: bool,
    progress_steps: usize,
}

impl<R: RowReader> CsrDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            info: None,
            consumed: false,
            progress_steps: DEFAULT_PROGRESS_STEPS,
        }
    }

    /// Sets how many times the progress cursor advances over one read
    pub fn with_progress_steps(mut self, steps: usize) -> Self {
        self.progress_steps = steps;
        self
    }

    pub fn inner(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: RowReader> MatrixReader for CsrDecoder<R> {
    fn info(&mut self) -> Result<MatrixInfo> {
        if let Some(info) = self.info {
            return Ok(info);
        }
        let info = self.reader.read_header()?;
        debug!(
            "{}: {} x {} with {} non-zeros",
            self.reader.path().display(),
            info.nrows,
            info.ncols,
            info.nnz
        );
        self.info = Some(info);
        Ok(info)
    }

    fn read(
        &mut self,
        rowptr: &mut [usize],
        rowind: &mut [usize],
        mut rowval: Option<&mut [Value]>,
        progress: Option<&mut f64>,
    ) -> Result<()> {
        let info = self
            .info
            .ok_or_else(|| FormatError::UnsetInfo("Cannot call read() before info()".to_string()))?;
        if self.consumed {
            return Err(FormatError::bad_state(
                self.reader.path(),
                "Matrix has already been read",
            ));
        }
        self.consumed = true;

        check_buffer("rowptr", rowptr.len(), info.nrows + 1)?;
        check_buffer("rowind", rowind.len(), info.nnz)?;
        if let Some(rowval) = rowval.as_deref() {
            check_buffer("rowval", rowval.len(), info.nnz)?;
        }

        let mut progress = Progress::new(progress, info.nrows, self.progress_steps);

        rowptr[0] = 0;
        for i in 0..info.nrows {
            let start = rowptr[i];
            let columns = &mut rowind[start..info.nnz];
            let values = rowval.as_deref_mut().map(|v| &mut v[start..info.nnz]);

            match self.reader.next_row(columns, values)? {
                Some(degree) => rowptr[i + 1] = start + degree,
                None => {
                    return Err(FormatError::eof(self.reader.path(), i, info.nrows, "rows"));
                }
            }

            progress.tick(i);
        }

        if rowptr[info.nrows] != info.nnz {
            // we read in the wrong number of non-zeroes
            return Err(FormatError::eof(
                self.reader.path(),
                rowptr[info.nrows],
                info.nnz,
                "non-zeros",
            ));
        }

        info!(
            "read {} rows and {} non-zeros from {}",
            info.nrows,
            info.nnz,
            self.reader.path().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    /// Serves rows from memory so the decoder can be tested without files
    struct MemoryRows {
        path: PathBuf,
        info: MatrixInfo,
        rows: Vec<Vec<(usize, Value)>>,
        next: usize,
    }

    impl MemoryRows {
        fn new(ncols: usize, nnz: usize, rows: Vec<Vec<(usize, Value)>>) -> Self {
            Self {
                path: PathBuf::from("memory"),
                info: MatrixInfo::new(rows.len(), ncols, nnz),
                rows,
                next: 0,
            }
        }
    }

    impl RowReader for MemoryRows {
        fn path(&self) -> &Path {
            &self.path
        }

        fn read_header(&mut self) -> Result<MatrixInfo> {
            Ok(self.info)
        }

        fn next_row(
            &mut self,
            columns: &mut [usize],
            mut values: Option<&mut [Value]>,
        ) -> Result<Option<usize>> {
            let Some(row) = self.rows.get(self.next) else {
                return Ok(None);
            };
            self.next += 1;
            for (k, &(col, val)) in row.iter().enumerate() {
                columns[k] = col;
                if let Some(values) = values.as_deref_mut() {
                    values[k] = val;
                }
            }
            Ok(Some(row.len()))
        }
    }

    #[test]
    fn test_decode_rows() {
        let rows = vec![
            vec![(1, 1.0), (2, 2.0)],
            vec![],
            vec![(0, 3.0)],
        ];
        let mut decoder = CsrDecoder::new(MemoryRows::new(3, 3, rows));

        let matrix = decoder.read_matrix().unwrap();
        assert_eq!(matrix.row_ptr, vec![0, 2, 2, 3]);
        assert_eq!(matrix.col_idx, vec![1, 2, 0]);
        assert_eq!(matrix.values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_read_before_info() {
        let mut decoder = CsrDecoder::new(MemoryRows::new(1, 0, vec![vec![]]));
        let mut rowptr = vec![0; 2];
        let result = decoder.read(&mut rowptr, &mut [], None, None);
        assert!(matches!(result, Err(FormatError::UnsetInfo(_))));
    }

    #[test]
    fn test_nnz_mismatch_is_eof() {
        let mut decoder = CsrDecoder::new(MemoryRows::new(2, 3, vec![vec![(0, 1.0)]]));
        decoder.info().unwrap();
        let mut rowptr = vec![0; 2];
        let mut rowind = vec![0; 3];
        let err = decoder.read(&mut rowptr, &mut rowind, None, None).unwrap_err();
        match err {
            FormatError::Eof { found, expected, .. } => {
                assert_eq!(found, 1);
                assert_eq!(expected, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_progress_cursor_advances() {
        let rows = (0..10).map(|i| vec![(i, 1.0)]).collect();
        let mut decoder = CsrDecoder::new(MemoryRows::new(10, 10, rows));
        decoder.info().unwrap();

        let mut rowptr = vec![0; 11];
        let mut rowind = vec![0; 10];
        let mut cursor = 0.0;
        decoder
            .read(&mut rowptr, &mut rowind, None, Some(&mut cursor))
            .unwrap();
        assert!((cursor - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_second_read_fails() {
        let mut decoder = CsrDecoder::new(MemoryRows::new(1, 0, vec![vec![]]));
        decoder.info().unwrap();
        let mut rowptr = vec![0; 2];
        decoder.read(&mut rowptr, &mut [], None, None).unwrap();
        assert!(matches!(
            decoder.read(&mut rowptr, &mut [], None, None),
            Err(FormatError::BadFileState { .. })
        ));
    }
}

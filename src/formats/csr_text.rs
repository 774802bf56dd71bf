//! Headerless CSR text format (`.csr`)
//!
//! Each non-comment line is one row, written as `col val col val ...`.
//! A trailing column without a value has value 1 and an empty line is an
//! empty row. Lines starting with `#`, `%`, `"` or `/` are comments.
//!
//! There is no header, so the shape is found by scanning the whole file
//! once before rows are streamed. The same scan detects the index base: if
//! no column 0 appears the file is taken to be 1-based. Files are always
//! written 1-based.

use std::path::Path;

use log::debug;

use crate::error::{FormatError, Result};
use crate::line_file::LineFile;
use crate::stream::{CsrDecoder, CsrEncoder, MatrixInfo, RowReader, RowWriter};
use crate::utils::{split_tokens, starts_with_any};
use crate::Value;

const COMMENT_CHARS: &[u8] = b"#%\"/";

/// A matrix stored one row per line
#[derive(Debug)]
pub struct CsrTextFile {
    file: LineFile,
    line: String,
    base: usize,
    info: Option<MatrixInfo>,
}

impl CsrTextFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: LineFile::new(path),
            line: String::new(),
            base: 0,
            info: None,
        }
    }

    /// Opens `path` as a whole-matrix reader
    pub fn reader(path: impl AsRef<Path>) -> CsrDecoder<Self> {
        CsrDecoder::new(Self::new(path))
    }

    /// Opens `path` as a whole-matrix writer
    pub fn writer(path: impl AsRef<Path>) -> CsrEncoder<Self> {
        CsrEncoder::new(Self::new(path))
    }

    /// Whether the scanned file uses 1-based columns; `None` before the scan
    pub fn is_one_based(&self) -> Option<bool> {
        self.info.map(|_| self.base == 1)
    }

    fn next_noncomment_line(&mut self) -> Result<bool> {
        loop {
            if !self.file.next_line(&mut self.line)? {
                return Ok(false);
            }
            if !starts_with_any(&self.line, COMMENT_CHARS) {
                return Ok(true);
            }
        }
    }
}

/// Walks the `col val` pairs of one line
fn parse_pairs<'l>(
    file: &'l LineFile,
    line: &'l str,
) -> impl Iterator<Item = Result<(usize, Value)>> + 'l {
    let mut tokens = split_tokens(line);
    std::iter::from_fn(move || {
        let col_token = tokens.next()?;
        let col = match col_token.parse::<usize>() {
            Ok(col) => col,
            Err(_) => {
                return Some(Err(file.bad_line(format!(
                    "Failed to read column '{}'",
                    col_token
                ))))
            }
        };
        let val = match tokens.next() {
            Some(val_token) => match val_token.parse::<Value>() {
                Ok(val) => val,
                Err(_) => {
                    return Some(Err(file.bad_line(format!(
                        "Failed to read value '{}' for column {}",
                        val_token, col
                    ))))
                }
            },
            None => 1.0,
        };
        Some(Ok((col, val)))
    })
}

impl RowReader for CsrTextFile {
    fn path(&self) -> &Path {
        self.file.path()
    }

    fn read_header(&mut self) -> Result<MatrixInfo> {
        if let Some(info) = self.info {
            return Ok(info);
        }
        if !self.file.is_open_read() {
            self.file.open_read()?;
        }

        let mut nrows = 0;
        let mut nnz = 0;
        let mut min_col = usize::MAX;
        let mut max_col = 0;

        while self.next_noncomment_line()? {
            for entry in parse_pairs(&self.file, &self.line) {
                let (col, _) = entry?;
                min_col = min_col.min(col);
                max_col = max_col.max(col);
                nnz += 1;
            }
            nrows += 1;
        }

        let ncols = if nnz == 0 {
            0
        } else if min_col > 0 {
            self.base = 1;
            max_col
        } else {
            self.base = 0;
            max_col + 1
        };
        debug!(
            "{}: scanned {} rows, {}-based columns",
            self.file.path().display(),
            nrows,
            self.base
        );

        self.file.reset_stream()?;

        let info = MatrixInfo::new(nrows, ncols, nnz);
        self.info = Some(info);
        Ok(info)
    }

    fn next_row(
        &mut self,
        columns: &mut [usize],
        mut values: Option<&mut [Value]>,
    ) -> Result<Option<usize>> {
        if self.info.is_none() {
            return Err(FormatError::UnsetInfo(
                "Cannot read rows before the header".to_string(),
            ));
        }
        if !self.next_noncomment_line()? {
            return Ok(None);
        }

        let mut degree = 0;
        for entry in parse_pairs(&self.file, &self.line) {
            let (col, val) = entry?;
            if degree >= columns.len() {
                return Err(self
                    .file
                    .bad_line("Row holds more entries than were counted"));
            }
            if col < self.base {
                return Err(self.file.bad_line(format!(
                    "Column {} in a {}-based file",
                    col, self.base
                )));
            }
            columns[degree] = col - self.base;
            if let Some(values) = values.as_deref_mut() {
                values[degree] = val;
            }
            degree += 1;
        }

        Ok(Some(degree))
    }
}

impl RowWriter for CsrTextFile {
    fn path(&self) -> &Path {
        self.file.path()
    }

    fn write_header(&mut self, info: MatrixInfo) -> Result<()> {
        // no header, only the file itself
        self.file.open_write()?;
        self.info = Some(info);
        self.base = 1;
        Ok(())
    }

    fn set_next_row(&mut self, columns: &[usize], values: Option<&[Value]>) -> Result<()> {
        let mut line = String::new();
        for (k, &col) in columns.iter().enumerate() {
            if k > 0 {
                line.push(' ');
            }
            let val = values.map_or(1.0, |v| v[k]);
            line.push_str(&format!("{} {}", col + 1, val));
        }
        self.file.set_next_line(&line)
    }

    fn finish(&mut self) -> Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{MatrixReader, MatrixWriter};
    use tempfile::tempdir;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn expected_rows() -> (Vec<usize>, Vec<usize>, Vec<Value>) {
        (
            vec![0, 2, 4, 7, 10, 12, 14],
            vec![1, 2, 0, 2, 0, 1, 3, 2, 4, 5, 3, 5, 3, 4],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        )
    }

    #[test]
    fn test_read_zero_based() {
        let dir = tempdir().unwrap();
        let path = write_file(
            &dir,
            "zero.csr",
            "1 1.0 2 2.0\n\
             0 3.0 2 4.0\n\
             0 5.0 1 6.0 3 7.0\n\
             2 8.0 4 9.0 5 1.0\n\
             3 2.0 5 3.0\n\
             3 4.0 4 5.0\n",
        );

        let mut reader = CsrTextFile::reader(&path);
        assert_eq!(reader.info().unwrap(), MatrixInfo::new(6, 6, 14));
        assert_eq!(reader.inner().is_one_based(), Some(false));

        let matrix = reader.read_matrix().unwrap();
        let (rowptr, rowind, rowval) = expected_rows();
        assert_eq!(matrix.row_ptr, rowptr);
        assert_eq!(matrix.col_idx, rowind);
        assert_eq!(matrix.values, rowval);
    }

    #[test]
    fn test_read_one_based() {
        let dir = tempdir().unwrap();
        let path = write_file(
            &dir,
            "one.csr",
            "% a comment\n\
             2 1.0 3 2.0\n\
             1 3.0 3 4.0\n\
             1 5.0 2 6.0 4 7.0\n\
             3 8.0 5 9.0 6 1.0\n\
             4 2.0 6 3.0\n\
             4 4.0 5 5.0\n",
        );

        let mut reader = CsrTextFile::reader(&path);
        assert_eq!(reader.info().unwrap(), MatrixInfo::new(6, 6, 14));
        assert_eq!(reader.inner().is_one_based(), Some(true));

        let matrix = reader.read_matrix().unwrap();
        let (rowptr, rowind, rowval) = expected_rows();
        assert_eq!(matrix.row_ptr, rowptr);
        assert_eq!(matrix.col_idx, rowind);
        assert_eq!(matrix.values, rowval);
    }

    #[test]
    fn test_missing_value_defaults_to_one() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "pattern.csr", "1 2.5 3\n\n2\n");

        let mut reader = CsrTextFile::reader(&path);
        assert_eq!(reader.info().unwrap(), MatrixInfo::new(3, 3, 3));
        let matrix = reader.read_matrix().unwrap();
        assert_eq!(matrix.row_ptr, vec![0, 2, 2, 3]);
        assert_eq!(matrix.col_idx, vec![0, 2, 1]);
        assert_eq!(matrix.values, vec![2.5, 1.0, 1.0]);
    }

    #[test]
    fn test_bad_column_names_line() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "bad.csr", "1 1.0\n# skip\n2 x\n");

        let mut reader = CsrTextFile::reader(&path);
        let err = reader.info().unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().contains("bad.csr"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csr");
        let (rowptr, rowind, rowval) = expected_rows();

        let mut writer = CsrTextFile::writer(&path);
        writer.set_info(MatrixInfo::new(6, 6, 14)).unwrap();
        writer.write(&rowptr, &rowind, Some(&rowval)).unwrap();
        drop(writer);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some("2 1 3 2"));

        let matrix = CsrTextFile::reader(&path).read_matrix().unwrap();
        assert_eq!(matrix.row_ptr, rowptr);
        assert_eq!(matrix.col_idx, rowind);
        assert_eq!(matrix.values, rowval);
    }

    #[test]
    fn test_next_row_before_header() {
        let mut file = CsrTextFile::new("unused.csr");
        let mut cols = [0; 1];
        assert!(matches!(
            file.next_row(&mut cols, None),
            Err(FormatError::UnsetInfo(_))
        ));
    }
}

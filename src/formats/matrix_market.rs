//! MatrixMarket coordinate format (`.mtx`, `.mm`)
//!
//! ```text
//! %%MatrixMarket matrix coordinate real symmetric
//! % comments
//! 4 4 3
//! 1 1 1.0
//! 2 1 2.0
//! 4 2 5.0
//! ```
//!
//! Only sparse real, integer and pattern matrices are read; vectors, dense
//! arrays and complex values are rejected. Triplets are 1-based and may
//! appear in any order. Symmetric files store one triangle, which is
//! expanded on read, so `nnz` reported before reading is an upper bound.
//! Files are always written as `real general`.

use std::path::Path;

use log::{debug, info};

use crate::assembly::{push_mirrored, CoordinateAssembler, SymmetricExpansion};
use crate::config::DEFAULT_PROGRESS_STEPS;
use crate::error::{FormatError, Result};
use crate::line_file::LineFile;
use crate::stream::{
    check_buffer, check_csr_input, MatrixInfo, MatrixReader, MatrixWriter, Progress,
};
use crate::utils::split_tokens;
use crate::Value;

const HEADER_PREFIX: &str = "%%MatrixMarket ";
const COMMENT_CHAR: char = '%';

/// Value field of a coordinate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Real,
    Integer,
    /// No values; every entry is 1
    Pattern,
}

/// Storage scheme of a coordinate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    General,
    /// Only one triangle is stored
    Symmetric,
}

/// A sparse matrix stored as coordinate triplets
#[derive(Debug)]
pub struct MatrixMarketFile {
    file: LineFile,
    line: String,
    info: Option<MatrixInfo>,
    field: Field,
    symmetry: Symmetry,
    /// Triplet lines declared by the size line
    nlines: usize,
    consumed: bool,
    progress_steps: usize,
    write_banner: bool,
}

impl MatrixMarketFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: LineFile::new(path),
            line: String::new(),
            info: None,
            field: Field::Real,
            symmetry: Symmetry::General,
            nlines: 0,
            consumed: false,
            progress_steps: DEFAULT_PROGRESS_STEPS,
            write_banner: true,
        }
    }

    /// Sets how many times the progress cursor advances over one read
    pub fn with_progress_steps(mut self, steps: usize) -> Self {
        self.progress_steps = steps;
        self
    }

    /// Chooses whether the writer emits a comment banner after the header
    pub fn with_banner(mut self, write_banner: bool) -> Self {
        self.write_banner = write_banner;
        self
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Reads the next line that is neither a comment nor blank
    fn next_data_line(&mut self) -> Result<bool> {
        loop {
            if !self.file.next_line(&mut self.line)? {
                return Ok(false);
            }
            let trimmed = self.line.trim_start();
            if !trimmed.is_empty() && !trimmed.starts_with(COMMENT_CHAR) {
                return Ok(true);
            }
        }
    }

    fn parse_banner(&mut self) -> Result<()> {
        if !self.file.next_line(&mut self.line)? {
            return Err(self.file.bad_line("Not a valid MatrixMarket file: it is empty"));
        }
        if !self.line.starts_with(HEADER_PREFIX) {
            return Err(self.file.bad_line(format!(
                "Not a valid MatrixMarket file: first line is '{}'",
                self.line
            )));
        }

        let tokens: Vec<String> = split_tokens(&self.line[HEADER_PREFIX.len()..])
            .map(str::to_ascii_lowercase)
            .collect();
        let token = |k: usize| tokens.get(k).map(String::as_str);

        match token(0) {
            Some("matrix") => {}
            Some("vector") => return Err(self.file.bad_line("Vectors are not supported")),
            other => {
                return Err(self.file.bad_line(format!(
                    "Unknown object '{}'",
                    other.unwrap_or_default()
                )))
            }
        }

        match token(1) {
            Some("coordinate") => {}
            Some("array") => return Err(self.file.bad_line("Array matrices are not supported")),
            _ => {
                return Err(self
                    .file
                    .bad_line("Missing 'coordinate' or 'array' specifier"))
            }
        }

        self.field = match token(2) {
            Some("real") => Field::Real,
            Some("integer") => Field::Integer,
            Some("pattern") => Field::Pattern,
            Some("complex") => {
                return Err(self.file.bad_line("Complex numbers are not supported"))
            }
            _ => {
                return Err(self
                    .file
                    .bad_line("Missing 'real', 'integer', or 'pattern' specifier"))
            }
        };

        self.symmetry = match token(3) {
            Some("general") => Symmetry::General,
            Some("symmetric") => Symmetry::Symmetric,
            Some(other) => {
                return Err(self
                    .file
                    .bad_line(format!("Unsupported storage scheme '{}'", other)))
            }
            None => {
                return Err(self
                    .file
                    .bad_line("Missing 'general' or 'symmetric' specifier"))
            }
        };
        Ok(())
    }

    fn parse_size_line(&mut self) -> Result<MatrixInfo> {
        if !self.next_data_line()? {
            return Err(self.file.bad_line("Missing size line"));
        }
        let tokens: Vec<&str> = split_tokens(&self.line).collect();
        if tokens.len() != 3 {
            return Err(self.file.bad_line(format!(
                "Size line must hold 'rows cols nnz', found '{}'",
                self.line
            )));
        }
        let mut counts = [0; 3];
        for (count, (token, what)) in counts
            .iter_mut()
            .zip(tokens.iter().zip(["rows", "columns", "non-zeros"]))
        {
            *count = token.parse::<usize>().map_err(|_| {
                self.file
                    .bad_line(format!("Failed to read number of {} '{}'", what, token))
            })?;
        }
        let [nrows, ncols, nlines] = counts;
        Ok(MatrixInfo::new(nrows, ncols, nlines))
    }

    /// Parses one triplet, returning 0-based coordinates
    fn parse_triplet(&self, info: &MatrixInfo) -> Result<(usize, usize, Value)> {
        let mut tokens = split_tokens(&self.line);
        let mut index = |what: &str, bound: usize| -> Result<usize> {
            let token = tokens
                .next()
                .ok_or_else(|| self.file.bad_line(format!("Missing triplet {}", what)))?;
            let index = token.parse::<usize>().map_err(|_| {
                self.file
                    .bad_line(format!("Unable to parse triplet {} '{}'", what, token))
            })?;
            if index < 1 {
                return Err(self.file.bad_line(format!(
                    "Invalid {} {} must be 1-based indexing",
                    what, index
                )));
            }
            if index > bound {
                return Err(self.file.bad_line(format!(
                    "Invalid {} {} exceeds total {}s {}",
                    what, index, what, bound
                )));
            }
            Ok(index - 1)
        };
        let row = index("row", info.nrows)?;
        let col = index("column", info.ncols)?;

        let value = match self.field {
            Field::Pattern => 1.0,
            Field::Real | Field::Integer => {
                let token = tokens
                    .next()
                    .ok_or_else(|| self.file.bad_line("Missing triplet value"))?;
                token.parse::<Value>().map_err(|_| {
                    self.file
                        .bad_line(format!("Unable to parse triplet value '{}'", token))
                })?
            }
        };
        Ok((row, col, value))
    }
}

impl MatrixReader for MatrixMarketFile {
    fn info(&mut self) -> Result<MatrixInfo> {
        if let Some(info) = self.info {
            return Ok(info);
        }
        self.file.open_read()?;
        self.parse_banner()?;
        let declared = self.parse_size_line()?;

        self.nlines = declared.nnz;
        let nnz = match self.symmetry {
            Symmetry::General => declared.nnz,
            Symmetry::Symmetric => {
                if declared.nrows != declared.ncols {
                    return Err(self.file.bad_line(format!(
                        "Symmetric matrix must be square, found {} x {}",
                        declared.nrows, declared.ncols
                    )));
                }
                declared.nnz.checked_mul(2).ok_or_else(|| {
                    self.file
                        .bad_line(format!("Number of entries {} is too large", declared.nnz))
                })?
            }
        };
        let info = MatrixInfo { nnz, ..declared };
        debug!(
            "{}: {} x {} with {} triplets, {:?} {:?}",
            self.file.path().display(),
            info.nrows,
            info.ncols,
            self.nlines,
            self.field,
            self.symmetry
        );
        self.info = Some(info);
        Ok(info)
    }

    fn read(
        &mut self,
        rowptr: &mut [usize],
        rowind: &mut [usize],
        rowval: Option<&mut [Value]>,
        progress: Option<&mut f64>,
    ) -> Result<()> {
        let info = self
            .info
            .ok_or_else(|| FormatError::UnsetInfo("Cannot call read() before info()".to_string()))?;
        if self.consumed {
            return Err(FormatError::bad_state(
                self.file.path(),
                "Matrix has already been read",
            ));
        }
        self.consumed = true;

        check_buffer("rowptr", rowptr.len(), info.nrows + 1)?;
        let mut progress = Progress::new(progress, self.nlines, self.progress_steps);
        let mut assembler = CoordinateAssembler::new(info.nrows, info.nnz, rowptr, rowind, rowval)?;
        let mut symmetric = SymmetricExpansion::new();

        for k in 0..self.nlines {
            if !self.next_data_line()? {
                return Err(FormatError::eof(self.file.path(), k, self.nlines, "non-zeros"));
            }
            let (row, col, value) = self.parse_triplet(&info)?;

            match self.symmetry {
                Symmetry::General => assembler.push(row, col, value)?,
                Symmetry::Symmetric => {
                    symmetric
                        .observe(row, col, 1)
                        .map_err(|msg| self.file.bad_line(msg))?;
                    push_mirrored(&mut assembler, row, col, value)?;
                }
            }

            progress.tick(k);
        }

        let nnz = assembler.finish();
        if self.symmetry == Symmetry::Symmetric {
            debug!(
                "{}: expanded {:?} triangle to {} non-zeros",
                self.file.path().display(),
                symmetric.orientation(),
                nnz
            );
        }
        self.info = Some(MatrixInfo { nnz, ..info });

        info!(
            "read {} rows and {} non-zeros from {}",
            info.nrows,
            nnz,
            self.file.path().display()
        );
        Ok(())
    }
}

impl MatrixWriter for MatrixMarketFile {
    fn set_info(&mut self, info: MatrixInfo) -> Result<()> {
        if self.info.is_some() {
            return Err(FormatError::bad_state(self.file.path(), "Info already set"));
        }
        self.file.open_write()?;

        self.file
            .set_next_line("%%MatrixMarket matrix coordinate real general")?;
        if self.write_banner {
            self.file
                .set_next_line("%====================================================")?;
            self.file.set_next_line(&format!(
                "%= Generated by sparsio {}. =",
                crate::VERSION
            ))?;
            self.file
                .set_next_line("%====================================================")?;
        }
        self.file
            .set_next_line(&format!("{} {} {}", info.nrows, info.ncols, info.nnz))?;

        self.info = Some(info);
        Ok(())
    }

    fn write(
        &mut self,
        rowptr: &[usize],
        rowind: &[usize],
        rowval: Option<&[Value]>,
    ) -> Result<()> {
        let info = self.info.ok_or_else(|| {
            FormatError::bad_state(self.file.path(), "Cannot call write() before set_info()")
        })?;
        check_csr_input(&info, rowptr, rowind, rowval)?;

        for row in 0..info.nrows {
            for k in rowptr[row]..rowptr[row + 1] {
                let value = rowval.map_or(1.0, |v| v[k]);
                self.file
                    .set_next_line(&format!("{} {} {}", row + 1, rowind[k] + 1, value))?;
            }
        }
        self.file.flush()?;

        info!(
            "wrote {} rows and {} non-zeros to {}",
            info.nrows,
            info.nnz,
            self.file.path().display()
        );
        Ok(())
    }
}

//! Drains CSR arrays into a [`RowWriter`]

use log::info;

use crate::error::{FormatError, Result};
use crate::stream::{check_csr_input, MatrixInfo, MatrixWriter, RowWriter};
use crate::Value;

/// Adapts a [`RowWriter`] into a [`MatrixWriter`]
#[derive(Debug)]
pub struct CsrEncoder<W> {
    writer: W,
    info: Option<MatrixInfo>,
}

impl<W: RowWriter> CsrEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, info: None }
    }

    pub fn inner(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: RowWriter> MatrixWriter for CsrEncoder<W> {
    fn set_info(&mut self, info: MatrixInfo) -> Result<()> {
        if self.info.is_some() {
            return Err(FormatError::bad_state(self.writer.path(), "Info already set"));
        }
        self.writer.write_header(info)?;
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
            FormatError::bad_state(self.writer.path(), "Cannot call write() before set_info()")
        })?;
        check_csr_input(&info, rowptr, rowind, rowval)?;

        for i in 0..info.nrows {
            let (start, end) = (rowptr[i], rowptr[i + 1]);
            self.writer
                .set_next_row(&rowind[start..end], rowval.map(|v| &v[start..end]))?;
        }
        self.writer.finish()?;

        info!(
            "wrote {} rows and {} non-zeros to {}",
            info.nrows,
            info.nnz,
            self.writer.path().display()
        );
        Ok(())
    }
}

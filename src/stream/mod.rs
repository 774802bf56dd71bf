//! Row-streaming contract and whole-structure reader/writer traits
//!
//! Formats whose rows arrive in file order implement [`RowReader`] and
//! [`RowWriter`]; the generic [`CsrDecoder`] and [`CsrEncoder`] drive those
//! contracts to fill or drain full CSR arrays. Everything that hands out a
//! whole matrix or graph implements [`MatrixReader`]/[`MatrixWriter`] or
//! [`GraphReader`]/[`GraphWriter`]. Buffers are always caller-allocated;
//! the `read_matrix`/`read_graph` helpers allocate them for you.

pub mod decoder;
pub mod encoder;
pub mod progress;

use std::path::Path;

use crate::error::{FormatError, Result};
use crate::matrix::{SparseGraph, SparseMatrixCSR};
use crate::Value;

pub use decoder::CsrDecoder;
pub use encoder::CsrEncoder;
pub use progress::Progress;

/// Shape of a matrix as declared by a header or by a writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixInfo {
    pub nrows: usize,
    pub ncols: usize,
    pub nnz: usize,
}

impl MatrixInfo {
    pub fn new(nrows: usize, ncols: usize, nnz: usize) -> Self {
        Self { nrows, ncols, nnz }
    }
}

/// Shape of a graph as declared by a header or by a writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphInfo {
    pub nvtxs: usize,
    /// Number of directed edges (undirected edges count twice)
    pub nedges: usize,
    /// Number of weights per vertex
    pub nvwgt: usize,
    pub edge_weights: bool,
}

impl GraphInfo {
    pub fn new(nvtxs: usize, nedges: usize, nvwgt: usize, edge_weights: bool) -> Self {
        Self {
            nvtxs,
            nedges,
            nvwgt,
            edge_weights,
        }
    }
}

/// Reads a matrix one row at a time, in row order
pub trait RowReader {
    /// The file being read, for diagnostics
    fn path(&self) -> &Path;

    /// Parses the header (or scans the file) and returns the matrix shape
    fn read_header(&mut self) -> Result<MatrixInfo>;

    /// Reads the next row into `columns` (and `values` when given).
    ///
    /// Returns the row's degree, or `None` at the legitimate end of input.
    /// Values absent from the file are reported as 1. A row that does not
    /// fit in the buffers is a `BadFile` error.
    fn next_row(
        &mut self,
        columns: &mut [usize],
        values: Option<&mut [Value]>,
    ) -> Result<Option<usize>>;
}

/// Writes a matrix one row at a time, in row order
pub trait RowWriter {
    /// The file being written, for diagnostics
    fn path(&self) -> &Path;

    /// Opens the output and writes whatever header the format has
    fn write_header(&mut self, info: MatrixInfo) -> Result<()>;

    /// Appends one row. Missing values are written as 1 where required.
    fn set_next_row(&mut self, columns: &[usize], values: Option<&[Value]>) -> Result<()>;

    /// Flushes buffered output
    fn finish(&mut self) -> Result<()>;
}

/// Reads a whole matrix into caller-allocated CSR buffers
pub trait MatrixReader {
    /// Returns the shape, reading the header on first call
    fn info(&mut self) -> Result<MatrixInfo>;

    /// Fills `rowptr` (nrows + 1), `rowind` (nnz) and optionally `rowval` (nnz).
    ///
    /// `info` must have been called first.
    fn read(
        &mut self,
        rowptr: &mut [usize],
        rowind: &mut [usize],
        rowval: Option<&mut [Value]>,
        progress: Option<&mut f64>,
    ) -> Result<()>;

    /// Reads the whole matrix into a freshly allocated container
    fn read_matrix(&mut self) -> Result<SparseMatrixCSR<Value>> {
        let info = self.info()?;
        let mut rowptr = vec![0; info.nrows + 1];
        let mut rowind = vec![0; info.nnz];
        let mut rowval = vec![0.0; info.nnz];

        self.read(&mut rowptr, &mut rowind, Some(&mut rowval), None)?;

        // symmetric coordinate files only know their true size after reading
        let nnz = rowptr[info.nrows];
        rowind.truncate(nnz);
        rowval.truncate(nnz);

        SparseMatrixCSR::try_new(info.nrows, info.ncols, rowptr, rowind, rowval)
    }
}

/// Writes a whole matrix from CSR buffers
pub trait MatrixWriter {
    /// Declares the shape and writes the header. May only be called once.
    fn set_info(&mut self, info: MatrixInfo) -> Result<()>;

    /// Writes every row. `set_info` must have been called first.
    fn write(
        &mut self,
        rowptr: &[usize],
        rowind: &[usize],
        rowval: Option<&[Value]>,
    ) -> Result<()>;

    /// Declares the shape of `matrix` and writes it
    fn write_matrix(&mut self, matrix: &SparseMatrixCSR<Value>) -> Result<()> {
        self.set_info(MatrixInfo::new(matrix.n_rows, matrix.n_cols, matrix.nnz()))?;
        self.write(&matrix.row_ptr, &matrix.col_idx, Some(&matrix.values))
    }
}

/// Reads a whole graph into caller-allocated adjacency buffers
pub trait GraphReader {
    /// Returns the shape, reading the header on first call
    fn info(&mut self) -> Result<GraphInfo>;

    /// Fills `xadj` (nvtxs + 1), `adjncy` (nedges), and optionally `vwgt`
    /// (nvtxs * max(nvwgt, 1)) and `adjwgt` (nedges).
    ///
    /// Vertex weights requested from a graph without any are filled with 1.
    fn read(
        &mut self,
        xadj: &mut [usize],
        adjncy: &mut [usize],
        vwgt: Option<&mut [Value]>,
        adjwgt: Option<&mut [Value]>,
        progress: Option<&mut f64>,
    ) -> Result<()>;

    /// Reads the whole graph into a freshly allocated container
    fn read_graph(&mut self) -> Result<SparseGraph> {
        let info = self.info()?;
        let mut xadj = vec![0; info.nvtxs + 1];
        let mut adjncy = vec![0; info.nedges];
        let mut vwgt = (info.nvwgt > 0).then(|| vec![0.0; info.nvtxs * info.nvwgt]);
        let mut adjwgt = info.edge_weights.then(|| vec![0.0; info.nedges]);

        self.read(
            &mut xadj,
            &mut adjncy,
            vwgt.as_deref_mut(),
            adjwgt.as_deref_mut(),
            None,
        )?;

        // undirected edge lists with self loops shrink once read
        let nedges = xadj[info.nvtxs];
        adjncy.truncate(nedges);
        if let Some(adjwgt) = adjwgt.as_mut() {
            adjwgt.truncate(nedges);
        }

        SparseGraph::new(xadj, adjncy, info.nvwgt, vwgt, adjwgt)
    }
}

/// Writes a whole graph from adjacency buffers
pub trait GraphWriter {
    /// Declares the shape and writes the header. May only be called once.
    fn set_info(&mut self, info: GraphInfo) -> Result<()>;

    /// Writes every vertex. `set_info` must have been called first.
    fn write(
        &mut self,
        xadj: &[usize],
        adjncy: &[usize],
        vwgt: Option<&[Value]>,
        adjwgt: Option<&[Value]>,
    ) -> Result<()>;

    /// Declares the shape of `graph` and writes it
    fn write_graph(&mut self, graph: &SparseGraph) -> Result<()> {
        self.set_info(GraphInfo::new(
            graph.n_vtxs,
            graph.n_edges(),
            graph.n_vwgt,
            graph.adjwgt.is_some(),
        ))?;
        self.write(
            &graph.xadj,
            &graph.adjncy,
            graph.vwgt.as_deref(),
            graph.adjwgt.as_deref(),
        )
    }
}

/// Fails with `BadParameter` if a caller buffer is shorter than required
pub(crate) fn check_buffer(name: &str, len: usize, required: usize) -> Result<()> {
    if len < required {
        return Err(FormatError::BadParameter(format!(
            "'{}' holds {} elements but {} are required",
            name, len, required
        )));
    }
    Ok(())
}

/// Validates CSR buffers handed to a writer against the declared shape
pub(crate) fn check_csr_input(
    info: &MatrixInfo,
    rowptr: &[usize],
    rowind: &[usize],
    rowval: Option<&[Value]>,
) -> Result<()> {
    check_buffer("rowptr", rowptr.len(), info.nrows + 1)?;
    let nnz = rowptr[info.nrows];
    if nnz != info.nnz {
        return Err(FormatError::BadParameter(format!(
            "rowptr ends at {} but {} non-zeros were declared",
            nnz, info.nnz
        )));
    }
    if rowptr.windows(2).take(info.nrows).any(|w| w[0] > w[1]) {
        return Err(FormatError::BadParameter(
            "rowptr must be non-decreasing".to_string(),
        ));
    }
    check_buffer("rowind", rowind.len(), nnz)?;
    if let Some(rowval) = rowval {
        check_buffer("rowval", rowval.len(), nnz)?;
    }
    Ok(())
}

//! # sparsio: sparse matrix and graph file I/O
//!
//! Readers and writers for the text formats sparse matrices and graphs are
//! commonly exchanged in, all producing or consuming the same compressed
//! sparse row (CSR) arrays.
//!
//! ## Overview
//!
//! | Format | Extensions | Native view |
//! |---|---|---|
//! | CSR text | `.csr` | matrix |
//! | Metis/Chaco | `.graph`, `.metis`, `.chaco` | graph |
//! | SNAP edge list | `.snap` | graph |
//! | MatrixMarket coordinate | `.mtx`, `.mm` | matrix |
//!
//! ## Components
//!
//! 1. **Row streaming**: formats that store rows in order implement
//!    [`RowReader`]/[`RowWriter`]; [`CsrDecoder`] and [`CsrEncoder`] turn
//!    those into whole-matrix readers and writers.
//!
//! 2. **Coordinate assembly**: formats that store entries in any order feed
//!    a [`CoordinateAssembler`], which counting-sorts them into CSR arrays,
//!    with [`SymmetricExpansion`] for half-stored symmetric matrices.
//!
//! 3. **Adapters**: [`GraphAsMatrix`] and [`MatrixAsGraph`] let every file
//!    be read as either a matrix or a graph.
//!
//! ## Usage
//!
//! Converting a file between formats:
//!
//! ```no_run
//! use sparsio::{open_matrix_reader, open_matrix_writer, MatrixReader, MatrixWriter};
//!
//! # fn main() -> sparsio::Result<()> {
//! let matrix = open_matrix_reader("bcsstk01.mtx")?.read_matrix()?;
//! open_matrix_writer("bcsstk01.csr")?.write_matrix(&matrix)?;
//! # Ok(())
//! # }
//! ```
//!
//! Reading into caller-owned buffers with a progress cursor:
//!
//! ```no_run
//! use sparsio::{open_graph_reader, GraphReader};
//!
//! # fn main() -> sparsio::Result<()> {
//! let mut reader = open_graph_reader("web.snap")?;
//! let info = reader.info()?;
//!
//! let mut xadj = vec![0; info.nvtxs + 1];
//! let mut adjncy = vec![0; info.nedges];
//! let mut progress = 0.0;
//! reader.read(&mut xadj, &mut adjncy, None, None, Some(&mut progress))?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod assembly;
pub mod config;
pub mod error;
pub mod factory;
pub mod formats;
pub mod line_file;
pub mod matrix;
pub mod stream;
pub mod utils;

/// Numeric type of matrix values and graph weights
pub type Value = f64;

// Re-export primary components
pub use adapters::{GraphAsMatrix, MatrixAsGraph};
pub use assembly::{CoordinateAssembler, SymmetricExpansion};
pub use config::IoConfig;
pub use error::{FormatError, Result};
pub use factory::{
    open_graph_reader, open_graph_reader_with_config, open_graph_writer,
    open_graph_writer_with_config, open_matrix_reader, open_matrix_reader_with_config,
    open_matrix_writer, open_matrix_writer_with_config, GraphReaderHandle, GraphWriterHandle,
    MatrixReaderHandle, MatrixWriterHandle,
};
pub use formats::{CsrTextFile, Format, MatrixMarketFile, MetisFile, SnapFile};
pub use line_file::LineFile;
pub use matrix::{SparseGraph, SparseMatrixCSR};
pub use stream::{
    CsrDecoder, CsrEncoder, GraphInfo, GraphReader, GraphWriter, MatrixInfo, MatrixReader,
    MatrixWriter, RowReader, RowWriter,
};
pub use utils::{from_sprs_csr, graph_to_sprs, to_sprs_csr};

/// Version of the sparsio library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Opening readers and writers by file name
//!
//! The format is picked from the file name suffix (see [`Format`]). Matrix
//! callers asking for a graph format get it through [`GraphAsMatrix`] and
//! graph callers asking for a matrix format get it through
//! [`MatrixAsGraph`], so any supported file can be read or written either
//! way.

use std::path::Path;

use log::debug;

use crate::adapters::{GraphAsMatrix, MatrixAsGraph};
use crate::config::IoConfig;
use crate::error::Result;
use crate::formats::{CsrTextFile, Format, MatrixMarketFile, MetisFile, SnapFile};
use crate::stream::{
    CsrDecoder, CsrEncoder, GraphInfo, GraphReader, GraphWriter, MatrixInfo, MatrixReader,
    MatrixWriter,
};
use crate::Value;

/// A matrix reader for any supported format
#[derive(Debug)]
pub enum MatrixReaderHandle {
    CsrText(CsrDecoder<CsrTextFile>),
    MatrixMarket(MatrixMarketFile),
    Metis(GraphAsMatrix<MetisFile>),
    Snap(GraphAsMatrix<SnapFile>),
}

/// A matrix writer for any supported format
#[derive(Debug)]
pub enum MatrixWriterHandle {
    CsrText(CsrEncoder<CsrTextFile>),
    MatrixMarket(MatrixMarketFile),
    Metis(GraphAsMatrix<MetisFile>),
    Snap(GraphAsMatrix<SnapFile>),
}

/// A graph reader for any supported format
#[derive(Debug)]
pub enum GraphReaderHandle {
    Metis(MetisFile),
    Snap(SnapFile),
    CsrText(MatrixAsGraph<CsrDecoder<CsrTextFile>>),
    MatrixMarket(MatrixAsGraph<MatrixMarketFile>),
}

/// A graph writer for any supported format
#[derive(Debug)]
pub enum GraphWriterHandle {
    Metis(MetisFile),
    Snap(SnapFile),
    CsrText(MatrixAsGraph<CsrEncoder<CsrTextFile>>),
    MatrixMarket(MatrixAsGraph<MatrixMarketFile>),
}

/// Opens a matrix reader chosen by the suffix of `path`
pub fn open_matrix_reader(path: impl AsRef<Path>) -> Result<MatrixReaderHandle> {
    open_matrix_reader_with_config(path, &IoConfig::default())
}

pub fn open_matrix_reader_with_config(
    path: impl AsRef<Path>,
    config: &IoConfig,
) -> Result<MatrixReaderHandle> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    debug!("opening {} as a {:?} matrix reader", path.display(), format);

    let steps = config.progress_steps;
    Ok(match format {
        Format::CsrText => {
            MatrixReaderHandle::CsrText(CsrTextFile::reader(path).with_progress_steps(steps))
        }
        Format::MatrixMarket => MatrixReaderHandle::MatrixMarket(
            MatrixMarketFile::new(path).with_progress_steps(steps),
        ),
        Format::Metis => MatrixReaderHandle::Metis(GraphAsMatrix::new(
            MetisFile::new(path).with_progress_steps(steps),
        )),
        Format::Snap => MatrixReaderHandle::Snap(GraphAsMatrix::new(
            SnapFile::new(path).with_progress_steps(steps),
        )),
    })
}

/// Opens a matrix writer chosen by the suffix of `path`
pub fn open_matrix_writer(path: impl AsRef<Path>) -> Result<MatrixWriterHandle> {
    open_matrix_writer_with_config(path, &IoConfig::default())
}

pub fn open_matrix_writer_with_config(
    path: impl AsRef<Path>,
    config: &IoConfig,
) -> Result<MatrixWriterHandle> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    debug!("opening {} as a {:?} matrix writer", path.display(), format);

    Ok(match format {
        Format::CsrText => MatrixWriterHandle::CsrText(CsrTextFile::writer(path)),
        Format::MatrixMarket => MatrixWriterHandle::MatrixMarket(
            MatrixMarketFile::new(path).with_banner(config.write_banner),
        ),
        Format::Metis => MatrixWriterHandle::Metis(GraphAsMatrix::new(MetisFile::new(path))),
        Format::Snap => MatrixWriterHandle::Snap(GraphAsMatrix::new(
            SnapFile::new(path).with_directed(config.snap_directed),
        )),
    })
}

/// Opens a graph reader chosen by the suffix of `path`
pub fn open_graph_reader(path: impl AsRef<Path>) -> Result<GraphReaderHandle> {
    open_graph_reader_with_config(path, &IoConfig::default())
}

pub fn open_graph_reader_with_config(
    path: impl AsRef<Path>,
    config: &IoConfig,
) -> Result<GraphReaderHandle> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    debug!("opening {} as a {:?} graph reader", path.display(), format);

    let steps = config.progress_steps;
    Ok(match format {
        Format::Metis => GraphReaderHandle::Metis(MetisFile::new(path).with_progress_steps(steps)),
        Format::Snap => GraphReaderHandle::Snap(SnapFile::new(path).with_progress_steps(steps)),
        Format::CsrText => GraphReaderHandle::CsrText(MatrixAsGraph::new(
            CsrTextFile::reader(path).with_progress_steps(steps),
        )),
        Format::MatrixMarket => GraphReaderHandle::MatrixMarket(MatrixAsGraph::new(
            MatrixMarketFile::new(path).with_progress_steps(steps),
        )),
    })
}

/// Opens a graph writer chosen by the suffix of `path`
pub fn open_graph_writer(path: impl AsRef<Path>) -> Result<GraphWriterHandle> {
    open_graph_writer_with_config(path, &IoConfig::default())
}

pub fn open_graph_writer_with_config(
    path: impl AsRef<Path>,
    config: &IoConfig,
) -> Result<GraphWriterHandle> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    debug!("opening {} as a {:?} graph writer", path.display(), format);

    Ok(match format {
        Format::Metis => GraphWriterHandle::Metis(MetisFile::new(path)),
        Format::Snap => {
            GraphWriterHandle::Snap(SnapFile::new(path).with_directed(config.snap_directed))
        }
        Format::CsrText => {
            GraphWriterHandle::CsrText(MatrixAsGraph::new(CsrTextFile::writer(path)))
        }
        Format::MatrixMarket => GraphWriterHandle::MatrixMarket(MatrixAsGraph::new(
            MatrixMarketFile::new(path).with_banner(config.write_banner),
        )),
    })
}

impl MatrixReaderHandle {
    pub fn format(&self) -> Format {
        match self {
            Self::CsrText(_) => Format::CsrText,
            Self::MatrixMarket(_) => Format::MatrixMarket,
            Self::Metis(_) => Format::Metis,
            Self::Snap(_) => Format::Snap,
        }
    }
}

impl MatrixReader for MatrixReaderHandle {
    fn info(&mut self) -> Result<MatrixInfo> {
        match self {
            Self::CsrText(r) => r.info(),
            Self::MatrixMarket(r) => r.info(),
            Self::Metis(r) => r.info(),
            Self::Snap(r) => r.info(),
        }
    }

    fn read(
        &mut self,
        rowptr: &mut [usize],
        rowind: &mut [usize],
        rowval: Option<&mut [Value]>,
        progress: Option<&mut f64>,
    ) -> Result<()> {
        match self {
            Self::CsrText(r) => r.read(rowptr, rowind, rowval, progress),
            Self::MatrixMarket(r) => r.read(rowptr, rowind, rowval, progress),
            Self::Metis(r) => r.read(rowptr, rowind, rowval, progress),
            Self::Snap(r) => r.read(rowptr, rowind, rowval, progress),
        }
    }
}

impl MatrixWriterHandle {
    pub fn format(&self) -> Format {
        match self {
            Self::CsrText(_) => Format::CsrText,
            Self::MatrixMarket(_) => Format::MatrixMarket,
            Self::Metis(_) => Format::Metis,
            Self::Snap(_) => Format::Snap,
        }
    }
}

impl MatrixWriter for MatrixWriterHandle {
    fn set_info(&mut self, info: MatrixInfo) -> Result<()> {
        match self {
            Self::CsrText(w) => w.set_info(info),
            Self::MatrixMarket(w) => w.set_info(info),
            Self::Metis(w) => w.set_info(info),
            Self::Snap(w) => w.set_info(info),
        }
    }

    fn write(
        &mut self,
        rowptr: &[usize],
        rowind: &[usize],
        rowval: Option<&[Value]>,
    ) -> Result<()> {
        match self {
            Self::CsrText(w) => w.write(rowptr, rowind, rowval),
            Self::MatrixMarket(w) => w.write(rowptr, rowind, rowval),
            Self::Metis(w) => w.write(rowptr, rowind, rowval),
            Self::Snap(w) => w.write(rowptr, rowind, rowval),
        }
    }
}

impl GraphReaderHandle {
    pub fn format(&self) -> Format {
        match self {
            Self::Metis(_) => Format::Metis,
            Self::Snap(_) => Format::Snap,
            Self::CsrText(_) => Format::CsrText,
            Self::MatrixMarket(_) => Format::MatrixMarket,
        }
    }
}

impl GraphReader for GraphReaderHandle {
    fn info(&mut self) -> Result<GraphInfo> {
        match self {
            Self::Metis(r) => r.info(),
            Self::Snap(r) => r.info(),
            Self::CsrText(r) => r.info(),
            Self::MatrixMarket(r) => r.info(),
        }
    }

    fn read(
        &mut self,
        xadj: &mut [usize],
        adjncy: &mut [usize],
        vwgt: Option<&mut [Value]>,
        adjwgt: Option<&mut [Value]>,
        progress: Option<&mut f64>,
    ) -> Result<()> {
        match self {
            Self::Metis(r) => r.read(xadj, adjncy, vwgt, adjwgt, progress),
            Self::Snap(r) => r.read(xadj, adjncy, vwgt, adjwgt, progress),
            Self::CsrText(r) => r.read(xadj, adjncy, vwgt, adjwgt, progress),
            Self::MatrixMarket(r) => r.read(xadj, adjncy, vwgt, adjwgt, progress),
        }
    }
}

impl GraphWriterHandle {
    pub fn format(&self) -> Format {
        match self {
            Self::Metis(_) => Format::Metis,
            Self::Snap(_) => Format::Snap,
            Self::CsrText(_) => Format::CsrText,
            Self::MatrixMarket(_) => Format::MatrixMarket,
        }
    }
}

impl GraphWriter for GraphWriterHandle {
    fn set_info(&mut self, info: GraphInfo) -> Result<()> {
        match self {
            Self::Metis(w) => w.set_info(info),
            Self::Snap(w) => w.set_info(info),
            Self::CsrText(w) => w.set_info(info),
            Self::MatrixMarket(w) => w.set_info(info),
        }
    }

    fn write(
        &mut self,
        xadj: &[usize],
        adjncy: &[usize],
        vwgt: Option<&[Value]>,
        adjwgt: Option<&[Value]>,
    ) -> Result<()> {
        match self {
            Self::Metis(w) => w.write(xadj, adjncy, vwgt, adjwgt),
            Self::Snap(w) => w.write(xadj, adjncy, vwgt, adjwgt),
            Self::CsrText(w) => w.write(xadj, adjncy, vwgt, adjwgt),
            Self::MatrixMarket(w) => w.write(xadj, adjncy, vwgt, adjwgt),
        }
    }
}

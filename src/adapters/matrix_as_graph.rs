//! Presents a matrix reader or writer as a graph reader or writer

use crate::error::{FormatError, Result};
use crate::stream::{
    check_buffer, GraphInfo, GraphReader, GraphWriter, MatrixInfo, MatrixReader, MatrixWriter,
};
use crate::Value;

/// Wraps a [`MatrixReader`] or [`MatrixWriter`] so it can be used for graphs.
///
/// Row `i` becomes vertex `i`. Matrices never carry vertex weights and
/// always carry edge weights.
#[derive(Debug)]
pub struct MatrixAsGraph<M> {
    matrix: M,
}

impl<M> MatrixAsGraph<M> {
    pub fn new(matrix: M) -> Self {
        Self { matrix }
    }

    pub fn inner(&self) -> &M {
        &self.matrix
    }

    pub fn into_inner(self) -> M {
        self.matrix
    }
}

impl<M: MatrixReader> GraphReader for MatrixAsGraph<M> {
    fn info(&mut self) -> Result<GraphInfo> {
        let info = self.matrix.info()?;
        Ok(GraphInfo::new(info.nrows, info.nnz, 0, true))
    }

    fn read(
        &mut self,
        xadj: &mut [usize],
        adjncy: &mut [usize],
        vwgt: Option<&mut [Value]>,
        adjwgt: Option<&mut [Value]>,
        progress: Option<&mut f64>,
    ) -> Result<()> {
        let info = self.matrix.info()?;
        if let Some(vwgt) = vwgt {
            check_buffer("vwgt", vwgt.len(), info.nrows)?;
            vwgt[..info.nrows].fill(1.0);
        }
        self.matrix.read(xadj, adjncy, adjwgt, progress)
    }
}

impl<M: MatrixWriter> GraphWriter for MatrixAsGraph<M> {
    fn set_info(&mut self, info: GraphInfo) -> Result<()> {
        if info.nvwgt != 0 {
            return Err(FormatError::BadParameter(format!(
                "Matrices cannot hold vertex weights, {} per vertex requested",
                info.nvwgt
            )));
        }
        self.matrix
            .set_info(MatrixInfo::new(info.nvtxs, info.nvtxs, info.nedges))
    }

    fn write(
        &mut self,
        xadj: &[usize],
        adjncy: &[usize],
        _vwgt: Option<&[Value]>,
        adjwgt: Option<&[Value]>,
    ) -> Result<()> {
        self.matrix.write(xadj, adjncy, adjwgt)
    }
}

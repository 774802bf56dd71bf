//! Presents a graph reader or writer as a matrix reader or writer

use crate::error::{FormatError, Result};
use crate::stream::{GraphInfo, GraphReader, GraphWriter, MatrixInfo, MatrixReader, MatrixWriter};
use crate::Value;

/// Wraps a [`GraphReader`] or [`GraphWriter`] so it can be used for matrices
#[derive(Debug)]
pub struct GraphAsMatrix<G> {
    graph: G,
}

impl<G> GraphAsMatrix<G> {
    pub fn new(graph: G) -> Self {
        Self { graph }
    }

    pub fn inner(&self) -> &G {
        &self.graph
    }

    pub fn into_inner(self) -> G {
        self.graph
    }
}

impl<G: GraphReader> MatrixReader for GraphAsMatrix<G> {
    fn info(&mut self) -> Result<MatrixInfo> {
        let info = self.graph.info()?;
        Ok(MatrixInfo::new(info.nvtxs, info.nvtxs, info.nedges))
    }

    fn read(
        &mut self,
        rowptr: &mut [usize],
        rowind: &mut [usize],
        rowval: Option<&mut [Value]>,
        progress: Option<&mut f64>,
    ) -> Result<()> {
        self.graph.read(rowptr, rowind, None, rowval, progress)
    }
}

impl<G: GraphWriter> MatrixWriter for GraphAsMatrix<G> {
    fn set_info(&mut self, info: MatrixInfo) -> Result<()> {
        if info.nrows != info.ncols {
            return Err(FormatError::BadParameter(format!(
                "Only square matrices can be written as graphs, got {} x {}",
                info.nrows, info.ncols
            )));
        }
        self.graph
            .set_info(GraphInfo::new(info.nrows, info.nnz, 0, true))
    }

    fn write(
        &mut self,
        rowptr: &[usize],
        rowind: &[usize],
        rowval: Option<&[Value]>,
    ) -> Result<()> {
        self.graph.write(rowptr, rowind, None, rowval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::MetisFile;
    use crate::matrix::SparseMatrixCSR;
    use tempfile::tempdir;

    #[test]
    fn test_graph_read_as_matrix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("w.graph");
        std::fs::write(&path, "3 2 11 1\n7 2 4.5\n8 1 4.5 3 2.0\n9 2 2.0\n").unwrap();

        let mut reader = GraphAsMatrix::new(MetisFile::new(&path));
        assert_eq!(reader.info().unwrap(), MatrixInfo::new(3, 3, 4));

        let matrix = reader.read_matrix().unwrap();
        assert_eq!(matrix.row_ptr, vec![0, 1, 3, 4]);
        assert_eq!(matrix.col_idx, vec![1, 0, 2, 1]);
        assert_eq!(matrix.values, vec![4.5, 4.5, 2.0, 2.0]);
    }

    #[test]
    fn test_matrix_written_as_graph() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.graph");
        let matrix = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![1, 0], vec![3.0, 3.0]);

        let mut writer = GraphAsMatrix::new(MetisFile::new(&path));
        writer.write_matrix(&matrix).unwrap();
        drop(writer);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "2 1 1\n2 3\n1 3\n");
    }

    #[test]
    fn test_non_square_rejected() {
        let dir = tempdir().unwrap();
        let mut writer = GraphAsMatrix::new(MetisFile::new(dir.path().join("x.graph")));
        assert!(matches!(
            writer.set_info(MatrixInfo::new(2, 3, 0)),
            Err(FormatError::BadParameter(_))
        ));
    }
}

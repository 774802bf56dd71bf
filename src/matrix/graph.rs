//! Adjacency-list (CSR) graph container

use crate::error::{FormatError, Result};
use crate::Value;

/// A graph stored as CSR adjacency arrays
///
/// - xadj: Array of size n_vtxs + 1, xadj[v]..xadj[v+1] indexes v's neighbors
/// - adjncy: Array of size n_edges with the destination of each directed edge
/// - vwgt: Optional array of size n_vtxs * n_vwgt with per-vertex weights
/// - adjwgt: Optional array of size n_edges with per-edge weights
///
/// An undirected edge is stored twice, once in each direction.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseGraph {
    /// Number of vertices
    pub n_vtxs: usize,

    /// Number of vertex weights (constraints) per vertex
    pub n_vwgt: usize,

    /// Adjacency offsets (size: n_vtxs + 1)
    pub xadj: Vec<usize>,

    /// Edge destinations (size: n_edges)
    pub adjncy: Vec<usize>,

    /// Vertex weights (size: n_vtxs * n_vwgt)
    pub vwgt: Option<Vec<Value>>,

    /// Edge weights (size: n_edges)
    pub adjwgt: Option<Vec<Value>>,
}

impl SparseGraph {
    /// Creates a graph, validating the array sizes against each other
    pub fn new(
        xadj: Vec<usize>,
        adjncy: Vec<usize>,
        n_vwgt: usize,
        vwgt: Option<Vec<Value>>,
        adjwgt: Option<Vec<Value>>,
    ) -> Result<Self> {
        let n_vtxs = xadj.len().checked_sub(1).ok_or_else(|| {
            FormatError::BadParameter("xadj must hold at least one offset".to_string())
        })?;

        if xadj[0] != 0 || xadj.windows(2).any(|w| w[0] > w[1]) {
            return Err(FormatError::BadParameter(
                "xadj must start at 0 and be non-decreasing".to_string(),
            ));
        }
        if xadj[n_vtxs] != adjncy.len() {
            return Err(FormatError::BadParameter(format!(
                "xadj[{}] = {} does not match {} edges",
                n_vtxs,
                xadj[n_vtxs],
                adjncy.len()
            )));
        }
        if let Some(&dst) = adjncy.iter().find(|&&dst| dst >= n_vtxs) {
            return Err(FormatError::BadParameter(format!(
                "Edge destination {} out of bounds ({} vertices)",
                dst, n_vtxs
            )));
        }
        if let Some(vwgt) = &vwgt {
            if vwgt.len() != n_vtxs * n_vwgt {
                return Err(FormatError::BadParameter(format!(
                    "vwgt holds {} weights, expected {}",
                    vwgt.len(),
                    n_vtxs * n_vwgt
                )));
            }
        }
        if let Some(adjwgt) = &adjwgt {
            if adjwgt.len() != adjncy.len() {
                return Err(FormatError::BadParameter(
                    "adjwgt.len() must equal adjncy.len()".to_string(),
                ));
            }
        }

        Ok(Self {
            n_vtxs,
            n_vwgt,
            xadj,
            adjncy,
            vwgt,
            adjwgt,
        })
    }

    /// Number of directed edges
    pub fn n_edges(&self) -> usize {
        self.adjncy.len()
    }

    /// Returns an iterator over (neighbor, edge weight) pairs of vertex v.
    ///
    /// Missing edge weights read as 1.
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = (usize, Value)> + '_ {
        let start = self.xadj[v];
        let end = self.xadj[v + 1];
        (start..end).map(move |j| {
            let wgt = self.adjwgt.as_ref().map_or(1.0, |w| w[j]);
            (self.adjncy[j], wgt)
        })
    }

    /// Returns the weights of vertex v, empty when the graph has none
    pub fn vertex_weights(&self, v: usize) -> &[Value] {
        match &self.vwgt {
            Some(vwgt) => &vwgt[v * self.n_vwgt..(v + 1) * self.n_vwgt],
            None => &[],
        }
    }

    /// Returns true if every edge (u, v) has a matching (v, u)
    pub fn is_symmetric(&self) -> bool {
        let mut counts = std::collections::HashMap::new();
        for u in 0..self.n_vtxs {
            for &v in &self.adjncy[self.xadj[u]..self.xadj[u + 1]] {
                if u != v {
                    *counts.entry((u.min(v), u.max(v))).or_insert(0i64) +=
                        if u < v { 1 } else { -1 };
                }
            }
        }
        counts.values().all(|&c| c == 0)
    }
}

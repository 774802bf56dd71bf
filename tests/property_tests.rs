//! Property-based tests for the readers, writers and the coordinate assembler
//!
//! These tests use proptest to check that every format reproduces what was
//! written, and that assembling shuffled triplets matches a sorted baseline.

use std::collections::BTreeSet;

use proptest::prelude::*;
use sparsio::{
    CoordinateAssembler, CsrTextFile, GraphReader, GraphWriter, MatrixMarketFile, MatrixReader,
    MatrixWriter, MetisFile, SnapFile, SparseGraph, SparseMatrixCSR,
};
use tempfile::tempdir;

// ============================================================================
// Test Utilities
// ============================================================================

// Triplets, values and shape of a random matrix
type SparseMatrixData = (Vec<(usize, usize)>, Vec<f64>, (usize, usize));

/// Generate a random sparse matrix as unordered triplets
fn sparse_matrix_strategy(
    max_rows: usize,
    max_cols: usize,
    max_nnz: usize,
) -> impl Strategy<Value = SparseMatrixData> {
    (1..=max_rows, 1..=max_cols).prop_flat_map(move |(nrows, ncols)| {
        prop::collection::vec((0..nrows, 0..ncols), 0..=max_nnz).prop_flat_map(move |indices| {
            let len = indices.len();
            (
                Just(indices),
                prop::collection::vec(-100.0..100.0f64, len..=len),
                Just((nrows, ncols)),
            )
        })
    })
}

/// Generate an undirected graph without self loops or repeated edges
fn undirected_graph_strategy(
    max_vtxs: usize,
    max_edges: usize,
) -> impl Strategy<Value = SparseGraph> {
    (2..=max_vtxs).prop_flat_map(move |nvtxs| {
        prop::collection::vec((0..nvtxs, 0..nvtxs), 0..=max_edges).prop_map(move |pairs| {
            let pairs: BTreeSet<_> = pairs.into_iter().map(|(u, v)| (u.min(v), u.max(v))).collect();
            let mut adjacency = vec![Vec::new(); nvtxs];
            for (u, v) in pairs {
                if u < v {
                    // u + v makes the weight the same from both ends
                    adjacency[u].push((v, (u + v) as f64 + 0.5));
                    adjacency[v].push((u, (u + v) as f64 + 0.5));
                }
            }
            let mut xadj = vec![0];
            let mut adjncy = Vec::new();
            let mut adjwgt = Vec::new();
            for neighbors in adjacency {
                for (v, w) in neighbors {
                    adjncy.push(v);
                    adjwgt.push(w);
                }
                xadj.push(adjncy.len());
            }
            SparseGraph::new(xadj, adjncy, 0, None, Some(adjwgt)).unwrap()
        })
    })
}

/// Row-major CSR built by a stable sort of the triplets
fn sorted_baseline(data: &SparseMatrixData) -> SparseMatrixCSR<f64> {
    let (indices, values, (nrows, ncols)) = data;
    let mut order: Vec<usize> = (0..indices.len()).collect();
    order.sort_by_key(|&k| indices[k].0);

    let mut row_ptr = vec![0; nrows + 1];
    for &(row, _) in indices {
        row_ptr[row + 1] += 1;
    }
    for i in 0..*nrows {
        row_ptr[i + 1] += row_ptr[i];
    }

    SparseMatrixCSR::new(
        *nrows,
        *ncols,
        row_ptr,
        order.iter().map(|&k| indices[k].1).collect(),
        order.iter().map(|&k| values[k]).collect(),
    )
}

fn sorted_neighbors(graph: &SparseGraph, v: usize) -> Vec<(usize, f64)> {
    let mut neighbors: Vec<_> = graph.neighbors(v).collect();
    neighbors.sort_by(|a, b| a.partial_cmp(b).unwrap());
    neighbors
}

// ============================================================================
// Assembly Properties
// ============================================================================

proptest! {
    /// Property: assembling triplets in file order matches a stable row sort
    #[test]
    fn prop_assembler_matches_stable_sort(data in sparse_matrix_strategy(12, 12, 60)) {
        let (indices, values, (nrows, _)) = &data;
        let nnz = indices.len();

        let mut rowptr = vec![0; nrows + 1];
        let mut rowind = vec![0; nnz];
        let mut rowval = vec![0.0; nnz];
        let mut assembler =
            CoordinateAssembler::new(*nrows, nnz, &mut rowptr, &mut rowind, Some(&mut rowval))
                .unwrap();
        for (&(row, col), &value) in indices.iter().zip(values) {
            assembler.push(row, col, value).unwrap();
        }
        prop_assert_eq!(assembler.finish(), nnz);

        let expected = sorted_baseline(&data);
        prop_assert_eq!(rowptr, expected.row_ptr);
        prop_assert_eq!(rowind, expected.col_idx);
        prop_assert_eq!(rowval, expected.values);
    }
}

// ============================================================================
// Format Roundtrip Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: MatrixMarket reproduces the matrix exactly
    #[test]
    fn prop_matrix_market_roundtrip(data in sparse_matrix_strategy(10, 10, 40)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.mtx");
        let original = sorted_baseline(&data);

        MatrixMarketFile::new(&path).write_matrix(&original).unwrap();
        let read = MatrixMarketFile::new(&path).read_matrix().unwrap();
        prop_assert_eq!(read, original);
    }

    /// Property: CSR text reproduces rows and values; trailing empty columns
    /// are not recorded in the file
    #[test]
    fn prop_csr_text_roundtrip(data in sparse_matrix_strategy(10, 10, 40)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.csr");
        let original = sorted_baseline(&data);

        CsrTextFile::writer(&path).write_matrix(&original).unwrap();
        let read = CsrTextFile::reader(&path).read_matrix().unwrap();

        prop_assert_eq!(read.n_rows, original.n_rows);
        prop_assert!(read.n_cols <= original.n_cols);
        prop_assert_eq!(read.row_ptr, original.row_ptr);
        prop_assert_eq!(read.col_idx, original.col_idx);
        prop_assert_eq!(read.values, original.values);
    }

    /// Property: Metis reproduces an undirected graph exactly
    #[test]
    fn prop_metis_roundtrip(graph in undirected_graph_strategy(12, 30)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g.graph");

        MetisFile::new(&path).write_graph(&graph).unwrap();
        let read = MetisFile::new(&path).read_graph().unwrap();
        prop_assert_eq!(read, graph);
    }

    /// Property: an undirected SNAP file restores both directions of every edge
    #[test]
    fn prop_snap_undirected_roundtrip(graph in undirected_graph_strategy(12, 30)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g.snap");

        SnapFile::new(&path).write_graph(&graph).unwrap();
        let mut reader = SnapFile::new(&path);
        prop_assert_eq!(reader.info().unwrap().nedges, graph.n_edges());

        let read = reader.read_graph().unwrap();
        prop_assert_eq!(&read.xadj, &graph.xadj);
        for v in 0..graph.n_vtxs {
            prop_assert_eq!(sorted_neighbors(&read, v), sorted_neighbors(&graph, v));
        }
    }
}

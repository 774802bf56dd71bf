//! Benchmarks for the coordinate assembler and the file readers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sparsio::{
    open_matrix_reader, open_matrix_writer_with_config, CoordinateAssembler, IoConfig,
    MatrixReader, MatrixWriter, SparseMatrixCSR,
};
use tempfile::tempdir;

/// Creates a banded matrix with `band` entries per row
fn create_banded_matrix(n: usize, band: usize) -> SparseMatrixCSR<f64> {
    let mut row_ptr = vec![0];
    let mut col_idx = Vec::with_capacity(n * band);
    let mut values = Vec::with_capacity(n * band);

    for i in 0..n {
        for k in 0..band {
            let j = (i + k * 7) % n;
            col_idx.push(j);
            values.push((i + j) as f64 * 0.5);
        }
        row_ptr.push(col_idx.len());
    }

    SparseMatrixCSR::new(n, n, row_ptr, col_idx, values)
}

/// Triplets in a scrambled but deterministic order
fn scrambled_triplets(n: usize, per_row: usize) -> Vec<(usize, usize, f64)> {
    let total = n * per_row;
    (0..total)
        .map(|k| {
            let k = (k * 7919) % total;
            (k / per_row, (k * 31) % n, k as f64)
        })
        .collect()
}

fn bench_assembler(c: &mut Criterion) {
    let mut group = c.benchmark_group("coordinate_assembler");

    for &n in &[1_000usize, 10_000, 100_000] {
        let triplets = scrambled_triplets(n, 8);
        let nnz = triplets.len();

        group.bench_with_input(BenchmarkId::from_parameter(n), &triplets, |b, triplets| {
            let mut rowptr = vec![0; n + 1];
            let mut rowind = vec![0; nnz];
            let mut rowval = vec![0.0; nnz];
            b.iter(|| {
                let mut assembler = CoordinateAssembler::new(
                    n,
                    nnz,
                    &mut rowptr,
                    &mut rowind,
                    Some(&mut rowval),
                )
                .unwrap();
                for &(row, col, value) in triplets {
                    assembler.push(row, col, value).unwrap();
                }
                black_box(assembler.finish())
            })
        });
    }

    group.finish();
}

fn bench_readers(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let matrix = create_banded_matrix(20_000, 10);

    // the band is not symmetric, so SNAP output must be directed
    let config = IoConfig {
        snap_directed: true,
        ..IoConfig::default()
    };

    let mut group = c.benchmark_group("read_matrix");
    group.sample_size(20);

    for name in ["banded.csr", "banded.mtx", "banded.graph", "banded.snap"] {
        let path = dir.path().join(name);
        open_matrix_writer_with_config(&path, &config)
            .unwrap()
            .write_matrix(&matrix)
            .unwrap();

        group.bench_function(name, |b| {
            b.iter(|| {
                let mut reader = open_matrix_reader(&path).unwrap();
                black_box(reader.read_matrix().unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_assembler, bench_readers);
criterion_main!(benches);

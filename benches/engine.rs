//! Benchmarks for the cube engine.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rubik::asset::{GeneratedCube, ModelLoader};
use rubik::catalog::CATALOG;
use rubik::grid::format_state;
use rubik::membership::identify_face_pieces;
use rubik::model::CubeModel;
use rubik::notation::invert_sequence;
use rubik::{Cube, CubeConfig, Playback};

const FRAME: Duration = Duration::from_millis(16);

fn solved_model() -> CubeModel {
    let asset = GeneratedCube::default().load().unwrap();
    CubeModel::from_asset(&asset).unwrap()
}

/// Benchmark resolving face membership for all six faces.
fn bench_identify_face_pieces(c: &mut Criterion) {
    let model = solved_model();

    c.bench_function("identify_face_pieces", |b| {
        b.iter(|| identify_face_pieces(black_box(&model)))
    });
}

/// Benchmark inverting every catalog algorithm.
fn bench_invert_catalog(c: &mut Criterion) {
    c.bench_function("invert_catalog", |b| {
        b.iter(|| {
            for algorithm in CATALOG {
                black_box(invert_sequence(black_box(algorithm.moves)));
            }
        })
    });
}

/// Benchmark playing Sune headlessly, frame by frame.
fn bench_headless_sune(c: &mut Criterion) {
    let mut group = c.benchmark_group("headless");
    group.sample_size(20);
    group.bench_function("sune", |b| {
        b.iter(|| {
            let cube = Cube::new(CubeConfig::default(), GeneratedCube::default()).unwrap();
            let run = cube.execute_algorithm(black_box("R U R' U R U2 R'"), Duration::from_millis(96));
            assert_eq!(cube.run_until_complete(run, FRAME), Playback::Completed);
        })
    });
    group.finish();
}

/// Benchmark formatting the grid report.
fn bench_format_state(c: &mut Criterion) {
    let model = solved_model();

    c.bench_function("format_state", |b| {
        b.iter(|| format_state(black_box(&model), 1.0))
    });
}

criterion_group!(
    benches,
    bench_identify_face_pieces,
    bench_invert_catalog,
    bench_headless_sune,
    bench_format_state
);
criterion_main!(benches);

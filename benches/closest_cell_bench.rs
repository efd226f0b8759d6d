use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mesh_topology::prelude::*;

fn probes(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point::new(
                rng.gen_range(-0.5..1.5),
                rng.gen_range(-0.5..1.5),
                rng.gen_range(-0.5..1.5),
            )
        })
        .collect()
}

fn bench_closest_cell(c: &mut Criterion) {
    let mut group = c.benchmark_group("closest_cell");
    let points = probes(1_000, 42);

    for &n in &[4usize, 8, 16] {
        let mesh = unit_cube(n, n, n).unwrap();

        group.bench_with_input(BenchmarkId::new("build_tree", n), &n, |b, _| {
            b.iter(|| BoundingBoxTree::build(black_box(&mesh), 3).unwrap())
        });

        // warm the cached tree
        mesh.cell_tree().unwrap();
        group.bench_with_input(BenchmarkId::new("query", n), &n, |b, _| {
            b.iter(|| {
                for p in &points {
                    black_box(mesh.closest_cell(p).unwrap());
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("intersected_cells", n), &n, |b, _| {
            b.iter(|| {
                for p in &points {
                    black_box(mesh.intersected_cells(p).unwrap());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_closest_cell);
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use mesh_topology::prelude::*;

fn bench_connectivity(c: &mut Criterion) {
    let mut group = c.benchmark_group("connectivity");

    for &n in &[4usize, 8, 12] {
        let base = unit_cube(n, n, n).unwrap();

        group.bench_with_input(BenchmarkId::new("edges", n), &n, |b, _| {
            b.iter(|| {
                let mesh = base.clone();
                black_box(mesh.init(1).unwrap())
            })
        });

        group.bench_with_input(BenchmarkId::new("faces_to_edges", n), &n, |b, _| {
            b.iter(|| {
                let mesh = base.clone();
                mesh.init_connectivity(2, 1).unwrap();
                black_box(mesh.connectivity(2, 1).unwrap().size_total())
            })
        });

        group.bench_with_input(BenchmarkId::new("init_all_and_order", n), &n, |b, _| {
            b.iter(|| {
                let mut mesh = base.clone();
                mesh.init_all().unwrap();
                mesh.order().unwrap();
                black_box(mesh.num_faces().unwrap())
            })
        });

        group.bench_with_input(BenchmarkId::new("boundary", n), &n, |b, _| {
            b.iter(|| black_box(base.boundary(BoundaryType::Exterior).unwrap().num_cells()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_connectivity);
criterion_main!(benches);

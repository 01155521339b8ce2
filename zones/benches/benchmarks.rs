use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geo::geometry::Coord;
use zones::{reconcile, to_planar};

fn projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("Projection");

    let tower = Coord {
        x: -43.8526956561,
        y: -19.9317348003,
    };

    let next_tower = Coord {
        x: -43.8536780703,
        y: -19.9323032926,
    };

    group.bench_with_input("to_planar", &tower, |b, t| {
        b.iter(|| to_planar(black_box(*t)).unwrap())
    });

    group.bench_with_input(
        "round_trip",
        &tower,
        |b, t| b.iter(|| to_planar(black_box(*t)).unwrap().to_geographic().unwrap()),
    );

    group.bench_with_input("reconcile", &(tower, next_tower), |b, (s, e)| {
        b.iter(|| reconcile(black_box(*s), black_box(*e)).unwrap())
    });
}

criterion_group!(benches, projection);
criterion_main!(benches);

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use whiteboard_core::{Facing, PlacedAtom, Rgb, TileId, Vec3};
use whiteboard_grid::{Anchor, Candidate, CoordinateProjector, GridResolver};

/// Full wall laid out with the (-r, +d) orientation.
fn wall(size: usize) -> (Anchor, Vec<Candidate>) {
    let facing = Facing::North;
    let anchor = Anchor::new(TileId::new(), Vec3::new(0.5, 80.5, 0.5), facing);
    let right = -facing.right_axis();
    let down = facing.down_axis();
    let mut candidates = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let id = if row == 0 && col == 0 { anchor.id } else { TileId::new() };
            candidates.push(Candidate::new(id, right * col as f64 + down * row as f64, facing));
        }
    }
    (anchor, candidates)
}

fn bench_resolve_orientation(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_orientation");

    for size in [4, 16, 32] {
        let (anchor, candidates) = wall(size);
        let resolver = GridResolver::new(size, size).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| resolver.resolve_orientation(black_box(&anchor), black_box(&candidates)));
        });
    }

    group.finish();
}

fn bench_project_atoms(c: &mut Criterion) {
    let (anchor, candidates) = wall(16);
    let resolver = GridResolver::new(16, 16).unwrap();
    let orientation = resolver.resolve_orientation(&anchor, &candidates).unwrap();
    assert_eq!(orientation.filled, 256);

    struct NoSurfaces;
    impl whiteboard_grid::SurfaceProvider for NoSurfaces {
        fn place_tile(&mut self, _center: Vec3, _facing: Facing) -> Option<TileId> {
            None
        }
    }
    let grid = resolver.establish(&anchor, &candidates, &mut NoSurfaces).unwrap().grid;

    let atoms: Vec<PlacedAtom> = (0..200)
        .map(|i| PlacedAtom {
            text: "word".into(),
            color: Rgb::BLACK,
            point_size: 16,
            x: (i * 37) % 2000,
            y: (i / 10) * 20,
            width: 32,
        })
        .collect();
    let projector = CoordinateProjector::default();

    c.bench_function("project_200_atoms_16x16", |b| {
        b.iter(|| {
            atoms
                .iter()
                .map(|a| projector.project(black_box(&grid), a).len())
                .sum::<usize>()
        });
    });
}

criterion_group!(benches, bench_resolve_orientation, bench_project_atoms);
criterion_main!(benches);

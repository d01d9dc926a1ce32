//! Benchmarks for the CPU side of the particle field.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use particle_field::{
    FieldConfig, ParticleField, PerformanceTier, RecordingCanvas, SpatialGrid, TierConfig,
    Viewport,
};

const VIEWPORT: Viewport = Viewport {
    width: 1920,
    height: 1080,
};

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    let config = FieldConfig::default();

    for tier in PerformanceTier::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(tier), &tier, |b, &tier| {
            let mut canvas = RecordingCanvas::new(VIEWPORT);
            let mut field = ParticleField::new(
                &config,
                tier,
                &mut canvas,
                VIEWPORT,
                &mut StdRng::seed_from_u64(42),
            );
            b.iter(|| {
                let outcome = field.tick(&mut canvas);
                canvas.take_commands();
                black_box(outcome)
            })
        });
    }

    group.finish();
}

fn bench_grid_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_build");

    // Denser than any stock tier to show how the grid scales
    for count in [30usize, 300, 3000] {
        let config = FieldConfig {
            tiers: particle_field::TierTable {
                high: TierConfig {
                    particle_count: count,
                    ..TierConfig::HIGH
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let mut canvas = RecordingCanvas::new(VIEWPORT);
        let field = ParticleField::new(
            &config,
            PerformanceTier::High,
            &mut canvas,
            VIEWPORT,
            &mut StdRng::seed_from_u64(7),
        );

        group.bench_with_input(BenchmarkId::from_parameter(count), &field, |b, field| {
            b.iter(|| {
                black_box(SpatialGrid::build(
                    field.particles(),
                    TierConfig::HIGH.connection_distance,
                    VIEWPORT.size(),
                ))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick, bench_grid_build);
criterion_main!(benches);

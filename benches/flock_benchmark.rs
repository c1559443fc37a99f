/*
 * Flocking Benchmark
 *
 * Measures the stages of one simulation frame at several population sizes:
 * building the spatial hash, reducing it into the cell table, and the whole
 * frame as run by the driver.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use hashboids::{AgentSnapshot, CellJitter, CellTable, Flock, SimulationConfig, SimulationDriver, SpatialHashMap};

const SIZES: [usize; 4] = [1_000, 5_000, 10_000, 50_000];

fn config_for(agent_count: usize) -> SimulationConfig {
    SimulationConfig {
        agent_count,
        rng_seed: Some(1),
        ..SimulationConfig::default()
    }
}

// Benchmark hashing every agent into the concurrent map
fn bench_spatial_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_hash");

    for &n in SIZES.iter() {
        let config = config_for(n);
        let mut rng = StdRng::seed_from_u64(1);
        let flock = Flock::spawn(&config, &mut rng);
        let jitter = CellJitter::sample(&mut rng, config.perception_radius);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(SpatialHashMap::build(flock.agents(), &jitter)));
        });
    }

    group.finish();
}

// Benchmark folding the hash groups into per-cell sums
fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");

    for &n in SIZES.iter() {
        let config = config_for(n);
        let mut rng = StdRng::seed_from_u64(1);
        let flock = Flock::spawn(&config, &mut rng);
        let jitter = CellJitter::sample(&mut rng, config.perception_radius);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter_batched(
                || {
                    (
                        AgentSnapshot::capture(flock.agents()),
                        SpatialHashMap::build(flock.agents(), &jitter),
                    )
                },
                |(snapshot, hash_map)| black_box(CellTable::reduce(snapshot, hash_map)),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// Benchmark a full frame
fn bench_full_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_frame");

    for &n in SIZES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut driver = match SimulationDriver::try_start(Some(config_for(n))) {
                Ok(driver) => driver,
                Err(err) => panic!("benchmark config rejected: {}", err),
            };
            b.iter(|| black_box(driver.step(1.0 / 60.0)));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(20)
        .measurement_time(Duration::from_secs(5));
    targets = bench_spatial_hash, bench_reduce, bench_full_frame
}
criterion_main!(benches);

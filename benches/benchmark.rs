use std::num::NonZeroUsize;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

use device_stats::{aggregate, Reading, Record, RecordStore};

fn records(len: usize, devices: usize) -> RecordStore {
    let mut rng = StdRng::seed_from_u64(0);
    let names = (0..devices)
        .map(|i| format!("device-{:03}", i))
        .collect::<Vec<_>>();
    (0..len)
        .map(|_| {
            let device = &names[rng.gen_range(0..names.len())];
            let month = rng.gen_range(3..=12);
            let readings =
                std::array::from_fn(|_| Reading::from_scaled(rng.gen_range(0..1000 * Reading::SCALE)));
            Record::new(device, 2024, month, readings)
        })
        .collect()
}

pub fn benchmark(c: &mut Criterion) {
    let store = records(1_000_000, 100);

    let mut group = c.benchmark_group("aggregate");
    group.throughput(Throughput::Elements(store.len() as u64));

    for workers in [1, 2, 4, 8] {
        let workers = NonZeroUsize::new(workers).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| black_box(aggregate(&store, workers)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);

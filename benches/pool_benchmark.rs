use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use std::time::Duration;
use workpool::TaskPool;

// submit and drain no-op tasks
pub fn submit_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_bench");
    group.bench_with_input(BenchmarkId::new("noop", 1), &1000, |b, i| {
        b.iter(|| {
            let pool = TaskPool::new(4, 64).unwrap();
            for _ in 0..*i {
                pool.submit(|| Ok(())).unwrap();
            }
            pool.wait_until_empty();
        })
    });
}

pub fn busy_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("busy_bench");
    group.bench_with_input(BenchmarkId::new("busy", 1), &200, |b, i| {
        b.iter(|| {
            let pool = TaskPool::new(4, 16).unwrap();
            let mut rng = rand::thread_rng();
            for _ in 0..*i {
                let spins: u64 = rng.gen_range(10..1000);
                pool.submit(move || {
                    let mut acc = 0u64;
                    for j in 0..spins {
                        acc = acc.wrapping_add(j);
                    }
                    black_box(acc);
                    Ok(())
                })
                .unwrap();
            }
            pool.shutdown_and_wait(Duration::from_millis(100));
        })
    });
}

criterion_group!(benches, submit_bench, busy_bench);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use scalable_bloom::{BloomFilter, FilterOptions, ScalableBloomFilter};

fn opts(path: &std::path::Path) -> FilterOptions {
    FilterOptions::new().path(path).err_rate(0.01).capacity(1_000_000)
}

pub fn fixed_bench(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let mut bloom = BloomFilter::new(opts(&dir.path().join("bench.db"))).unwrap();
    bloom.add(b"warm-up").unwrap();

    c.bench_function("fixed_add", |b| {
        let mut i: u64 = 0;
        b.iter(|| {
            i += 1;
            black_box(bloom.add(&i.to_le_bytes())).ok();
        })
    });

    c.bench_function("fixed_contains_hit", |b| {
        b.iter(|| black_box(bloom.contains(b"warm-up")))
    });

    c.bench_function("fixed_contains_miss", |b| {
        b.iter(|| black_box(bloom.contains(b"definitely-not-present")))
    });

    bloom.close().unwrap();
}

pub fn scalable_bench(c: &mut Criterion) {
    c.bench_function("scalable_add_1m_with_growth", |b| {
        b.iter_batched(
            || {
                let dir = tempfile::tempdir().unwrap();
                let path = dir.path().join("bench.db");
                let filter = ScalableBloomFilter::new(
                    FilterOptions::new().path(path).err_rate(0.01).capacity(1_000),
                )
                .unwrap();
                (dir, filter)
            },
            |(dir, mut filter)| {
                for i in 0u32..10_000 {
                    filter.add(black_box(&i.to_le_bytes())).unwrap();
                }
                black_box(&filter);
                drop(filter);
                drop(dir);
            },
            BatchSize::NumBatches(1),
        )
    });
}

criterion_group!(benches, fixed_bench, scalable_bench);
criterion_main!(benches);

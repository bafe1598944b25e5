use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use trip_stats::{detect_outliers, most_frequent, top_k};

fn scores(n: usize) -> Vec<(usize, f64)> {
    let mut rng = StdRng::seed_from_u64(0x7219);
    (0..n).map(|i| (i, rng.gen_range(0.0..100.0))).collect()
}

fn full_sort(mut pairs: Vec<(usize, f64)>, k: usize) -> Vec<(usize, f64)> {
    pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    pairs.truncate(k);
    pairs
}

fn compare_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("top-10");
    for &n in &[1_000, 100_000] {
        let pairs = scores(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("Bounded heap", n), &pairs, |b, pairs| {
            b.iter(|| top_k(black_box(pairs.iter().cloned()), 10));
        });
        group.bench_with_input(BenchmarkId::new("Full sort", n), &pairs, |b, pairs| {
            b.iter(|| full_sort(black_box(pairs.clone()), 10));
        });
        #[cfg(feature = "rayon")]
        group.bench_with_input(BenchmarkId::new("Parallel", n), &pairs, |b, pairs| {
            b.iter(|| trip_stats::par_top_k(black_box(pairs), 10));
        });
    }
    group.finish();
}

fn frequencies(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x7219);
    let hours: Vec<u32> = (0..100_000).map(|_| rng.gen_range(0..24)).collect();

    c.bench_function("most_frequent 100k", |b| {
        b.iter(|| most_frequent(black_box(hours.iter()), 5));
    });
}

fn outliers(c: &mut Criterion) {
    let values: Vec<Option<f64>> = scores(100_000)
        .into_iter()
        .map(|(i, x)| if i % 50 == 0 { None } else { Some(x) })
        .collect();

    c.bench_function("detect_outliers 100k", |b| {
        b.iter(|| detect_outliers(black_box(&values), |&v| v, 3.0).len());
    });
}

criterion_group!(benches, compare_selection, frequencies, outliers);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use host_bench::bench::Matrix;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn kernel_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_kernels");
    group.sample_size(10);

    for size in [32usize, 64, 128] {
        let mut rng = StdRng::seed_from_u64(size as u64);
        let a = Matrix::random(size, &mut rng);
        let b = Matrix::random(size, &mut rng);

        group.bench_with_input(BenchmarkId::new("matmul", size), &size, |bench, _| {
            bench.iter(|| black_box(a.matmul(&b)))
        });
        group.bench_with_input(BenchmarkId::new("svd", size), &size, |bench, _| {
            bench.iter(|| black_box(a.singular_values()))
        });
        group.bench_with_input(BenchmarkId::new("fft2", size), &size, |bench, _| {
            bench.iter(|| black_box(a.dft2()))
        });
        group.bench_with_input(BenchmarkId::new("exp", size), &size, |bench, _| {
            bench.iter(|| black_box(a.exp()))
        });
    }

    group.finish();
}

criterion_group!(benches, kernel_benchmark);
criterion_main!(benches);

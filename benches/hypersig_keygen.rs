use crate::bench_utils::{format_size, presets};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hypersig::{ShakeHasher, SphincsPlus};


fn keygen_benchmarks(c: &mut Criterion) {
    let alg_name = "keygen";
    let mut group = c.benchmark_group(format!("hypersig_{}", alg_name));
    group.sample_size(10);

    for (name, params) in presets() {
        let pk_size = format!("pk={}", format_size(params.pk_bytes()));

        let sha2: SphincsPlus = SphincsPlus::new(params);
        group.bench_function(BenchmarkId::new(format!("{}_sha2", name), &pk_size), |b| {
            b.iter(|| {
                black_box(sha2.keygen().unwrap());
            });
        });

        let shake: SphincsPlus<ShakeHasher> = SphincsPlus::new(params);
        group.bench_function(BenchmarkId::new(format!("{}_shake", name), &pk_size), |b| {
            b.iter(|| {
                black_box(shake.keygen().unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, keygen_benchmarks);
criterion_main!(benches);

//! Benchmarks comparing the fused Gaussian noise kernel against the reference path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use burn::tensor::{Distribution, Tensor};
use varit_core::backend::{init_cpu_device, CpuBackend};
use varit_kernels::reference;

fn benchmark_reference_cpu(c: &mut Criterion) {
    let device = init_cpu_device();
    let mut group = c.benchmark_group("gaussian_noise_cpu");

    for size in [1_000, 10_000, 100_000].iter() {
        let ln_var: Tensor<CpuBackend, 1> =
            Tensor::random([*size], Distribution::Uniform(-2.0, 2.0), &device);
        let eps: Tensor<CpuBackend, 1> =
            Tensor::random([*size], Distribution::Normal(0.0, 1.0), &device);

        group.bench_with_input(BenchmarkId::new("reference", size), size, |b, _| {
            b.iter(|| reference::scaled_noise(black_box(ln_var.clone()), black_box(eps.clone())))
        });
    }

    group.finish();
}

#[cfg(feature = "gpu")]
fn benchmark_gaussian_noise_gpu(c: &mut Criterion) {
    use varit_core::backend::{init_gpu_device, CubeWgpuBackend};
    use varit_kernels::gaussian_noise_fused;

    let device = init_gpu_device();
    let mut group = c.benchmark_group("gaussian_noise_gpu");

    for size in [10_000, 100_000, 1_000_000].iter() {
        let ln_var: Tensor<CubeWgpuBackend, 1> =
            Tensor::random([*size], Distribution::Uniform(-2.0, 2.0), &device);
        let eps: Tensor<CubeWgpuBackend, 1> =
            Tensor::random([*size], Distribution::Normal(0.0, 1.0), &device);

        group.bench_with_input(BenchmarkId::new("reference", size), size, |b, _| {
            b.iter(|| {
                let out = reference::scaled_noise(black_box(ln_var.clone()), black_box(eps.clone()));
                // Force the queue to flush so we time the kernels, not the enqueue
                out.into_data()
            })
        });

        group.bench_with_input(BenchmarkId::new("fused", size), size, |b, _| {
            b.iter(|| {
                let out = gaussian_noise_fused(black_box(ln_var.clone()), black_box(eps.clone()));
                out.into_data()
            })
        });
    }

    group.finish();
}

#[cfg(feature = "gpu")]
criterion_group!(
    benches,
    benchmark_reference_cpu,
    benchmark_gaussian_noise_gpu
);

#[cfg(not(feature = "gpu"))]
criterion_group!(benches, benchmark_reference_cpu);

criterion_main!(benches);

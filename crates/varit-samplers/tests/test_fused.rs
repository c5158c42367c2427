//! Fused and reference forward paths must agree.

#[cfg(feature = "gpu")]
mod tests {
    use burn::tensor::{Distribution, Tensor};
    use varit_core::backend::{init_gpu_device, CubeWgpuBackend};
    use varit_samplers::Gaussian;

    #[test]
    fn test_forward_fused_matches_reference() {
        let device = init_gpu_device();

        let mean: Tensor<CubeWgpuBackend, 2> =
            Tensor::random([16, 8], Distribution::Normal(0.0, 1.0), &device);
        let ln_var: Tensor<CubeWgpuBackend, 2> =
            Tensor::random([16, 8], Distribution::Uniform(-2.0, 2.0), &device);
        let eps: Tensor<CubeWgpuBackend, 2> =
            Tensor::random([16, 8], Distribution::Normal(0.0, 1.0), &device);

        let mut reference_op = Gaussian::with_eps(eps.clone());
        let mut fused_op = Gaussian::with_eps(eps);

        let expected: Vec<f32> = reference_op
            .forward(mean.clone(), ln_var.clone())
            .unwrap()
            .into_data()
            .to_vec()
            .unwrap();
        let fused: Vec<f32> = fused_op
            .forward_fused(mean, ln_var)
            .unwrap()
            .into_data()
            .to_vec()
            .unwrap();

        for (r, f) in expected.iter().zip(fused.iter()) {
            assert!((r - f).abs() <= 1e-4 * r.abs().max(1.0), "ref={} fused={}", r, f);
        }
    }
}

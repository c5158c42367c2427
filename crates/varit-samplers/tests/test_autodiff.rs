//! The operator evaluated on an autodiff backend must yield the same gradients
//! as its explicit backward pass.

use burn::tensor::{Distribution, Tensor};
use varit_core::backend::{init_cpu_device, CpuAutodiffBackend};
use varit_samplers::{Gaussian, RngKey};

type AD = CpuAutodiffBackend;

#[test]
fn test_autodiff_gradients_match_explicit_backward() {
    let device = init_cpu_device();

    let mean = Tensor::<AD, 2>::random([3, 4], Distribution::Normal(0.0, 1.0), &device)
        .require_grad();
    let ln_var = Tensor::<AD, 2>::random([3, 4], Distribution::Uniform(-1.0, 1.0), &device)
        .require_grad();
    let upstream = Tensor::<AD, 2>::random([3, 4], Distribution::Normal(0.0, 1.0), &device);

    let mut op = Gaussian::with_key(RngKey::new(9));
    let sample = op.forward(mean.clone(), ln_var.clone()).unwrap();

    // d(sum(sample * upstream))/d(sample) = upstream
    let grads = (sample * upstream.clone()).sum().backward();
    let d_mean: Vec<f32> = mean.grad(&grads).unwrap().into_data().to_vec().unwrap();
    let d_ln_var: Vec<f32> = ln_var.grad(&grads).unwrap().into_data().to_vec().unwrap();

    let (explicit_mean, explicit_ln_var) = op.backward(upstream).unwrap();
    let explicit_mean: Vec<f32> = explicit_mean.into_data().to_vec().unwrap();
    let explicit_ln_var: Vec<f32> = explicit_ln_var.into_data().to_vec().unwrap();

    for (a, e) in d_mean.iter().zip(explicit_mean.iter()) {
        assert!((a - e).abs() < 1e-5, "d_mean autodiff={} explicit={}", a, e);
    }
    for (a, e) in d_ln_var.iter().zip(explicit_ln_var.iter()) {
        assert!((a - e).abs() < 1e-5, "d_ln_var autodiff={} explicit={}", a, e);
    }
}

#[test]
fn test_eps_receives_no_gradient() {
    let device = init_cpu_device();

    let eps = Tensor::<AD, 1>::from_floats([0.5, -0.5], &device).require_grad();
    let mean = Tensor::<AD, 1>::from_floats([0.0, 1.0], &device).require_grad();
    let ln_var = Tensor::<AD, 1>::zeros([2], &device).require_grad();

    let mut op = Gaussian::with_eps(eps.clone());
    let grads = op.forward(mean.clone(), ln_var.clone()).unwrap().sum().backward();

    assert!(eps.grad(&grads).is_none(), "eps is detached from the graph");

    let d_ln_var: Vec<f32> = ln_var.grad(&grads).unwrap().into_data().to_vec().unwrap();
    assert_eq!(d_ln_var, vec![0.25, -0.25]);
}

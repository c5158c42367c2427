use burn::tensor::Tensor;
use varit_core::backend::{init_cpu_device, CpuAutodiffBackend, CpuBackend};

#[test]
fn test_cpu_initialization() {
    let device = init_cpu_device();
    let tensor = Tensor::<CpuBackend, 3>::ones([2, 3, 4], &device);
    assert_eq!(tensor.dims(), [2, 3, 4]);

    let total: f32 = tensor.sum().into_scalar();
    assert_eq!(total, 24.0);
}

#[test]
fn test_cpu_autodiff_tracks_gradients() {
    let device = init_cpu_device();
    let x = Tensor::<CpuAutodiffBackend, 1>::from_floats([1.0, 2.0, 3.0], &device).require_grad();

    let grads = (x.clone() * x.clone()).sum().backward();
    let dx: Vec<f32> = x.grad(&grads).unwrap().into_data().to_vec().unwrap();

    assert_eq!(dx, vec![2.0, 4.0, 6.0]);
}

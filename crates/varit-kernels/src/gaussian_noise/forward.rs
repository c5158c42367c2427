//! Forward pass for the fused Gaussian noise kernel.
//!
//! The launcher is generic over the CubeBackend parameters so it serves every
//! CubeCL runtime, not just WGPU.

use super::kernel::gaussian_noise_kernel;
use burn::tensor::ops::FloatTensor;
use burn::tensor::Tensor;
use burn_cubecl::{
    element::BoolElement, kernel::into_contiguous, tensor::CubeTensor, CubeBackend, CubeRuntime,
    FloatElement, IntElement,
};
use cubecl::{CubeCount, CubeDim};
use varit_core::backend::CubeWgpuBackend;

/// Launch the Gaussian noise kernel on any CubeBackend.
///
/// # Arguments
/// * `ln_var` - Log-variance, any shape
/// * `eps` - Standard normal noise, same shape as `ln_var`
///
/// # Returns
/// `exp(ln_var / 2) * eps` with the shape of `ln_var`
pub fn launch_gaussian_noise<R, F, I, BT>(
    ln_var: FloatTensor<CubeBackend<R, F, I, BT>>,
    eps: FloatTensor<CubeBackend<R, F, I, BT>>,
) -> FloatTensor<CubeBackend<R, F, I, BT>>
where
    R: CubeRuntime,
    F: FloatElement,
    I: IntElement,
    BT: BoolElement,
{
    // 256 threads per workgroup for element-wise ops
    let cube_dim = CubeDim { x: 256, y: 1, z: 1 };

    ln_var.assert_is_on_same_device(&eps);

    // The kernel indexes linearly, so both inputs must be contiguous
    let ln_var = into_contiguous(ln_var);
    let eps = into_contiguous(eps);

    let n_elements = ln_var.shape.num_elements();
    let shape_out = ln_var.shape.clone();

    let buffer = ln_var.client.empty(n_elements * core::mem::size_of::<F>());
    let output = CubeTensor::new_contiguous(
        ln_var.client.clone(),
        ln_var.device.clone(),
        shape_out,
        buffer,
        F::dtype(),
    );

    let cubes_needed = f32::ceil(n_elements as f32 / cube_dim.x as f32) as u32;
    let cube_count = CubeCount::Static(cubes_needed, 1, 1);

    log::trace!(
        "gaussian_noise_kernel: {} elements over {} cubes",
        n_elements,
        cubes_needed
    );

    gaussian_noise_kernel::launch::<F, R>(
        &ln_var.client,
        cube_count,
        cube_dim,
        ln_var.as_tensor_arg::<F>(1),
        eps.as_tensor_arg::<F>(1),
        output.as_tensor_arg::<F>(1),
    );

    output
}

/// Fused `exp(ln_var / 2) * eps` on the raw CubeWgpuBackend (not Fusion).
pub fn gaussian_noise_fused<const D: usize>(
    ln_var: Tensor<CubeWgpuBackend, D>,
    eps: Tensor<CubeWgpuBackend, D>,
) -> Tensor<CubeWgpuBackend, D> {
    use burn::tensor::TensorPrimitive;
    use cubecl::wgpu::WgpuRuntime;

    let ln_var_prim = ln_var.into_primitive().tensor();
    let eps_prim = eps.into_primitive().tensor();

    let output = launch_gaussian_noise::<WgpuRuntime, f32, i32, u32>(ln_var_prim, eps_prim);

    Tensor::from_primitive(TensorPrimitive::Float(output))
}

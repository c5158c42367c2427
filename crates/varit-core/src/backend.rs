//! Backend aliases and device initialization.
//!
//! CPU backends are always available and are what the test-suite runs on.
//! The WGPU backends require the `gpu` feature.

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::{Autodiff, NdArray};

pub type CpuBackend = NdArray;

/// CPU backend with burn's autodiff decorator, for gradient-tracked graphs.
pub type CpuAutodiffBackend = Autodiff<CpuBackend>;

pub fn init_cpu_device() -> NdArrayDevice {
    NdArrayDevice::Cpu
}

#[cfg(feature = "gpu")]
pub use gpu::*;

#[cfg(feature = "gpu")]
mod gpu {
    use burn::backend::wgpu::WgpuDevice;
    use burn::backend::Autodiff;

    pub type WgpuBackend = burn::backend::Wgpu;

    pub type WgpuAutodiffBackend = Autodiff<WgpuBackend>;

    /// Raw CubeCL backend without the fusion decorator; fused kernels launch on this.
    pub type CubeWgpuBackend =
        burn::backend::wgpu::CubeBackend<burn::backend::wgpu::WgpuRuntime, f32, i32, u32>;

    pub fn init_gpu_device() -> WgpuDevice {
        // Metal is selected automatically on macOS when available
        WgpuDevice::default()
    }

    pub fn ensure_metal_backend() {
        std::env::set_var("BURN_WGPU_BACKEND", "metal");
    }
}

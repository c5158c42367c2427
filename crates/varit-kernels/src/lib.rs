//! # varit-kernels
//!
//! Compute paths for the Gaussian reparameterization `mean + exp(ln_var / 2) * eps`.
//!
//! The formula is defined once in [`reference`] using plain burn tensor ops and
//! runs on every backend. Backends that can do better implement
//! [`GaussianKernelBackend`], which fuses `exp(ln_var / 2) * eps` into one kernel
//! launch.
//!
//! ## Architecture
//!
//! This crate follows the Burn custom kernel pattern:
//! 1. Define a custom `Backend` extension trait
//! 2. Implement it for `CubeBackend` with the actual GPU kernel
//! 3. Implement it for `Autodiff<B>` with a proper backward pass
//! 4. Keep the reference implementation as the fallback and as the test oracle
//!
//! Gradient formulas shared by every path live in [`autodiff`].

#![cfg_attr(not(feature = "gpu"), allow(unused))]
#![recursion_limit = "256"]

use burn::tensor::backend::Backend as BurnBackend;
use burn::tensor::ops::FloatTensor;

/// Backend extension for the fused Gaussian noise scale.
///
/// GPU backends (`CubeBackend`) implement this with a CubeCL kernel, and
/// `Autodiff<B>` wraps any implementor with the analytic backward pass.
pub trait GaussianKernelBackend: BurnBackend {
    /// Fused `exp(ln_var / 2) * eps`.
    ///
    /// # Arguments
    /// * `ln_var` - Log-variance, any shape
    /// * `eps` - Standard normal noise, same shape as `ln_var`
    ///
    /// # Returns
    /// The scaled noise, same shape as the inputs
    fn gaussian_noise_fused(ln_var: FloatTensor<Self>, eps: FloatTensor<Self>)
        -> FloatTensor<Self>;
}

#[cfg(feature = "gpu")]
pub mod gaussian_noise;

pub mod autodiff;

pub mod reference {
    //! Reference implementations using standard tensor operations.
    //!
    //! Every backend can run these; fused kernels are validated against them.

    use burn::tensor::backend::Backend;
    use burn::tensor::Tensor;

    /// Scaled noise `exp(ln_var * 0.5) * eps`.
    ///
    /// `exp(ln_var / 2)` is the standard deviation since `ln_var = log(variance)`.
    /// Overflow in `exp` is not guarded and shows up as `inf`.
    pub fn scaled_noise<B: Backend, const D: usize>(
        ln_var: Tensor<B, D>,
        eps: Tensor<B, D>,
    ) -> Tensor<B, D> {
        (ln_var * 0.5).exp() * eps
    }

    /// Full reparameterized sample `mean + exp(ln_var * 0.5) * eps`.
    pub fn reparameterize<B: Backend, const D: usize>(
        mean: Tensor<B, D>,
        ln_var: Tensor<B, D>,
        eps: Tensor<B, D>,
    ) -> Tensor<B, D> {
        mean + scaled_noise(ln_var, eps)
    }

}

#[cfg(feature = "gpu")]
mod cube_impl {
    use super::GaussianKernelBackend;
    use burn::tensor::ops::FloatTensor;
    use burn_cubecl::{element::BoolElement, CubeBackend, CubeRuntime, FloatElement, IntElement};

    impl<R: CubeRuntime, F: FloatElement, I: IntElement, BT: BoolElement> GaussianKernelBackend
        for CubeBackend<R, F, I, BT>
    {
        fn gaussian_noise_fused(
            ln_var: FloatTensor<Self>,
            eps: FloatTensor<Self>,
        ) -> FloatTensor<Self> {
            crate::gaussian_noise::launch_gaussian_noise::<R, F, I, BT>(ln_var, eps)
        }
    }
}

#[cfg(feature = "gpu")]
pub use gaussian_noise::gaussian_noise_fused;

pub use autodiff::gaussian::{gaussian_backward, ln_var_grad};

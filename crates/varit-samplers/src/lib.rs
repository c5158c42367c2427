//! # varit-samplers
//!
//! Differentiable sampling operators for variational inference on burn.
//!
//! - **Gaussian reparameterization**: [`Gaussian`] draws `mean + exp(ln_var / 2) * eps`
//!   with a cached `eps` and supplies gradients for both inputs
//! - **Function nodes**: the [`Function`] trait is the explicit forward/backward
//!   calling convention for graph executors
//!
//! ## RNG Key System
//!
//! Deterministic RNG key management (similar to JAX):
//!
//! ```rust
//! use varit_samplers::RngKey;
//!
//! let key = RngKey::new(42);
//! let (key1, key2) = key.split_two();
//! assert_ne!(key1, key2);
//! ```
//!
//! ## Sampling
//!
//! ```rust
//! use burn::tensor::Tensor;
//! use varit_core::backend::{init_cpu_device, CpuBackend};
//! use varit_samplers::{Gaussian, RngKey};
//!
//! let device = init_cpu_device();
//! let mut op = Gaussian::<CpuBackend, 1>::with_key(RngKey::new(0));
//!
//! let mean = Tensor::from_floats([0.0, 1.0], &device);
//! let ln_var = Tensor::zeros([2], &device);
//! let sample = op.forward(mean, ln_var).unwrap();
//!
//! let (d_mean, d_ln_var) = op.backward(Tensor::ones([2], &device)).unwrap();
//! # let _ = (sample, d_mean, d_ln_var);
//! ```

#![recursion_limit = "256"] // Required for burn-wgpu

pub mod function;
pub mod gaussian;
pub mod rng;

pub use function::*;
pub use gaussian::*;
pub use rng::*;

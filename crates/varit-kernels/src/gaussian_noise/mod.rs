//! Fused Gaussian noise kernel for reparameterized sampling.
//!
//! Instead of:
//! 1. Scaling `ln_var` by 0.5
//! 2. Exponentiating
//! 3. Multiplying by `eps`
//!
//! all operations run in a single GPU kernel.

mod backward;
mod forward;
pub mod kernel;

pub use forward::gaussian_noise_fused;
pub use forward::launch_gaussian_noise;

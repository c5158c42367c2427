//! CubeCL kernel definition for the fused Gaussian noise scale.
//!
//! Computes `exp(ln_var / 2) * eps` in a single GPU pass.
//!
//! # Kernel Logic
//!
//! ```ignore
//! for each idx in parallel:
//!     std = exp(0.5 * ln_var[idx])
//!     output[idx] = std * eps[idx]
//! ```
//!
//! The unfused version allocates two intermediates (`ln_var * 0.5` and its `exp`).

use cubecl::{cube, prelude::*};

/// Fused Gaussian noise kernel. Each thread processes one element.
#[cube(launch)]
pub fn gaussian_noise_kernel<F: Float>(
    ln_var: &Tensor<F>,
    eps: &Tensor<F>,
    output: &mut Tensor<F>,
) {
    let idx = ABSOLUTE_POS;

    if idx >= output.len() {
        terminate!();
    }

    let std = F::exp(ln_var[idx] * F::new(0.5));
    output[idx] = std * eps[idx];
}

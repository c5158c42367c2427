//! Backward pass for `sample = mean + exp(ln_var * 0.5) * eps`.
//!
//! With `noise = exp(ln_var * 0.5) * eps`:
//!
//! ```text
//! d_sample/d_mean   = 1
//! d_sample/d_ln_var = 0.5 * exp(ln_var * 0.5) * eps = 0.5 * noise
//! ```

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Gradient with respect to the log-variance: `grad_output * noise * 0.5`.
pub fn ln_var_grad<B: Backend, const D: usize>(
    noise: Tensor<B, D>,
    grad_output: Tensor<B, D>,
) -> Tensor<B, D> {
    grad_output * noise * 0.5
}

/// Gradients `(d_mean, d_ln_var)` for an upstream `grad_output`.
///
/// `noise` must be the scaled noise from the forward pass being differentiated.
pub fn gaussian_backward<B: Backend, const D: usize>(
    noise: Tensor<B, D>,
    grad_output: Tensor<B, D>,
) -> (Tensor<B, D>, Tensor<B, D>) {
    let grad_ln_var = ln_var_grad(noise, grad_output.clone());
    (grad_output, grad_ln_var)
}

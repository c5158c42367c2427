//! Reparameterized Gaussian sampling as a differentiable function node.
//!
//! This module provides [`Gaussian`], which draws
//!
//! ```text
//! sample = mean + exp(ln_var / 2) * eps,    eps ~ N(0, 1)
//! ```
//!
//! and differentiates through the draw by holding `eps` fixed:
//!
//! ```text
//! d_sample/d_mean   = 1
//! d_sample/d_ln_var = 0.5 * exp(ln_var / 2) * eps = 0.5 * noise
//! ```
//!
//! ## Noise caching
//!
//! `eps` is drawn lazily on the first forward call and reused verbatim by every
//! later forward call on the same instance. The scaled `noise` is recomputed on
//! each forward call and kept for the next backward call. Build a new instance
//! to get a fresh draw.
//!
//! ## Graph integration
//!
//! On an autodiff backend (e.g. `Autodiff<NdArray>`) the forward pass is built
//! from tracked tensor ops, so burn derives the same gradients the explicit
//! [`Gaussian::backward`] returns. Executors that drive nodes by hand use the
//! [`Function`] implementation instead.

use crate::function::{check_same_shape, Function};
use crate::rng::RngKey;
use burn::tensor::backend::Backend;
use burn::tensor::{Distribution, Tensor, TensorData, TensorPrimitive};
use varit_core::config::SamplingConfig;
use varit_core::error::{FunctionError, Result};
use varit_kernels::{gaussian_backward, reference, GaussianKernelBackend};

const NAME: &str = "gaussian";

/// Gaussian reparameterization operator with a per-instance noise cache.
///
/// Not meant for concurrent reuse: one instance belongs to one forward/backward
/// pairing at a time.
pub struct Gaussian<B: Backend, const D: usize> {
    /// Seed for a deterministic `eps` draw; the backend RNG is used when `None`.
    key: Option<RngKey>,
    eps: Option<Tensor<B, D>>,
    /// `exp(ln_var / 2) * eps` from the latest forward call, detached.
    noise: Option<Tensor<B, D>>,
}

impl<B: Backend, const D: usize> Gaussian<B, D> {
    /// Operator with an empty noise cache, drawing `eps` from the backend RNG.
    pub fn new() -> Self {
        Gaussian {
            key: None,
            eps: None,
            noise: None,
        }
    }

    /// Operator whose `eps` is drawn deterministically from `key`.
    pub fn with_key(key: RngKey) -> Self {
        Gaussian {
            key: Some(key),
            ..Self::new()
        }
    }

    /// Operator with a caller-provided `eps`.
    ///
    /// The tensor is detached so it never receives gradients.
    pub fn with_eps(eps: Tensor<B, D>) -> Self {
        Gaussian {
            eps: Some(eps.detach()),
            ..Self::new()
        }
    }

    /// Operator seeded from the sampling configuration, if it carries a seed.
    pub fn from_config(config: &SamplingConfig) -> Self {
        match config.seed() {
            Some(seed) => Self::with_key(RngKey::new(seed)),
            None => Self::new(),
        }
    }

    /// The cached standard normal draw, once the first forward call has happened.
    pub fn eps(&self) -> Option<&Tensor<B, D>> {
        self.eps.as_ref()
    }

    /// The scaled noise from the most recent forward call.
    pub fn noise(&self) -> Option<&Tensor<B, D>> {
        self.noise.as_ref()
    }

    /// Verify that `mean` and `ln_var` have the same shape.
    pub fn check_shapes(&self, mean: &Tensor<B, D>, ln_var: &Tensor<B, D>) -> Result<()> {
        check_same_shape(NAME, mean, ln_var)
    }

    /// Draw `mean + exp(ln_var / 2) * eps` using the reference tensor ops.
    ///
    /// Fails with [`FunctionError::ShapeMismatch`] before any computation if the
    /// shapes differ. Overflow in `exp` is not guarded and yields `inf`.
    pub fn forward(&mut self, mean: Tensor<B, D>, ln_var: Tensor<B, D>) -> Result<Tensor<B, D>> {
        self.forward_with(mean, ln_var, reference::scaled_noise)
    }

    /// Gradients `(d_mean, d_ln_var) = (g, g * noise * 0.5)` for the last forward call.
    pub fn backward(&self, grad_output: Tensor<B, D>) -> Result<(Tensor<B, D>, Tensor<B, D>)> {
        let noise = self
            .noise
            .as_ref()
            .ok_or(FunctionError::MissingForward { function: NAME })?;

        if grad_output.dims() != noise.dims() {
            return Err(FunctionError::GradShape {
                function: NAME,
                grad: grad_output.dims().to_vec(),
                output: noise.dims().to_vec(),
            });
        }

        log::trace!("{}: backward {:?}", NAME, grad_output.dims());
        Ok(gaussian_backward(noise.clone(), grad_output))
    }

    /// Shared forward body; `scale` computes `exp(ln_var / 2) * eps`.
    fn forward_with<F>(
        &mut self,
        mean: Tensor<B, D>,
        ln_var: Tensor<B, D>,
        scale: F,
    ) -> Result<Tensor<B, D>>
    where
        F: FnOnce(Tensor<B, D>, Tensor<B, D>) -> Tensor<B, D>,
    {
        self.check_shapes(&mean, &ln_var)?;
        let eps = self.cached_eps(&mean)?;

        log::trace!("{}: forward {:?}", NAME, mean.dims());
        let noise = scale(ln_var, eps);
        self.noise = Some(noise.clone().detach());

        Ok(mean + noise)
    }

    /// Return the cached `eps`, drawing it on first use.
    fn cached_eps(&mut self, mean: &Tensor<B, D>) -> Result<Tensor<B, D>> {
        if let Some(eps) = &self.eps {
            check_same_shape(NAME, mean, eps)?;
            return Ok(eps.clone());
        }

        let eps = self.draw_eps(mean.dims(), &mean.device());
        self.eps = Some(eps.clone());
        Ok(eps)
    }

    fn draw_eps(&self, dims: [usize; D], device: &B::Device) -> Tensor<B, D> {
        match self.key {
            Some(key) => {
                log::debug!("{}: drawing eps {:?} from seed {}", NAME, dims, key.seed());
                let n = dims.iter().product();
                let data = TensorData::new(key.standard_normal(n), dims);
                Tensor::from_data(data, device)
            }
            None => {
                log::debug!("{}: drawing eps {:?} from backend RNG", NAME, dims);
                Tensor::random(dims, Distribution::Normal(0.0, 1.0), device)
            }
        }
    }
}

impl<B: GaussianKernelBackend, const D: usize> Gaussian<B, D> {
    /// Same as [`Gaussian::forward`], computing the noise with the backend's fused kernel.
    pub fn forward_fused(
        &mut self,
        mean: Tensor<B, D>,
        ln_var: Tensor<B, D>,
    ) -> Result<Tensor<B, D>> {
        self.forward_with(mean, ln_var, |ln_var, eps| {
            let noise = B::gaussian_noise_fused(
                ln_var.into_primitive().tensor(),
                eps.into_primitive().tensor(),
            );
            Tensor::from_primitive(TensorPrimitive::Float(noise))
        })
    }
}

impl<B: Backend, const D: usize> Default for Gaussian<B, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend, const D: usize> Function<B, D> for Gaussian<B, D> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn check_inputs(&self, inputs: &[Tensor<B, D>]) -> Result<()> {
        match inputs {
            [mean, ln_var] => self.check_shapes(mean, ln_var),
            _ => Err(FunctionError::InputCount {
                function: NAME,
                expected: 2,
                actual: inputs.len(),
            }),
        }
    }

    fn forward_inputs(&mut self, inputs: Vec<Tensor<B, D>>) -> Result<Vec<Tensor<B, D>>> {
        let [mean, ln_var]: [Tensor<B, D>; 2] =
            inputs
                .try_into()
                .map_err(|inputs: Vec<Tensor<B, D>>| FunctionError::InputCount {
                    function: NAME,
                    expected: 2,
                    actual: inputs.len(),
                })?;

        Ok(vec![self.forward(mean, ln_var)?])
    }

    fn backward_grads(&self, grad_outputs: Vec<Tensor<B, D>>) -> Result<Vec<Tensor<B, D>>> {
        let [grad_output]: [Tensor<B, D>; 1] =
            grad_outputs
                .try_into()
                .map_err(|grads: Vec<Tensor<B, D>>| FunctionError::GradCount {
                    function: NAME,
                    expected: 1,
                    actual: grads.len(),
                })?;

        let (grad_mean, grad_ln_var) = self.backward(grad_output)?;
        Ok(vec![grad_mean, grad_ln_var])
    }
}

/// Draw one reparameterized sample with a fresh operator.
pub fn gaussian<B: Backend, const D: usize>(
    mean: Tensor<B, D>,
    ln_var: Tensor<B, D>,
) -> Result<Tensor<B, D>> {
    Gaussian::new().forward(mean, ln_var)
}

#[cfg(test)]
mod tests {
    use super::*;
    use varit_core::backend::{init_cpu_device, CpuBackend};

    fn to_vec<const D: usize>(t: Tensor<CpuBackend, D>) -> Vec<f32> {
        t.into_data().to_vec().unwrap()
    }

    #[test]
    fn test_unit_variance_scenario() {
        let device = init_cpu_device();
        let eps = Tensor::<CpuBackend, 1>::from_floats([0.5, -0.5], &device);
        let mut op = Gaussian::with_eps(eps);

        let mean = Tensor::from_floats([0.0, 1.0], &device);
        let ln_var = Tensor::zeros([2], &device);
        let sample = op.forward(mean, ln_var).unwrap();
        assert_eq!(to_vec(sample), vec![0.5, 0.5]);

        let (d_mean, d_ln_var) = op.backward(Tensor::ones([2], &device)).unwrap();
        assert_eq!(to_vec(d_mean), vec![1.0, 1.0]);
        assert_eq!(to_vec(d_ln_var), vec![0.25, -0.25]);
    }

    #[test]
    fn test_variance_four_scenario() {
        let device = init_cpu_device();
        let mut op = Gaussian::with_eps(Tensor::<CpuBackend, 1>::from_floats([1.0], &device));

        let sample = op
            .forward(
                Tensor::from_floats([2.0], &device),
                Tensor::from_floats([1.3863], &device),
            )
            .unwrap();

        let sample = to_vec(sample);
        assert!((sample[0] - 4.0).abs() < 1e-3, "sample = {}", sample[0]);
    }

    #[test]
    fn test_shape_mismatch_draws_nothing() {
        let device = init_cpu_device();
        let mut op = Gaussian::<CpuBackend, 2>::with_key(RngKey::new(1));

        let err = op
            .forward(Tensor::zeros([2, 3], &device), Tensor::zeros([3, 2], &device))
            .unwrap_err();

        assert_eq!(
            err,
            FunctionError::ShapeMismatch {
                function: "gaussian",
                lhs: vec![2, 3],
                rhs: vec![3, 2],
            }
        );
        assert!(op.eps().is_none());
        assert!(op.noise().is_none());
    }

    #[test]
    fn test_backward_before_forward() {
        let device = init_cpu_device();
        let op = Gaussian::<CpuBackend, 1>::new();

        let err = op.backward(Tensor::ones([3], &device)).unwrap_err();
        assert_eq!(err, FunctionError::MissingForward { function: "gaussian" });
    }

    #[test]
    fn test_backward_rejects_wrong_gradient_shape() {
        let device = init_cpu_device();
        let mut op = Gaussian::<CpuBackend, 1>::with_key(RngKey::new(5));
        op.forward(Tensor::zeros([3], &device), Tensor::zeros([3], &device))
            .unwrap();

        let err = op.backward(Tensor::ones([4], &device)).unwrap_err();
        assert!(matches!(err, FunctionError::GradShape { .. }));
    }

    #[test]
    fn test_fixed_eps_must_match_input_shape() {
        let device = init_cpu_device();
        let mut op = Gaussian::with_eps(Tensor::<CpuBackend, 1>::zeros([3], &device));

        let err = op
            .forward(Tensor::zeros([2], &device), Tensor::zeros([2], &device))
            .unwrap_err();
        assert!(matches!(err, FunctionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_config_seed_is_deterministic() {
        let device = init_cpu_device();
        let config = SamplingConfig::builder().seed(11).build();

        let mut a = Gaussian::<CpuBackend, 1>::from_config(&config);
        let mut b = Gaussian::<CpuBackend, 1>::from_config(&config);

        let sa = a
            .forward(Tensor::zeros([16], &device), Tensor::zeros([16], &device))
            .unwrap();
        let sb = b
            .forward(Tensor::zeros([16], &device), Tensor::zeros([16], &device))
            .unwrap();

        assert_eq!(to_vec(sa), to_vec(sb));
    }
}

//! # varit-examples utilities
//!
//! Shared helpers for the varit demos: logging setup, a closed-form Gaussian
//! KL divergence, and a small variational fitting loop that trains a mean and
//! log-variance through the reparameterized sampler.

use anyhow::{anyhow, ensure, Context, Result};
use burn::tensor::backend::{AutodiffBackend, Backend};
use burn::tensor::{ElementConversion, Tensor};
use varit_samplers::{Gaussian, RngKey};

/// Install `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
///
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Closed-form `KL(q || p)` between diagonal Gaussians given by mean and log-variance.
///
/// ```text
/// KL = 0.5 * sum(v_p - v_q + (exp(v_q) + (m_q - m_p)^2) / exp(v_p) - 1)
/// ```
pub fn gaussian_kl<B: Backend, const D: usize>(
    mean_q: Tensor<B, D>,
    ln_var_q: Tensor<B, D>,
    mean_p: Tensor<B, D>,
    ln_var_p: Tensor<B, D>,
) -> Tensor<B, 1> {
    let diff = mean_q - mean_p;
    let ratio = (ln_var_q.clone().exp() + diff.clone() * diff) / ln_var_p.clone().exp();
    ((ln_var_p - ln_var_q + ratio - 1.0).sum()) * 0.5
}

/// Settings for [`fit_gaussian`].
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub steps: usize,
    /// Samples drawn per step.
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Seed for the per-step noise; `None` uses the backend RNG.
    pub seed: Option<u64>,
    /// Log progress every N steps (0 disables).
    pub log_every: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig {
            steps: 500,
            batch_size: 64,
            learning_rate: 0.05,
            seed: None,
            log_every: 100,
        }
    }
}

/// Learned parameters after [`fit_gaussian`].
#[derive(Debug, Clone)]
pub struct FitReport {
    pub mean: Vec<f32>,
    pub ln_var: Vec<f32>,
    pub final_loss: f32,
    /// Closed-form KL from the fitted distribution to the target.
    pub kl: f32,
}

/// Fit `q = N(mean, exp(ln_var))` to a diagonal Gaussian target by stochastic
/// gradient descent on a reparameterized estimate of `KL(q || target)`.
///
/// Each step builds a fresh [`Gaussian`] operator (one noise draw per step) and
/// calls `sample` with `mean`/`ln_var` broadcast to `[batch_size, dim]`. The
/// loss is
///
/// ```text
/// mean((z - mu_t)^2 / (2 sigma_t^2)) - 0.5 * mean(ln_var)
/// ```
///
/// which equals the KL up to a constant, so its minimum is the target itself.
pub fn fit_gaussian<B, F>(
    target_mean: &[f32],
    target_std: &[f32],
    config: &FitConfig,
    device: &B::Device,
    mut sample: F,
) -> Result<FitReport>
where
    B: AutodiffBackend,
    F: FnMut(&mut Gaussian<B, 2>, Tensor<B, 2>, Tensor<B, 2>) -> varit_core::Result<Tensor<B, 2>>,
{
    ensure!(
        target_mean.len() == target_std.len(),
        "target mean has {} dims but std has {}",
        target_mean.len(),
        target_std.len()
    );
    ensure!(!target_mean.is_empty(), "target must have at least one dim");
    ensure!(
        target_std.iter().all(|&s| s > 0.0),
        "target std must be positive"
    );
    ensure!(config.batch_size > 0, "batch size must be positive");

    let dim = target_mean.len();
    let batch = config.batch_size;

    let target_ln_var: Vec<f32> = target_std.iter().map(|s| 2.0 * s.ln()).collect();
    let mu_t: Tensor<B, 2> = Tensor::<B, 1>::from_data(target_mean, device).unsqueeze();
    let ln_var_t: Tensor<B, 2> =
        Tensor::<B, 1>::from_data(target_ln_var.as_slice(), device).unsqueeze();
    let inv_two_var = (ln_var_t.clone().exp() * 2.0).recip();

    let mut mean: Tensor<B, 1> = Tensor::zeros([dim], device).require_grad();
    let mut ln_var: Tensor<B, 1> = Tensor::zeros([dim], device).require_grad();
    let mut key = config.seed.map(RngKey::new);
    let mut final_loss = f32::NAN;

    for step in 0..config.steps {
        let mut op = match key {
            Some(k) => {
                let (step_key, next) = k.split_two();
                key = Some(next);
                Gaussian::with_key(step_key)
            }
            None => Gaussian::new(),
        };

        let m = mean.clone().unsqueeze::<2>().repeat_dim(0, batch);
        let v = ln_var.clone().unsqueeze::<2>().repeat_dim(0, batch);
        let z = sample(&mut op, m, v).context("reparameterized sample failed")?;

        let diff = z - mu_t.clone();
        let nll = (diff.clone() * diff * inv_two_var.clone()).mean();
        let loss = nll - ln_var.clone().mean() * 0.5;
        final_loss = loss.clone().into_scalar().elem::<f32>();

        let grads = loss.backward();
        let grad_mean = mean.grad(&grads).context("mean has no gradient")?;
        let grad_ln_var = ln_var.grad(&grads).context("ln_var has no gradient")?;

        mean = Tensor::from_inner(mean.inner() - grad_mean * config.learning_rate).require_grad();
        ln_var =
            Tensor::from_inner(ln_var.inner() - grad_ln_var * config.learning_rate).require_grad();

        if config.log_every > 0 && step % config.log_every == 0 {
            log::info!("step {:>5}  loss {:.5}", step, final_loss);
        }
    }

    let kl = gaussian_kl(
        mean.clone().inner(),
        ln_var.clone().inner(),
        mu_t.inner().reshape([dim]),
        ln_var_t.inner().reshape([dim]),
    )
    .into_scalar()
    .elem::<f32>();

    Ok(FitReport {
        mean: mean
            .into_data()
            .to_vec()
            .map_err(|e| anyhow!("read fitted mean: {:?}", e))?,
        ln_var: ln_var
            .into_data()
            .to_vec()
            .map_err(|e| anyhow!("read fitted ln_var: {:?}", e))?,
        final_loss,
        kl,
    })
}

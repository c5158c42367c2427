//! Fit a diagonal Gaussian by backpropagating through reparameterized samples.
//!
//! A variational distribution `q = N(mean, exp(ln_var))` starts at `N(0, 1)` and
//! is trained with SGD until it matches the target. Every step draws its noise
//! through the `Gaussian` operator, so gradients reach both `mean` and `ln_var`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example fit_gaussian --release -- \
//!   --target-mean 2.0,-1.0 \
//!   --target-std 0.5,1.5 \
//!   --steps 1000 \
//!   --seed 42
//!
//! # Fused GPU kernel path
//! cargo run --example fit_gaussian --release --features gpu -- --fused true
//! ```

use anyhow::{bail, Result};
use clap::Parser;
use varit_core::backend::{init_cpu_device, CpuAutodiffBackend};
use varit_core::config::{SamplingArgs, SamplingConfig};
use varit_examples::{fit_gaussian, init_logging, FitConfig, FitReport};

#[derive(Parser)]
#[command(name = "fit_gaussian")]
#[command(
    author,
    version,
    about = "Fit a diagonal Gaussian through the reparameterization trick"
)]
struct Args {
    /// Target means, comma separated
    #[arg(long, value_delimiter = ',', default_value = "2.0,-1.0")]
    target_mean: Vec<f32>,

    /// Target standard deviations, comma separated
    #[arg(long, value_delimiter = ',', default_value = "0.5,1.5")]
    target_std: Vec<f32>,

    /// Number of SGD steps
    #[arg(long, default_value = "1000")]
    steps: usize,

    /// Samples per step
    #[arg(short, long, default_value = "64")]
    batch_size: usize,

    /// Learning rate
    #[arg(long, default_value = "0.05")]
    lr: f64,

    /// Log every N steps
    #[arg(long, default_value = "100")]
    log_every: usize,

    #[command(flatten)]
    sampling: SamplingArgs,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    if args.target_mean.len() != args.target_std.len() {
        bail!(
            "--target-mean has {} values but --target-std has {}",
            args.target_mean.len(),
            args.target_std.len()
        );
    }

    let sampling = SamplingConfig::from_sampling_args(args.sampling.clone());
    sampling.log_summary();

    let config = FitConfig {
        steps: args.steps,
        batch_size: args.batch_size,
        learning_rate: args.lr,
        seed: sampling.seed(),
        log_every: args.log_every,
    };

    println!("=== Gaussian Reparameterization Fit ===\n");
    println!("Target mean: {:?}", args.target_mean);
    println!("Target std:  {:?}\n", args.target_std);

    let report = run(&args, &config, &sampling)?;

    let std: Vec<f32> = report.ln_var.iter().map(|v| (0.5 * v).exp()).collect();
    println!("Fitted mean: {:?}", report.mean);
    println!("Fitted std:  {:?}", std);
    println!("Final loss:  {:.5}", report.final_loss);
    println!("KL(q || target): {:.6}", report.kl);

    Ok(())
}

#[cfg(not(feature = "gpu"))]
fn run(args: &Args, config: &FitConfig, sampling: &SamplingConfig) -> Result<FitReport> {
    if sampling.fused_kernels() {
        log::warn!("fused kernels requested but built without the `gpu` feature; using reference path");
    }
    run_cpu(args, config)
}

#[cfg(feature = "gpu")]
fn run(args: &Args, config: &FitConfig, sampling: &SamplingConfig) -> Result<FitReport> {
    use burn::backend::Autodiff;
    use varit_core::backend::{init_gpu_device, CubeWgpuBackend};

    if !sampling.fused_kernels() {
        return run_cpu(args, config);
    }

    log::info!("running fused Gaussian kernel on WGPU");
    let device = init_gpu_device();
    fit_gaussian::<Autodiff<CubeWgpuBackend>, _>(
        &args.target_mean,
        &args.target_std,
        config,
        &device,
        |op, mean, ln_var| op.forward_fused(mean, ln_var),
    )
}

fn run_cpu(args: &Args, config: &FitConfig) -> Result<FitReport> {
    let device = init_cpu_device();
    fit_gaussian::<CpuAutodiffBackend, _>(
        &args.target_mean,
        &args.target_std,
        config,
        &device,
        |op, mean, ln_var| op.forward(mean, ln_var),
    )
}

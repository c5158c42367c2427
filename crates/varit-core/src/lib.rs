//! # varit-core
//!
//! Shared foundations for the varit crates:
//!
//! - [`backend`]: burn backend aliases and device initialization (CPU always, WGPU with `gpu`)
//! - [`config`]: layered sampling configuration (CLI > env > file > defaults)
//! - [`error`]: the [`FunctionError`] type returned by differentiable function nodes
//!
//! ```rust,ignore
//! use varit_core::backend::{init_cpu_device, CpuBackend};
//!
//! let device = init_cpu_device();
//! let x = burn::tensor::Tensor::<CpuBackend, 1>::zeros([4], &device);
//! ```

#![recursion_limit = "256"] // Required for burn-wgpu

pub mod backend;
pub mod config;
pub mod error;

pub use backend::*;
pub use config::*;
pub use error::*;

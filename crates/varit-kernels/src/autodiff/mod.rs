//! Gradient formulas for the Gaussian reparameterization.
//!
//! These operate on high-level tensors so that explicit function nodes and
//! the `Autodiff<B>` integration share one definition.

pub mod gaussian;

//! Autodiff support for the fused Gaussian noise kernel.
//!
//! For `noise = exp(ln_var / 2) * eps` with `eps` held constant:
//!
//! ```text
//! d_noise/d_ln_var = 0.5 * exp(ln_var / 2) * eps = 0.5 * noise
//! ```
//!
//! so the backward pass only needs the forward output as state. `eps` receives
//! no gradient.

use crate::GaussianKernelBackend;
use burn::tensor::backend::Backend;
use burn::tensor::ops::FloatTensor;
use burn::tensor::ElementConversion;
use burn_autodiff::{
    checkpoint::{base::Checkpointer, strategy::CheckpointStrategy},
    grads::Gradients,
    ops::{Backward, Ops, OpsKind},
    Autodiff,
};

#[derive(Debug)]
struct GaussianNoiseBackward;

impl<B: Backend> Backward<B, 1> for GaussianNoiseBackward {
    // The forward output, `noise`
    type State = FloatTensor<B>;

    fn backward(
        self,
        ops: Ops<Self::State, 1>,
        grads: &mut Gradients,
        _checkpointer: &mut Checkpointer,
    ) {
        let [node_ln_var] = ops.parents;
        let grad_output = grads.consume::<B>(&ops.node);

        if let Some(node) = node_ln_var {
            let grad_ln_var =
                B::float_mul_scalar(B::float_mul(grad_output, ops.state), 0.5.elem());
            grads.register::<B>(node.id, grad_ln_var);
        }
    }
}

impl<B: GaussianKernelBackend, C: CheckpointStrategy> GaussianKernelBackend for Autodiff<B, C> {
    fn gaussian_noise_fused(
        ln_var: FloatTensor<Self>,
        eps: FloatTensor<Self>,
    ) -> FloatTensor<Self> {
        let output = B::gaussian_noise_fused(ln_var.primitive.clone(), eps.primitive);

        match GaussianNoiseBackward
            .prepare::<C>([ln_var.node.clone()])
            .compute_bound()
            .stateful()
        {
            OpsKind::Tracked(prep) => prep.finish(output.clone(), output),
            OpsKind::UnTracked(prep) => prep.finish(output),
        }
    }
}

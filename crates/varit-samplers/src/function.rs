use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use varit_core::error::{FunctionError, Result};

/// A differentiable function node with explicit forward and backward passes.
///
/// This is the calling convention a graph executor uses: inputs arrive as a
/// list, are type-checked, run forward, and later the executor hands back one
/// upstream gradient per output and receives one gradient per input.
///
/// Nodes may cache state between `forward_inputs` and `backward_grads`, so
/// one instance must not be driven from several graphs at once. The `&mut self`
/// receivers enforce that at compile time.
pub trait Function<B: Backend, const D: usize> {
    /// Name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Validate the inputs before any numeric work.
    fn check_inputs(&self, inputs: &[Tensor<B, D>]) -> Result<()>;

    /// Forward pass on already-checked inputs.
    fn forward_inputs(&mut self, inputs: Vec<Tensor<B, D>>) -> Result<Vec<Tensor<B, D>>>;

    /// Gradients with respect to each input, given one upstream gradient per output.
    fn backward_grads(&self, grad_outputs: Vec<Tensor<B, D>>) -> Result<Vec<Tensor<B, D>>>;

    /// Type-check then run forward. Inputs are consumed and not retained.
    fn apply(&mut self, inputs: Vec<Tensor<B, D>>) -> Result<Vec<Tensor<B, D>>> {
        self.check_inputs(&inputs)?;
        self.forward_inputs(inputs)
    }

    /// Alias of [`Function::backward_grads`] mirroring [`Function::apply`].
    fn apply_backward(&self, grad_outputs: Vec<Tensor<B, D>>) -> Result<Vec<Tensor<B, D>>> {
        self.backward_grads(grad_outputs)
    }
}

/// Fail with [`FunctionError::ShapeMismatch`] unless both tensors share a shape.
pub fn check_same_shape<B: Backend, const D: usize>(
    function: &'static str,
    lhs: &Tensor<B, D>,
    rhs: &Tensor<B, D>,
) -> Result<()> {
    let (lhs, rhs) = (lhs.dims(), rhs.dims());
    if lhs != rhs {
        return Err(FunctionError::ShapeMismatch {
            function,
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        });
    }
    Ok(())
}

//! Errors raised by differentiable function nodes.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FunctionError>;

/// Failure of a function node invocation.
///
/// Type-check failures are raised before any numeric work happens and are
/// fatal to that invocation only; the node can be called again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    #[error("{function}: expected {expected} inputs, got {actual}")]
    InputCount {
        function: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{function}: input shapes differ, {lhs:?} vs {rhs:?}")]
    ShapeMismatch {
        function: &'static str,
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },

    #[error("{function}: expected {expected} output gradients, got {actual}")]
    GradCount {
        function: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{function}: gradient shape {grad:?} does not match output shape {output:?}")]
    GradShape {
        function: &'static str,
        grad: Vec<usize>,
        output: Vec<usize>,
    },

    #[error("{function}: backward called before forward")]
    MissingForward { function: &'static str },
}

impl FunctionError {
    /// True for errors raised by input validation ahead of the forward pass.
    pub fn is_type_check(&self) -> bool {
        matches!(
            self,
            FunctionError::InputCount { .. } | FunctionError::ShapeMismatch { .. }
        )
    }
}

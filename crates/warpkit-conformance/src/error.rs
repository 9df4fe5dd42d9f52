use warpkit_image::ImageError;
use warpkit_imgproc::KernelError;
use warpkit_tensor::TensorError;
use warpkit_transforms::TransformError;

/// A broken contract found by one of the checks.
#[derive(thiserror::Error, Debug)]
pub enum ContractViolation {
    /// A named check failed.
    #[error("{check}: {message}")]
    Failed {
        /// Name of the check
        check: &'static str,
        /// What went wrong
        message: String,
    },

    /// Two tensors differ beyond the tolerance.
    #[error("values differ at flat index {index}: {actual} vs {expected} (rtol = {rtol}, atol = {atol})")]
    NotClose {
        /// Flat index of the first mismatch
        index: usize,
        /// Value found
        actual: f64,
        /// Value expected
        expected: f64,
        /// Relative tolerance
        rtol: f64,
        /// Absolute tolerance
        atol: f64,
    },

    /// Error raised by the code under test.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Error raised by a kernel under test.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// Error raised while building inputs.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error raised while building tensors.
    #[error(transparent)]
    Tensor(#[from] TensorError),
}

impl ContractViolation {
    /// Creates a [`ContractViolation::Failed`].
    pub fn failed(check: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            check,
            message: message.into(),
        }
    }
}

/// Returns a [`ContractViolation::Failed`] unless the condition holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $check:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::ContractViolation::failed($check, format!($($arg)+)));
        }
    };
}

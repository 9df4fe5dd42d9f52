use warpkit_image::ImageError;
use warpkit_imgproc::KernelError;

use crate::dispatch::KernelId;

/// An error type for dispatchers and transforms.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TransformError {
    /// The input is not a recognized datapoint kind.
    #[error("{0}")]
    InvalidType(String),

    /// A malformed parameter, detected before any kernel runs.
    #[error("{0}")]
    InvalidArgument(String),

    /// A compiled kernel was invoked through the entry point of another kernel.
    #[error("Compiled kernel {actual} cannot be invoked as {expected}")]
    KernelMismatch {
        /// The kernel the caller asked for
        expected: KernelId,
        /// The kernel that was compiled
        actual: KernelId,
    },

    /// Error raised by a kernel.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// Error raised while wrapping a kernel output.
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl TransformError {
    /// Returns true for malformed parameters, whether the dispatcher or the kernel caught them.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            TransformError::InvalidArgument(_) => true,
            TransformError::Kernel(err) => err.is_invalid_argument(),
            _ => false,
        }
    }

    /// Returns true if the input type was not recognized.
    pub fn is_invalid_type(&self) -> bool {
        matches!(self, TransformError::InvalidType(_))
    }
}

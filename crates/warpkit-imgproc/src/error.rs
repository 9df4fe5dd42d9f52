use warpkit_image::ImageError;
use warpkit_tensor::TensorError;

use crate::interpolation::InterpolationMode;

/// An error type for the transform kernels.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum KernelError {
    /// A malformed argument, detected before any computation.
    #[error("{0}")]
    InvalidArgument(String),

    /// The interpolation mode has no implementation for this input representation.
    #[error("Unsupported interpolation mode for {backend} inputs: got {mode}")]
    UnsupportedInterpolation {
        /// The requested mode
        mode: InterpolationMode,
        /// The input representation
        backend: &'static str,
    },

    /// The external resampling engine rejected the request.
    #[error("Resampling backend failed: {0}")]
    Backend(String),

    /// Error from the datapoint layer.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the tensor layer.
    #[error(transparent)]
    Tensor(#[from] TensorError),
}

impl KernelError {
    /// Returns true for malformed arguments.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, KernelError::InvalidArgument(_))
    }
}

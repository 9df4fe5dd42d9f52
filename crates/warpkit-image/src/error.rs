use warpkit_tensor::TensorError;

/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// A spatial size with a zero edge.
    #[error("Invalid spatial size: height ({0}) and width ({1}) must be positive")]
    InvalidSpatialSize(usize, usize),

    /// The tensor has too few dimensions for the datapoint kind.
    #[error("{kind} expects at least {min_ndim} dimensions, got shape {shape:?}")]
    InvalidShape {
        /// The datapoint kind being built
        kind: &'static str,
        /// Minimum number of dimensions
        min_ndim: usize,
        /// Offending shape
        shape: Vec<usize>,
    },

    /// Bounding boxes must have a trailing dimension of 4.
    #[error("Bounding boxes must have shape [..., 4], got {0:?}")]
    InvalidBoundingBoxShape(Vec<usize>),

    /// The number of channels cannot be represented by the image library.
    #[error("Cannot convert an image with {0} channels, expected 1, 2, 3 or 4")]
    UnsupportedChannels(usize),

    /// The `image` crate color type has no lossless counterpart.
    #[error("Unsupported color type {0}")]
    UnsupportedColorType(String),

    /// The value is not one of the datapoint kinds.
    #[error("Unsupported input type {0}")]
    UnsupportedType(&'static str),

    /// Error from the tensor layer.
    #[error(transparent)]
    Tensor(#[from] TensorError),
}

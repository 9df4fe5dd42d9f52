#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the kernels.
pub mod error;

/// Bounding box format conversion and clamping.
pub mod format;

/// Output size arithmetic and 2D affine helpers.
pub mod geometry;

/// Interpolation modes and the separable resampling primitive.
pub mod interpolation;

/// module containing parallization utilities.
pub mod parallel;

/// Resize kernels, one per datapoint kind.
pub mod resize;

pub use crate::error::KernelError;

#![deny(missing_docs)]
//! Datapoint types for geometric transforms.
//!
//! Every datapoint pairs a [`warpkit_tensor::Tensor`] with the metadata its kind
//! needs. The closed [`Datapoint`] enum is what dispatchers match on.

/// Bounding boxes and their coordinate formats.
pub mod bounding_box;

/// The closed set of datapoint kinds.
pub mod datapoint;

/// Error types for the image module.
pub mod error;

/// Image, video and mask containers.
pub mod image;

/// Conversion boundary to the `image` crate representation.
pub mod pil;

pub use crate::bounding_box::{BoundingBoxFormat, BoundingBoxes};
pub use crate::datapoint::{get_spatial_size, DataKind, Datapoint};
pub use crate::error::ImageError;
pub use crate::image::{Image, Mask, SpatialSize, Video};
pub use crate::pil::{to_image_pil, to_image_tensor};

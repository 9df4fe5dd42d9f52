//! Resize kernels, one per datapoint kind.
//!
//! Every kernel takes its input by reference, computes the output size with
//! [`crate::geometry::compute_output_size`] and returns a new value. When the
//! output size equals the input size the kernel returns the input unchanged
//! (a tensor sharing the same storage, or the borrowed `image` crate image).
//!
//! Tensor kernels accept any number of leading dimensions and treat them as a
//! batch of planes. The `*_with` variants take a [`crate::interpolation::Resampler`]
//! so that a caller can memoize axis plans across calls.

mod bounding_box;
mod pil;
mod tensor;

pub use bounding_box::resize_bounding_boxes;
pub use pil::resize_image_pil;
pub use tensor::{
    resize_image, resize_image_with, resize_mask, resize_mask_with, resize_video,
    resize_video_with,
};

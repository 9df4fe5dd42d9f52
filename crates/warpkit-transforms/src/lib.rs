#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! A dispatcher accepts any [`warpkit_image::Datapoint`], reports the call to the
//! telemetry sink, routes to the kernel registered for the datapoint kind and
//! rewraps the result as the same kind. Transform objects such as
//! [`transform::Resize`] hold validated parameters and call the dispatcher.
//!
//! ```rust
//! use warpkit_image::{Datapoint, Image};
//! use warpkit_imgproc::interpolation::InterpolationMode;
//! use warpkit_tensor::Tensor;
//! use warpkit_transforms::dispatch;
//!
//! let image = Image::new(Tensor::<u8>::zeros(&[3, 17, 11])).unwrap();
//! let out = dispatch::resize(
//!     Datapoint::from(image),
//!     12usize,
//!     InterpolationMode::Bilinear,
//!     None,
//!     Some(true),
//! )
//! .unwrap();
//!
//! assert_eq!(out.spatial_size().unwrap().height, 18);
//! ```

/// Memoized kernels for the lowered execution path.
pub mod compiled;

/// Dispatchers, the kernel table and the signature table.
pub mod dispatch;

/// Error types for the transforms crate.
pub mod error;

/// Telemetry sink and warnings.
pub mod telemetry;

/// Transform objects.
pub mod transform;

/// Legacy tensor-only transforms.
pub mod v1;

pub use crate::error::TransformError;
pub use crate::transform::{GetParams, LegacyCompatible, LegacyTransform, Resize, Transform};

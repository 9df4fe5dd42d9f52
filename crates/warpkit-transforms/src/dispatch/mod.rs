//! Dispatchers route a datapoint to the kernel registered for its kind.
//!
//! Every dispatcher call
//!
//! 1. reports itself once through [`crate::telemetry::log_api_usage_once`],
//! 2. looks up the kernel of the datapoint kind in [`KERNEL_TABLE`],
//! 3. unwraps the datapoint, runs the kernel and rewraps the output as the
//!    same kind with the metadata updated.
//!
//! [`resize_compiled`] does the same through the memoized kernels of
//! [`crate::compiled`].

mod table;

use std::any::{type_name, Any};
use std::borrow::Cow;
use std::sync::Arc;

use warpkit_image::{DataKind, Datapoint, ImageError};
use warpkit_imgproc::{
    geometry::{SizeArg, SizeSpec},
    interpolation::InterpolationMode,
    resize,
};
use warpkit_tensor::Element;

pub use table::{
    kernel_for, KernelId, Signature, DATAPOINT_RESIZE_SIGNATURE, KERNEL_TABLE,
    RESIZE_BOUNDING_BOXES_SIGNATURE, RESIZE_IMAGE_PIL_SIGNATURE, RESIZE_IMAGE_SIGNATURE,
    RESIZE_MASK_SIGNATURE, RESIZE_SIGNATURE, RESIZE_VIDEO_SIGNATURE,
};

use crate::compiled::{self, CompiledKernel};
use crate::error::TransformError;
use crate::telemetry::{self, TransformWarning};

/// The api name reported by the resize dispatchers.
pub const RESIZE_API: &str = "warpkit_transforms::dispatch::resize";

#[derive(Clone)]
enum Lowering {
    Eager,
    Compiled(Arc<CompiledKernel>),
}

impl Lowering {
    fn for_kernel(compiled: bool, id: KernelId) -> Self {
        if compiled {
            Lowering::Compiled(compiled::compile(id))
        } else {
            Lowering::Eager
        }
    }
}

fn route<R>(
    id: KernelId,
    run: impl FnOnce() -> Result<R, TransformError>,
) -> Result<R, TransformError> {
    telemetry::report_kernel(id.name());
    run()
}

fn check_antialias(kind: DataKind, interpolation: InterpolationMode, antialias: Option<bool>) {
    match kind {
        DataKind::Tensor | DataKind::Image | DataKind::Video
            if antialias.is_none() && interpolation.is_antialiasable() =>
        {
            telemetry::warn(TransformWarning::AntialiasDefault)
        }
        DataKind::Pil if antialias == Some(false) => {
            telemetry::warn(TransformWarning::PilAntialiasIgnored)
        }
        _ => {}
    }
}

pub(crate) fn resize_impl<T: Element>(
    input: Datapoint<T>,
    size: SizeSpec,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
    antialias: Option<bool>,
    compiled: bool,
) -> Result<Datapoint<T>, TransformError> {
    let kind = input.kind();
    let id = kernel_for(kind)
        .ok_or_else(|| TransformError::InvalidType(format!("no resize kernel for {kind}")))?;

    check_antialias(kind, interpolation, antialias);
    let antialias = antialias.unwrap_or(false);
    let lowering = Lowering::for_kernel(compiled, id);

    let image_kernel = |t: &warpkit_tensor::Tensor<T>| {
        route(id, || match &lowering {
            Lowering::Eager => Ok(resize::resize_image(
                t,
                size,
                interpolation,
                max_size,
                antialias,
            )?),
            Lowering::Compiled(k) => k.resize_image(t, size, interpolation, max_size, antialias),
        })
    };

    let output = match input {
        Datapoint::Tensor(tensor) => Datapoint::Tensor(image_kernel(&tensor)?),
        Datapoint::Image(image) => {
            let out = image_kernel(image.as_tensor())?;
            Datapoint::Image(image.wrap_like(out)?)
        }
        Datapoint::Video(video) => {
            let out = route(id, || match &lowering {
                Lowering::Eager => Ok(resize::resize_video(
                    video.as_tensor(),
                    size,
                    interpolation,
                    max_size,
                    antialias,
                )?),
                Lowering::Compiled(k) => {
                    k.resize_video(video.as_tensor(), size, interpolation, max_size, antialias)
                }
            })?;
            Datapoint::Video(video.wrap_like(out)?)
        }
        Datapoint::Mask(mask) => {
            let out = route(id, || match &lowering {
                Lowering::Eager => Ok(resize::resize_mask(mask.as_tensor(), size, max_size)?),
                Lowering::Compiled(k) => k.resize_mask(mask.as_tensor(), size, max_size),
            })?;
            Datapoint::Mask(mask.wrap_like(out)?)
        }
        Datapoint::BoundingBoxes(boxes) => {
            let (out, new_size) = route(id, || match &lowering {
                Lowering::Eager => Ok(resize::resize_bounding_boxes(
                    boxes.as_tensor(),
                    boxes.format(),
                    boxes.spatial_size(),
                    size,
                    max_size,
                )?),
                Lowering::Compiled(k) => k.resize_bounding_boxes(
                    boxes.as_tensor(),
                    boxes.format(),
                    boxes.spatial_size(),
                    size,
                    max_size,
                ),
            })?;
            Datapoint::BoundingBoxes(boxes.wrap_like(out, Some(new_size))?)
        }
        Datapoint::Pil(image) => {
            let resized = route(id, || {
                let out = match &lowering {
                    Lowering::Eager => {
                        resize::resize_image_pil(&image, size, interpolation, max_size)?
                    }
                    Lowering::Compiled(k) => {
                        k.resize_image_pil(&image, size, interpolation, max_size)?
                    }
                };
                Ok(match out {
                    Cow::Borrowed(_) => None,
                    Cow::Owned(out) => Some(out),
                })
            })?;
            Datapoint::Pil(resized.unwrap_or(image))
        }
    };

    Ok(output)
}

/// Resize any datapoint.
///
/// # Arguments
///
/// * `input` - The datapoint. Plain tensors are treated as images.
/// * `size` - An integer or a one element sequence for the shorter edge, or `[h, w]`.
/// * `interpolation` - The interpolation mode. Masks always use nearest.
/// * `max_size` - Optional cap on the longer output edge.
/// * `antialias` - Antialias bilinear and bicubic downsampling. `None` warns for
///   tensor backed images and counts as `false`.
///
/// # Returns
///
/// A datapoint of the same kind. Bounding boxes keep their format and get the
/// new spatial size. If the size does not change the input comes back as is.
///
/// # Errors
///
/// [`TransformError::InvalidArgument`] for a malformed `size` and the kernel
/// errors for everything caught later.
///
/// # Example
///
/// ```
/// use warpkit_image::{BoundingBoxFormat, BoundingBoxes, Datapoint, SpatialSize};
/// use warpkit_imgproc::interpolation::InterpolationMode;
/// use warpkit_tensor::Tensor;
/// use warpkit_transforms::dispatch;
///
/// let boxes = BoundingBoxes::new(
///     Tensor::from_shape_vec(&[1, 4], vec![1.0f32, 1.0, 5.0, 9.0]).unwrap(),
///     BoundingBoxFormat::Xyxy,
///     SpatialSize::new(17, 11).unwrap(),
/// )
/// .unwrap();
///
/// let out = dispatch::resize(
///     Datapoint::from(boxes),
///     [12usize, 13],
///     InterpolationMode::Bilinear,
///     None,
///     None,
/// )
/// .unwrap();
///
/// let Datapoint::BoundingBoxes(out) = out else { unreachable!() };
/// assert_eq!(out.format(), BoundingBoxFormat::Xyxy);
/// assert_eq!(out.spatial_size(), SpatialSize::new(12, 13).unwrap());
/// ```
pub fn resize<T: Element>(
    input: Datapoint<T>,
    size: impl Into<SizeArg>,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
    antialias: Option<bool>,
) -> Result<Datapoint<T>, TransformError> {
    telemetry::log_api_usage_once(RESIZE_API);
    let size = SizeSpec::parse(size)?;
    resize_impl(input, size, interpolation, max_size, antialias, false)
}

/// [`resize`] through the compiled kernels.
///
/// Produces the same output as [`resize`]; axis plans are reused across calls.
pub fn resize_compiled<T: Element>(
    input: Datapoint<T>,
    size: impl Into<SizeArg>,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
    antialias: Option<bool>,
) -> Result<Datapoint<T>, TransformError> {
    telemetry::log_api_usage_once(RESIZE_API);
    let size = SizeSpec::parse(size)?;
    resize_impl(input, size, interpolation, max_size, antialias, true)
}

/// [`resize`] for a value of unknown type.
///
/// # Errors
///
/// Returns [`TransformError::InvalidType`] naming the type of `input` if it is
/// not a datapoint, a tensor of `T` or an `image` crate image.
///
/// ```
/// use warpkit_imgproc::interpolation::InterpolationMode;
/// use warpkit_transforms::dispatch::resize_any;
///
/// let err = resize_any::<u8, _>(42i32, 4usize, InterpolationMode::Nearest, None, None)
///     .unwrap_err();
/// assert!(err.is_invalid_type());
/// assert!(err.to_string().contains("i32"));
/// ```
pub fn resize_any<T: Element, I: Any>(
    input: I,
    size: impl Into<SizeArg>,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
    antialias: Option<bool>,
) -> Result<Datapoint<T>, TransformError> {
    telemetry::log_api_usage_once(RESIZE_API);
    let input = Datapoint::<T>::from_any(input).map_err(|err| match err {
        ImageError::UnsupportedType(name) => TransformError::InvalidType(format!(
            "Input can either be a plain tensor, any datapoint kind or an image crate image, \
             but got {name} instead."
        )),
        other => TransformError::Image(other),
    })?;
    let size = SizeSpec::parse(size)?;
    resize_impl(input, size, interpolation, max_size, antialias, false)
}

/// Resize as a method of the datapoint.
///
/// Runs the registered kernel directly; no api usage is reported.
pub trait ResizeExt: Sized {
    /// See [`resize`].
    fn resize(
        self,
        size: impl Into<SizeArg>,
        interpolation: InterpolationMode,
        max_size: Option<usize>,
        antialias: Option<bool>,
    ) -> Result<Self, TransformError>;
}

impl<T: Element> ResizeExt for Datapoint<T> {
    fn resize(
        self,
        size: impl Into<SizeArg>,
        interpolation: InterpolationMode,
        max_size: Option<usize>,
        antialias: Option<bool>,
    ) -> Result<Self, TransformError> {
        let size = SizeSpec::parse(size)?;
        resize_impl(self, size, interpolation, max_size, antialias, false)
    }
}

/// Name of the input type as reported in [`TransformError::InvalidType`].
pub fn input_type_name<I>() -> &'static str {
    type_name::<I>()
}

use warpkit_image::SpatialSize;
use warpkit_tensor::{Element, Tensor};

use crate::error::KernelError;
use crate::geometry::{compute_output_size, SizeSpec};
use crate::interpolation::{resample::resample_plane, AxisKey, InterpolationMode, Resampler};
use crate::parallel::par_iter_planes;

fn resize_planes<T: Element>(
    resampler: Resampler<'_>,
    kind: &'static str,
    src: &Tensor<T>,
    size: SizeSpec,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
    antialias: bool,
) -> Result<Tensor<T>, KernelError> {
    if !interpolation.is_tensor_supported() {
        return Err(KernelError::UnsupportedInterpolation {
            mode: interpolation,
            backend: "tensor",
        });
    }

    let input_size = SpatialSize::from_shape(kind, src.shape())?;
    let output_size = compute_output_size(input_size, size, max_size)?;
    if output_size == input_size {
        return Ok(src.clone());
    }

    let (batch, _) = src.split_batch(2)?;
    let antialias = antialias && interpolation.is_antialiasable();
    log::debug!(
        "resizing {batch} {kind} planes {input_size} -> {output_size} with {interpolation} ({resampler} plans)"
    );

    let rows = resampler.axis(AxisKey {
        input: input_size.height,
        output: output_size.height,
        mode: interpolation,
        antialias,
    })?;
    let cols = resampler.axis(AxisKey {
        input: input_size.width,
        output: output_size.width,
        mode: interpolation,
        antialias,
    })?;

    let src_plane = input_size.height * input_size.width;
    let dst_plane = output_size.height * output_size.width;
    let mut data = vec![T::default(); batch * dst_plane];

    par_iter_planes(
        src.device(),
        src.as_slice(),
        src_plane,
        &mut data,
        dst_plane,
        |src_chunk, dst_chunk| {
            resample_plane(
                src_chunk,
                input_size,
                dst_chunk,
                output_size,
                &rows,
                &cols,
            )
        },
    );

    let mut shape = src.shape().to_vec();
    let ndim = shape.len();
    shape[ndim - 2] = output_size.height;
    shape[ndim - 1] = output_size.width;

    Ok(Tensor::from_shape_vec(&shape, data)?.with_device(src.device()))
}

/// Resize a tensor image.
///
/// # Arguments
///
/// * `image` - The input with shape `[..., C, H, W]` (at least `[H, W]`).
/// * `size` - The requested size.
/// * `interpolation` - One of the tensor modes (nearest, nearest-exact, bilinear, bicubic).
/// * `max_size` - Optional cap on the longer output edge.
/// * `antialias` - Widen the bilinear and bicubic filters when downsampling.
///
/// # Returns
///
/// The resized tensor, with the same leading dimensions, element type and device.
///
/// # Errors
///
/// Returns [`KernelError::UnsupportedInterpolation`] for the box, hamming and
/// lanczos modes and [`KernelError::InvalidArgument`] for invalid sizes.
///
/// # Example
///
/// ```
/// use warpkit_imgproc::geometry::SizeSpec;
/// use warpkit_imgproc::interpolation::InterpolationMode;
/// use warpkit_imgproc::resize::resize_image;
/// use warpkit_tensor::Tensor;
///
/// let image = Tensor::<u8>::zeros(&[2, 3, 17, 11]);
/// let resized = resize_image(
///     &image,
///     SizeSpec::Shorter(12),
///     InterpolationMode::Bilinear,
///     None,
///     true,
/// )
/// .unwrap();
///
/// assert_eq!(resized.shape(), &[2, 3, 18, 12]);
/// ```
pub fn resize_image<T: Element>(
    image: &Tensor<T>,
    size: SizeSpec,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
    antialias: bool,
) -> Result<Tensor<T>, KernelError> {
    resize_image_with(
        Resampler::Direct,
        image,
        size,
        interpolation,
        max_size,
        antialias,
    )
}

/// [`resize_image`] with an explicit plan source.
pub fn resize_image_with<T: Element>(
    resampler: Resampler<'_>,
    image: &Tensor<T>,
    size: SizeSpec,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
    antialias: bool,
) -> Result<Tensor<T>, KernelError> {
    resize_planes(
        resampler,
        "image",
        image,
        size,
        interpolation,
        max_size,
        antialias,
    )
}

/// Resize a video of shape `[..., T, C, H, W]`.
///
/// Frames are independent planes, so this is [`resize_image`] applied to every frame.
pub fn resize_video<T: Element>(
    video: &Tensor<T>,
    size: SizeSpec,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
    antialias: bool,
) -> Result<Tensor<T>, KernelError> {
    resize_video_with(
        Resampler::Direct,
        video,
        size,
        interpolation,
        max_size,
        antialias,
    )
}

/// [`resize_video`] with an explicit plan source.
pub fn resize_video_with<T: Element>(
    resampler: Resampler<'_>,
    video: &Tensor<T>,
    size: SizeSpec,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
    antialias: bool,
) -> Result<Tensor<T>, KernelError> {
    resize_planes(
        resampler,
        "video",
        video,
        size,
        interpolation,
        max_size,
        antialias,
    )
}

/// Resize a segmentation mask of shape `[..., H, W]`.
///
/// Masks hold labels, so they are always resampled with nearest neighbor.
pub fn resize_mask<T: Element>(
    mask: &Tensor<T>,
    size: SizeSpec,
    max_size: Option<usize>,
) -> Result<Tensor<T>, KernelError> {
    resize_mask_with(Resampler::Direct, mask, size, max_size)
}

/// [`resize_mask`] with an explicit plan source.
pub fn resize_mask_with<T: Element>(
    resampler: Resampler<'_>,
    mask: &Tensor<T>,
    size: SizeSpec,
    max_size: Option<usize>,
) -> Result<Tensor<T>, KernelError> {
    resize_planes(
        resampler,
        "mask",
        mask,
        size,
        InterpolationMode::Nearest,
        max_size,
        false,
    )
}

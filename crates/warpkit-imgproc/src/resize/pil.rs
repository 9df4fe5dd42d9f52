use std::borrow::Cow;

use fast_image_resize as fr;
use image::DynamicImage;
use warpkit_image::{pil::pil_spatial_size, ImageError};

use crate::error::KernelError;
use crate::geometry::{compute_output_size, SizeSpec};
use crate::interpolation::InterpolationMode;

fn resize_alg(interpolation: InterpolationMode) -> fr::ResizeAlg {
    match interpolation {
        InterpolationMode::Nearest | InterpolationMode::NearestExact => fr::ResizeAlg::Nearest,
        InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        InterpolationMode::Bicubic => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
        InterpolationMode::Box => fr::ResizeAlg::Convolution(fr::FilterType::Box),
        InterpolationMode::Hamming => fr::ResizeAlg::Convolution(fr::FilterType::Hamming),
        InterpolationMode::Lanczos => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
    }
}

fn to_u32(value: usize) -> Result<u32, KernelError> {
    u32::try_from(value).map_err(|_| {
        KernelError::InvalidArgument(format!("image dimension {value} does not fit in u32"))
    })
}

/// Resize an `image` crate image using the [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// The output keeps the color type of the input. 8 and 16 bit luma, luma alpha,
/// RGB and RGBA images are supported; alpha channels are resized premultiplied.
/// The convolution modes always filter with the full downsampling support, so
/// there is no `antialias` argument.
///
/// # Arguments
///
/// * `image` - The input image.
/// * `size` - The requested size.
/// * `interpolation` - Any interpolation mode, including box, hamming and lanczos.
/// * `max_size` - Optional cap on the longer output edge.
///
/// # Returns
///
/// The input itself when the size does not change, otherwise a new image.
///
/// # Errors
///
/// Floating point color types fail with [`ImageError::UnsupportedColorType`].
///
/// # Example
///
/// ```
/// use image::{DynamicImage, RgbImage};
/// use warpkit_imgproc::geometry::SizeSpec;
/// use warpkit_imgproc::interpolation::InterpolationMode;
/// use warpkit_imgproc::resize::resize_image_pil;
///
/// let image = DynamicImage::ImageRgb8(RgbImage::new(11, 17));
/// let resized = resize_image_pil(
///     &image,
///     SizeSpec::Shorter(5),
///     InterpolationMode::Lanczos,
///     None,
/// )
/// .unwrap();
///
/// assert_eq!((resized.width(), resized.height()), (5, 7));
/// ```
pub fn resize_image_pil<'a>(
    image: &'a DynamicImage,
    size: SizeSpec,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
) -> Result<Cow<'a, DynamicImage>, KernelError> {
    let input_size = pil_spatial_size(image);
    let output_size = compute_output_size(input_size, size, max_size)?;
    if output_size == input_size {
        return Ok(Cow::Borrowed(image));
    }

    let color = image.color();
    if fr::IntoImageView::pixel_type(image).is_none() {
        return Err(ImageError::UnsupportedColorType(format!("{color:?}")).into());
    }

    // the output image has the same color type as the input
    let (dst_width, dst_height) = (to_u32(output_size.width)?, to_u32(output_size.height)?);
    let mut resized = DynamicImage::new(dst_width, dst_height, color);

    log::debug!(
        "resizing {color:?} image {}x{} -> {dst_width}x{dst_height} with {interpolation}",
        input_size.width,
        input_size.height,
    );

    let options = fr::ResizeOptions::new().resize_alg(resize_alg(interpolation));
    let mut resizer = fr::Resizer::new();
    resizer
        .resize(image, &mut resized, &options)
        .map_err(|e| KernelError::Backend(e.to_string()))?;

    Ok(Cow::Owned(resized))
}

//! Every factory draws from its own generator seeded with a fixed value, so the
//! same call always returns the same data.

use image::{
    DynamicImage, GrayAlphaImage, GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use warpkit_image::{BoundingBoxFormat, BoundingBoxes, Image, ImageError, Mask, SpatialSize, Video};
use warpkit_imgproc::format::convert_format;
use warpkit_tensor::{DType, Element, Tensor};

use crate::error::ContractViolation;

const SEED: u64 = 0x5eed;

fn rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

fn random_tensor<T: Element>(rng: &mut StdRng, shape: &[usize]) -> Result<Tensor<T>, ContractViolation> {
    let numel = shape.iter().product::<usize>();
    let data = (0..numel)
        .map(|_| {
            let value = match T::DTYPE {
                DType::Bool => f64::from(u8::from(rng.random_bool(0.5))),
                DType::U8 | DType::I64 => f64::from(rng.random_range(0u8..=255)),
                DType::F32 | DType::F64 => rng.random::<f64>(),
            };
            T::from_f64(value)
        })
        .collect();
    Ok(Tensor::from_shape_vec(shape, data)?)
}

/// A random `[*batch_dims, channels, H, W]` image.
///
/// Integral images span `0..=255`, float images `[0, 1)`.
pub fn make_image<T: Element>(
    size: SpatialSize,
    channels: usize,
    batch_dims: &[usize],
) -> Result<Image<T>, ContractViolation> {
    let shape = [batch_dims, &[channels, size.height, size.width]].concat();
    Ok(Image::new(random_tensor(&mut rng(), &shape)?)?)
}

/// A random `[*batch_dims, num_frames, channels, H, W]` video.
pub fn make_video<T: Element>(
    size: SpatialSize,
    num_frames: usize,
    channels: usize,
    batch_dims: &[usize],
) -> Result<Video<T>, ContractViolation> {
    let shape = [batch_dims, &[num_frames, channels, size.height, size.width]].concat();
    Ok(Video::new(random_tensor(&mut rng(), &shape)?)?)
}

/// A `[*batch_dims, H, W]` mask of labels in `0..num_categories`.
pub fn make_segmentation_mask(
    size: SpatialSize,
    num_categories: u8,
    batch_dims: &[usize],
) -> Result<Mask<u8>, ContractViolation> {
    if num_categories == 0 {
        return Err(ContractViolation::failed(
            "make_segmentation_mask",
            "a segmentation mask needs at least one category",
        ));
    }
    let mut rng = rng();
    let shape = [batch_dims, &[size.height, size.width]].concat();
    let numel = shape.iter().product::<usize>();
    let data = (0..numel)
        .map(|_| rng.random_range(0..num_categories))
        .collect();
    Ok(Mask::new(Tensor::from_shape_vec(&shape, data)?)?)
}

/// A `[*batch_dims, num_objects, H, W]` boolean mask, one plane per object.
pub fn make_detection_mask(
    size: SpatialSize,
    num_objects: usize,
    batch_dims: &[usize],
) -> Result<Mask<bool>, ContractViolation> {
    let shape = [batch_dims, &[num_objects, size.height, size.width]].concat();
    Ok(Mask::new(random_tensor(&mut rng(), &shape)?)?)
}

/// Picks an integral span inside `0..=extent` with an even length when `extent`
/// allows one, so its center is integral too.
fn even_span(rng: &mut StdRng, extent: usize) -> (usize, usize) {
    if extent < 2 {
        return (0, extent);
    }
    let start = rng.random_range(0..extent - 1);
    let half = rng.random_range(1..=(extent - start) / 2);
    (start, start + 2 * half)
}

/// Random `[*batch_dims, num_boxes, 4]` boxes that lie inside `spatial_size`.
///
/// Corners are integral and sides even, so every format is exact in every element
/// type. A frame edge of one pixel only fits a box of odd side, whose center is
/// half integral.
pub fn make_bounding_boxes<T: Element>(
    spatial_size: SpatialSize,
    format: BoundingBoxFormat,
    num_boxes: usize,
    batch_dims: &[usize],
) -> Result<BoundingBoxes<T>, ContractViolation> {
    let mut rng = rng();
    let shape = [batch_dims, &[num_boxes, 4]].concat();
    let count = shape.iter().product::<usize>() / 4;

    let mut data = Vec::with_capacity(count * 4);
    for _ in 0..count {
        let (x1, x2) = even_span(&mut rng, spatial_size.width);
        let (y1, y2) = even_span(&mut rng, spatial_size.height);
        let xyxy = [x1 as f64, y1 as f64, x2 as f64, y2 as f64];
        data.extend(
            convert_format(xyxy, BoundingBoxFormat::Xyxy, format)
                .into_iter()
                .map(T::from_f64),
        );
    }

    Ok(BoundingBoxes::new(
        Tensor::from_shape_vec(&shape, data)?,
        format,
        spatial_size,
    )?)
}

/// A random `image` crate image with 1 (luma), 2 (luma alpha), 3 (RGB) or 4 (RGBA)
/// channels.
pub fn make_image_pil(size: SpatialSize, channels: usize) -> Result<DynamicImage, ContractViolation> {
    let mut rng = rng();
    let (width, height) = (size.width as u32, size.height as u32);
    match channels {
        1 => Ok(DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |_, _| {
            Luma([rng.random()])
        }))),
        2 => Ok(DynamicImage::ImageLumaA8(GrayAlphaImage::from_fn(
            width,
            height,
            |_, _| LumaA([rng.random(), rng.random()]),
        ))),
        3 => Ok(DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, _| {
            Rgb([rng.random(), rng.random(), rng.random()])
        }))),
        4 => Ok(DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |_, _| {
            Rgba([rng.random(), rng.random(), rng.random(), rng.random()])
        }))),
        n => Err(ImageError::UnsupportedChannels(n).into()),
    }
}

/// A smooth RGB gradient, for comparisons against other resampling libraries.
///
/// Smooth content keeps differences in rounding and fixed point arithmetic small.
pub fn make_smooth_image_pil(size: SpatialSize) -> DynamicImage {
    let (width, height) = (size.width as u32, size.height as u32);
    let fx = 255.0 / size.width.max(2).saturating_sub(1) as f64;
    let fy = 255.0 / size.height.max(2).saturating_sub(1) as f64;
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let gx = x as f64 * fx;
        let gy = y as f64 * fy;
        Rgb([
            gx.round() as u8,
            gy.round() as u8,
            ((gx + gy) / 2.0).round() as u8,
        ])
    }))
}

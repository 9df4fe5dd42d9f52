use ::image::{DynamicImage, GenericImageView, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use warpkit_tensor::Tensor;

use crate::{error::ImageError, image::Image, image::SpatialSize};

/// Spatial size of an `image` crate image.
pub fn pil_spatial_size(image: &DynamicImage) -> SpatialSize {
    let (width, height) = image.dimensions();
    SpatialSize::from((height as usize, width as usize))
}

/// Converts an `image` crate image into a `[C, H, W]` tensor image.
///
/// Luma, luma alpha, RGB and RGBA images become 1, 2, 3 and 4 channels.
///
/// # Errors
///
/// Color types that do not fit in 8 bits fail with
/// [`ImageError::UnsupportedColorType`].
///
/// ```
/// use image::{DynamicImage, RgbImage};
/// use warpkit_image::to_image_tensor;
///
/// let pil = DynamicImage::ImageRgb8(RgbImage::new(4, 2));
/// let image = to_image_tensor(&pil).unwrap();
/// assert_eq!(image.shape(), &[3, 2, 4]);
/// ```
pub fn to_image_tensor(image: &DynamicImage) -> Result<Image<u8>, ImageError> {
    let (channels, raw) = match image {
        DynamicImage::ImageLuma8(buf) => (1, buf.as_raw().clone()),
        DynamicImage::ImageLumaA8(buf) => (2, buf.as_raw().clone()),
        DynamicImage::ImageRgb8(buf) => (3, buf.as_raw().clone()),
        DynamicImage::ImageRgba8(buf) => (4, buf.as_raw().clone()),
        other => {
            return Err(ImageError::UnsupportedColorType(format!(
                "{:?}",
                other.color()
            )))
        }
    };
    let size = pil_spatial_size(image);
    let plane = size.height * size.width;

    // interleaved HWC to planar CHW
    let mut data = vec![0u8; raw.len()];
    for (i, pixel) in raw.chunks_exact(channels).enumerate() {
        for (c, &value) in pixel.iter().enumerate() {
            data[c * plane + i] = value;
        }
    }

    Image::new(Tensor::from_shape_vec(
        &[channels, size.height, size.width],
        data,
    )?)
}

/// Converts an unbatched `[C, H, W]` tensor image into an `image` crate image.
///
/// # Errors
///
/// Fails for batched images and for channel counts other than 1, 2, 3 or 4.
pub fn to_image_pil(image: &Image<u8>) -> Result<DynamicImage, ImageError> {
    if image.ndim() != 3 {
        return Err(ImageError::InvalidShape {
            kind: "PIL image",
            min_ndim: 3,
            shape: image.shape().to_vec(),
        });
    }
    let channels = image.num_channels();
    let size = image.size();
    let plane = size.height * size.width;
    let src = image.as_slice();

    let mut raw = vec![0u8; src.len()];
    for c in 0..channels {
        for i in 0..plane {
            raw[i * channels + c] = src[c * plane + i];
        }
    }

    let (width, height) = (size.width as u32, size.height as u32);
    let converted = match channels {
        1 => GrayImage::from_raw(width, height, raw).map(DynamicImage::ImageLuma8),
        2 => GrayAlphaImage::from_raw(width, height, raw).map(DynamicImage::ImageLumaA8),
        3 => RgbImage::from_raw(width, height, raw).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(width, height, raw).map(DynamicImage::ImageRgba8),
        n => return Err(ImageError::UnsupportedChannels(n)),
    };
    converted.ok_or(ImageError::UnsupportedChannels(channels))
}

#[cfg(test)]
mod tests {
    use super::{pil_spatial_size, to_image_pil, to_image_tensor};
    use crate::{Image, ImageError, SpatialSize};
    use image::{ColorType, DynamicImage, GenericImageView, Rgb, RgbImage};
    use warpkit_tensor::Tensor;

    #[test]
    fn chw_layout() -> Result<(), ImageError> {
        let mut rgb = RgbImage::new(2, 1);
        rgb.put_pixel(0, 0, Rgb([1, 2, 3]));
        rgb.put_pixel(1, 0, Rgb([4, 5, 6]));
        let image = to_image_tensor(&DynamicImage::ImageRgb8(rgb))?;
        assert_eq!(image.shape(), &[3, 1, 2]);
        assert_eq!(image.as_slice(), &[1, 4, 2, 5, 3, 6]);
        Ok(())
    }

    #[test]
    fn lossless_both_ways() -> Result<(), ImageError> {
        let data: Vec<u8> = (0..3 * 5 * 4).map(|x| x as u8).collect();
        let image = Image::new(Tensor::from_shape_vec(&[3, 5, 4], data)?)?;
        let pil = to_image_pil(&image)?;
        assert_eq!(pil.dimensions(), (4, 5));
        assert_eq!(pil_spatial_size(&pil), SpatialSize::from((5, 4)));
        let back = to_image_tensor(&pil)?;
        assert_eq!(back.as_slice(), image.as_slice());
        Ok(())
    }

    #[test]
    fn gray_roundtrip() -> Result<(), ImageError> {
        let image = Image::new(Tensor::from_shape_vec(&[1, 2, 2], vec![0u8, 64, 128, 255])?)?;
        let pil = to_image_pil(&image)?;
        assert!(matches!(pil, DynamicImage::ImageLuma8(_)));
        assert_eq!(to_image_tensor(&pil)?.as_slice(), image.as_slice());
        Ok(())
    }

    #[test]
    fn alpha_roundtrip() -> Result<(), ImageError> {
        for (channels, color) in [(2, ColorType::La8), (4, ColorType::Rgba8)] {
            let data: Vec<u8> = (0..channels * 3 * 2).map(|x| (x * 7) as u8).collect();
            let image = Image::new(Tensor::from_shape_vec(&[channels, 3, 2], data)?)?;
            let pil = to_image_pil(&image)?;
            assert_eq!(pil.color(), color);
            assert_eq!(to_image_tensor(&pil)?.as_slice(), image.as_slice());
        }
        Ok(())
    }

    #[test]
    fn rejects_lossy_conversions() -> Result<(), ImageError> {
        let batched = Image::new(Tensor::<u8>::zeros(&[2, 3, 4, 4]))?;
        assert!(to_image_pil(&batched).is_err());
        let five = Image::new(Tensor::<u8>::zeros(&[5, 4, 4]))?;
        assert_eq!(to_image_pil(&five).unwrap_err(), ImageError::UnsupportedChannels(5));
        for color in [ColorType::L16, ColorType::Rgba16, ColorType::Rgb32F] {
            let err = to_image_tensor(&DynamicImage::new(4, 4, color)).unwrap_err();
            assert!(matches!(err, ImageError::UnsupportedColorType(_)));
        }
        Ok(())
    }
}

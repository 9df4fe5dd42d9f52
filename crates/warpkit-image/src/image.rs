use std::ops;

use warpkit_tensor::{Element, Tensor};

use crate::error::ImageError;

/// Spatial size of a frame in pixels, in (height, width) order.
///
/// # Examples
///
/// ```
/// use warpkit_image::SpatialSize;
///
/// let size = SpatialSize::new(17, 11).unwrap();
/// assert_eq!(size.height, 17);
/// assert_eq!(size.width, 11);
/// assert!(SpatialSize::new(0, 4).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialSize {
    /// Height of the frame in pixels
    pub height: usize,
    /// Width of the frame in pixels
    pub width: usize,
}

impl SpatialSize {
    /// Creates a spatial size, rejecting zero edges.
    pub fn new(height: usize, width: usize) -> Result<Self, ImageError> {
        if height == 0 || width == 0 {
            return Err(ImageError::InvalidSpatialSize(height, width));
        }
        Ok(Self { height, width })
    }

    /// Reads the size from the two trailing dimensions of a shape.
    pub fn from_shape(kind: &'static str, shape: &[usize]) -> Result<Self, ImageError> {
        match shape {
            [.., height, width] => Self::new(*height, *width),
            _ => Err(ImageError::InvalidShape {
                kind,
                min_ndim: 2,
                shape: shape.to_vec(),
            }),
        }
    }

    /// The shorter of the two edges.
    pub fn min_edge(&self) -> usize {
        self.height.min(self.width)
    }

    /// The longer of the two edges.
    pub fn max_edge(&self) -> usize {
        self.height.max(self.width)
    }
}

impl std::fmt::Display for SpatialSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "SpatialSize {{ height: {}, width: {} }}",
            self.height, self.width
        )
    }
}

impl From<(usize, usize)> for SpatialSize {
    fn from((height, width): (usize, usize)) -> Self {
        SpatialSize { height, width }
    }
}

impl From<SpatialSize> for (usize, usize) {
    fn from(size: SpatialSize) -> Self {
        (size.height, size.width)
    }
}

macro_rules! tensor_datapoint {
    ($(#[$meta:meta])* $name:ident, $label:literal, $min_ndim:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name<T>(Tensor<T>);

        /// helper to deference the inner tensor
        impl<T> ops::Deref for $name<T> {
            type Target = Tensor<T>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<T: Element> $name<T> {
            /// Wraps a tensor, validating its rank and spatial size.
            ///
            /// # Errors
            ///
            /// Fails if the tensor has too few dimensions or a zero spatial edge.
            pub fn new(tensor: Tensor<T>) -> Result<Self, ImageError> {
                if tensor.ndim() < $min_ndim {
                    return Err(ImageError::InvalidShape {
                        kind: $label,
                        min_ndim: $min_ndim,
                        shape: tensor.shape().to_vec(),
                    });
                }
                SpatialSize::from_shape($label, tensor.shape())?;
                Ok(Self(tensor))
            }

            /// Wraps `tensor` as the same kind as `self`.
            pub fn wrap_like(&self, tensor: Tensor<T>) -> Result<Self, ImageError> {
                Self::new(tensor)
            }

            /// Spatial size read from the two trailing dimensions.
            pub fn size(&self) -> SpatialSize {
                let shape = self.0.shape();
                SpatialSize::from((shape[shape.len() - 2], shape[shape.len() - 1]))
            }

            /// Borrows the underlying tensor.
            pub fn as_tensor(&self) -> &Tensor<T> {
                &self.0
            }

            /// Unwraps the underlying tensor.
            pub fn into_inner(self) -> Tensor<T> {
                self.0
            }
        }
    };
}

tensor_datapoint!(
    /// An image with shape `[..., C, H, W]`.
    ///
    /// ```
    /// use warpkit_image::Image;
    /// use warpkit_tensor::Tensor;
    ///
    /// let image = Image::new(Tensor::<u8>::zeros(&[3, 17, 11])).unwrap();
    /// assert_eq!(image.size().height, 17);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    Image,
    "Image",
    3
);

tensor_datapoint!(
    /// A video clip with shape `[..., T, C, H, W]`.
    Video,
    "Video",
    4
);

tensor_datapoint!(
    /// A segmentation or detection mask with shape `[..., H, W]`.
    Mask,
    "Mask",
    2
);

impl<T: Element> Image<T> {
    /// Number of channels, the third dimension from the end.
    pub fn num_channels(&self) -> usize {
        self.0.shape()[self.0.ndim() - 3]
    }
}

impl<T: Element> Video<T> {
    /// Number of frames, the fourth dimension from the end.
    pub fn num_frames(&self) -> usize {
        self.0.shape()[self.0.ndim() - 4]
    }
}

#[cfg(test)]
mod tests {
    use super::{Image, Mask, SpatialSize, Video};
    use crate::ImageError;
    use warpkit_tensor::Tensor;

    #[test]
    fn spatial_size_edges() -> Result<(), ImageError> {
        let size = SpatialSize::new(17, 11)?;
        assert_eq!(size.min_edge(), 11);
        assert_eq!(size.max_edge(), 17);
        assert_eq!(<(usize, usize)>::from(size), (17, 11));
        Ok(())
    }

    #[test]
    fn image_requires_channels() {
        let err = Image::new(Tensor::<u8>::zeros(&[17, 11])).unwrap_err();
        assert!(matches!(err, ImageError::InvalidShape { min_ndim: 3, .. }));
    }

    #[test]
    fn image_rejects_empty_frame() {
        let err = Image::new(Tensor::<u8>::zeros(&[3, 0, 11])).unwrap_err();
        assert_eq!(err, ImageError::InvalidSpatialSize(0, 11));
    }

    #[test]
    fn video_and_mask() -> Result<(), ImageError> {
        let video = Video::new(Tensor::<u8>::zeros(&[4, 3, 17, 11]))?;
        assert_eq!(video.num_frames(), 4);
        assert_eq!(video.size(), SpatialSize::from((17, 11)));

        let mask = Mask::new(Tensor::<bool>::zeros(&[17, 11]))?;
        assert_eq!(mask.size().width, 11);
        assert!(Mask::new(Tensor::<bool>::zeros(&[11])).is_err());
        Ok(())
    }

    #[test]
    fn image_batched() -> Result<(), ImageError> {
        let image = Image::new(Tensor::<f32>::zeros(&[2, 1, 3, 5, 4]))?;
        assert_eq!(image.num_channels(), 3);
        assert_eq!(image.size(), SpatialSize::from((5, 4)));
        Ok(())
    }
}

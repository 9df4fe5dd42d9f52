use std::any::Any;

use ::image::DynamicImage;
use warpkit_tensor::{Element, Tensor};

use crate::{
    bounding_box::BoundingBoxes,
    error::ImageError,
    image::{Image, Mask, SpatialSize, Video},
    pil::pil_spatial_size,
};

/// Tag naming the kind of a datapoint.
///
/// Assigned when the datapoint is built and preserved by every transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// A plain tensor, treated as an image.
    Tensor,
    /// An [`Image`].
    Image,
    /// A set of [`BoundingBoxes`].
    BoundingBoxes,
    /// A [`Mask`].
    Mask,
    /// A [`Video`].
    Video,
    /// An `image` crate image.
    Pil,
}

impl DataKind {
    /// All kinds, in declaration order.
    pub const ALL: [DataKind; 6] = [
        DataKind::Tensor,
        DataKind::Image,
        DataKind::BoundingBoxes,
        DataKind::Mask,
        DataKind::Video,
        DataKind::Pil,
    ];

    /// Metadata the datapoint carries itself and which kernels take explicitly.
    pub fn metadata_fields(&self) -> &'static [&'static str] {
        match self {
            DataKind::BoundingBoxes => &["format", "spatial_size"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Any input a transform accepts.
#[derive(Clone, Debug)]
pub enum Datapoint<T> {
    /// A plain tensor with shape `[..., C, H, W]`.
    Tensor(Tensor<T>),
    /// An image.
    Image(Image<T>),
    /// Bounding boxes.
    BoundingBoxes(BoundingBoxes<T>),
    /// A mask.
    Mask(Mask<T>),
    /// A video.
    Video(Video<T>),
    /// An `image` crate image. Always 8-bit, whatever `T` is.
    Pil(DynamicImage),
}

impl<T: Element> Datapoint<T> {
    /// The kind tag of this datapoint.
    pub fn kind(&self) -> DataKind {
        match self {
            Datapoint::Tensor(_) => DataKind::Tensor,
            Datapoint::Image(_) => DataKind::Image,
            Datapoint::BoundingBoxes(_) => DataKind::BoundingBoxes,
            Datapoint::Mask(_) => DataKind::Mask,
            Datapoint::Video(_) => DataKind::Video,
            Datapoint::Pil(_) => DataKind::Pil,
        }
    }

    /// The tensor behind the datapoint, if it has one.
    pub fn as_tensor(&self) -> Option<&Tensor<T>> {
        match self {
            Datapoint::Tensor(t) => Some(t),
            Datapoint::Image(image) => Some(image.as_tensor()),
            Datapoint::BoundingBoxes(boxes) => Some(boxes.as_tensor()),
            Datapoint::Mask(mask) => Some(mask.as_tensor()),
            Datapoint::Video(video) => Some(video.as_tensor()),
            Datapoint::Pil(_) => None,
        }
    }

    /// Spatial size of the frame the datapoint lives in.
    pub fn spatial_size(&self) -> Result<SpatialSize, ImageError> {
        match self {
            Datapoint::Tensor(t) => SpatialSize::from_shape("Tensor", t.shape()),
            Datapoint::Image(image) => Ok(image.size()),
            Datapoint::BoundingBoxes(boxes) => Ok(boxes.spatial_size()),
            Datapoint::Mask(mask) => Ok(mask.size()),
            Datapoint::Video(video) => Ok(video.size()),
            Datapoint::Pil(image) => Ok(pil_spatial_size(image)),
        }
    }

    /// Builds a datapoint from a value of unknown type.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::UnsupportedType`] naming `I` when it is not one of the
    /// datapoint types.
    ///
    /// ```
    /// use warpkit_image::{DataKind, Datapoint, ImageError};
    /// use warpkit_tensor::Tensor;
    ///
    /// let dp = Datapoint::<u8>::from_any(Tensor::<u8>::zeros(&[3, 4, 4])).unwrap();
    /// assert_eq!(dp.kind(), DataKind::Tensor);
    ///
    /// let err = Datapoint::<u8>::from_any("not an image").unwrap_err();
    /// assert_eq!(err, ImageError::UnsupportedType("&str"));
    /// ```
    pub fn from_any<I: Any>(input: I) -> Result<Self, ImageError> {
        let boxed: Box<dyn Any> = Box::new(input);
        let boxed = match boxed.downcast::<Datapoint<T>>() {
            Ok(dp) => return Ok(*dp),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Tensor<T>>() {
            Ok(t) => return Ok(Datapoint::Tensor(*t)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Image<T>>() {
            Ok(image) => return Ok(Datapoint::Image(*image)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<BoundingBoxes<T>>() {
            Ok(boxes) => return Ok(Datapoint::BoundingBoxes(*boxes)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Mask<T>>() {
            Ok(mask) => return Ok(Datapoint::Mask(*mask)),
            Err(other) => other,
        };
        let boxed = match boxed.downcast::<Video<T>>() {
            Ok(video) => return Ok(Datapoint::Video(*video)),
            Err(other) => other,
        };
        match boxed.downcast::<DynamicImage>() {
            Ok(image) => Ok(Datapoint::Pil(*image)),
            Err(_) => Err(ImageError::UnsupportedType(std::any::type_name::<I>())),
        }
    }
}

impl<T> From<Tensor<T>> for Datapoint<T> {
    fn from(t: Tensor<T>) -> Self {
        Datapoint::Tensor(t)
    }
}

impl<T> From<Image<T>> for Datapoint<T> {
    fn from(image: Image<T>) -> Self {
        Datapoint::Image(image)
    }
}

impl<T> From<BoundingBoxes<T>> for Datapoint<T> {
    fn from(boxes: BoundingBoxes<T>) -> Self {
        Datapoint::BoundingBoxes(boxes)
    }
}

impl<T> From<Mask<T>> for Datapoint<T> {
    fn from(mask: Mask<T>) -> Self {
        Datapoint::Mask(mask)
    }
}

impl<T> From<Video<T>> for Datapoint<T> {
    fn from(video: Video<T>) -> Self {
        Datapoint::Video(video)
    }
}

impl<T> From<DynamicImage> for Datapoint<T> {
    fn from(image: DynamicImage) -> Self {
        Datapoint::Pil(image)
    }
}

/// Spatial size of any datapoint.
pub fn get_spatial_size<T: Element>(input: &Datapoint<T>) -> Result<SpatialSize, ImageError> {
    input.spatial_size()
}

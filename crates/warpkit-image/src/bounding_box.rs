use std::ops;

use warpkit_tensor::{Element, Tensor};

use crate::{error::ImageError, image::SpatialSize};

/// Coordinate convention of a bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundingBoxFormat {
    /// Corner pair `(x1, y1, x2, y2)`.
    Xyxy,
    /// Top-left corner plus size `(x, y, w, h)`.
    Xywh,
    /// Center plus size `(cx, cy, w, h)`.
    Cxcywh,
}

impl BoundingBoxFormat {
    /// All formats, in declaration order.
    pub const ALL: [BoundingBoxFormat; 3] = [
        BoundingBoxFormat::Xyxy,
        BoundingBoxFormat::Xywh,
        BoundingBoxFormat::Cxcywh,
    ];
}

impl std::fmt::Display for BoundingBoxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BoundingBoxFormat::Xyxy => "XYXY",
            BoundingBoxFormat::Xywh => "XYWH",
            BoundingBoxFormat::Cxcywh => "CXCYWH",
        };
        write!(f, "{name}")
    }
}

/// Bounding boxes with shape `[..., 4]`, tagged with their format and the frame
/// they live in.
///
/// ```
/// use warpkit_image::{BoundingBoxFormat, BoundingBoxes, SpatialSize};
/// use warpkit_tensor::Tensor;
///
/// let boxes = BoundingBoxes::new(
///     Tensor::from_shape_vec(&[1, 4], vec![1.0f32, 2.0, 5.0, 8.0]).unwrap(),
///     BoundingBoxFormat::Xyxy,
///     SpatialSize::new(17, 11).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(boxes.num_boxes(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct BoundingBoxes<T> {
    data: Tensor<T>,
    format: BoundingBoxFormat,
    spatial_size: SpatialSize,
}

impl<T> ops::Deref for BoundingBoxes<T> {
    type Target = Tensor<T>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T: Element> BoundingBoxes<T> {
    /// Wraps a `[..., 4]` tensor.
    pub fn new(
        data: Tensor<T>,
        format: BoundingBoxFormat,
        spatial_size: SpatialSize,
    ) -> Result<Self, ImageError> {
        if data.shape().last() != Some(&4) {
            return Err(ImageError::InvalidBoundingBoxShape(data.shape().to_vec()));
        }
        let spatial_size = SpatialSize::new(spatial_size.height, spatial_size.width)?;
        Ok(Self {
            data,
            format,
            spatial_size,
        })
    }

    /// Wraps `data` with the format of `self` and an optionally updated frame.
    pub fn wrap_like(
        &self,
        data: Tensor<T>,
        spatial_size: Option<SpatialSize>,
    ) -> Result<Self, ImageError> {
        Self::new(data, self.format, spatial_size.unwrap_or(self.spatial_size))
    }

    /// The coordinate format.
    pub fn format(&self) -> BoundingBoxFormat {
        self.format
    }

    /// The frame the boxes refer to.
    pub fn spatial_size(&self) -> SpatialSize {
        self.spatial_size
    }

    /// Number of boxes across all leading dimensions.
    pub fn num_boxes(&self) -> usize {
        self.data.numel() / 4
    }

    /// Borrows the underlying tensor.
    pub fn as_tensor(&self) -> &Tensor<T> {
        &self.data
    }

    /// Unwraps into the tensor and its metadata.
    pub fn into_parts(self) -> (Tensor<T>, BoundingBoxFormat, SpatialSize) {
        (self.data, self.format, self.spatial_size)
    }
}

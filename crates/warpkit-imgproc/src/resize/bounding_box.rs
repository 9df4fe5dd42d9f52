use warpkit_image::{BoundingBoxFormat, SpatialSize};
use warpkit_tensor::{Element, Tensor};

use crate::error::KernelError;
use crate::format::{check_boxes_shape, convert_format, map_boxes};
use crate::geometry::{compute_output_size, SizeSpec};

/// Resize bounding boxes along with the frame they live in.
///
/// The boxes are scaled by the ratio between the new and the old spatial size,
/// clamped to the new frame and returned in their original format. Integral
/// coordinates are truncated toward zero.
///
/// # Arguments
///
/// * `boxes` - The boxes, shape `[..., 4]`.
/// * `format` - The coordinate format of `boxes`.
/// * `spatial_size` - The size of the frame the boxes refer to.
/// * `size` - The requested size.
/// * `max_size` - Optional cap on the longer output edge.
///
/// # Returns
///
/// The resized boxes and the new spatial size.
///
/// # Example
///
/// ```
/// use warpkit_image::{BoundingBoxFormat, SpatialSize};
/// use warpkit_imgproc::geometry::SizeSpec;
/// use warpkit_imgproc::resize::resize_bounding_boxes;
/// use warpkit_tensor::Tensor;
///
/// let boxes = Tensor::from_shape_vec(&[1, 4], vec![2.0f32, 2.0, 6.0, 8.0]).unwrap();
/// let (out, size) = resize_bounding_boxes(
///     &boxes,
///     BoundingBoxFormat::Xyxy,
///     SpatialSize::new(10, 10).unwrap(),
///     SizeSpec::Exact { height: 5, width: 20 },
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(size, SpatialSize::new(5, 20).unwrap());
/// assert_eq!(out.as_slice(), &[4.0, 1.0, 12.0, 4.0]);
/// ```
pub fn resize_bounding_boxes<T: Element>(
    boxes: &Tensor<T>,
    format: BoundingBoxFormat,
    spatial_size: SpatialSize,
    size: SizeSpec,
    max_size: Option<usize>,
) -> Result<(Tensor<T>, SpatialSize), KernelError> {
    check_boxes_shape(boxes)?;
    let new_size = compute_output_size(spatial_size, size, max_size)?;
    if new_size == spatial_size {
        return Ok((boxes.clone(), new_size));
    }

    let w_ratio = new_size.width as f64 / spatial_size.width as f64;
    let h_ratio = new_size.height as f64 / spatial_size.height as f64;
    let (max_x, max_y) = (new_size.width as f64, new_size.height as f64);

    let resized = map_boxes(boxes, |bbox| {
        let [x1, y1, x2, y2] = convert_format(bbox, format, BoundingBoxFormat::Xyxy);
        let scaled = [
            (x1 * w_ratio).clamp(0.0, max_x),
            (y1 * h_ratio).clamp(0.0, max_y),
            (x2 * w_ratio).clamp(0.0, max_x),
            (y2 * h_ratio).clamp(0.0, max_y),
        ];
        convert_format(scaled, BoundingBoxFormat::Xyxy, format)
    })?;

    Ok((resized, new_size))
}

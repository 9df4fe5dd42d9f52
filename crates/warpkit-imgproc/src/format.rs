use warpkit_image::{BoundingBoxFormat, SpatialSize};
use warpkit_tensor::{Element, Tensor};

use crate::error::KernelError;
use crate::parallel::par_iter_planes;

fn to_xyxy(bbox: [f64; 4], format: BoundingBoxFormat) -> [f64; 4] {
    let [a, b, c, d] = bbox;
    match format {
        BoundingBoxFormat::Xyxy => bbox,
        BoundingBoxFormat::Xywh => [a, b, a + c, b + d],
        BoundingBoxFormat::Cxcywh => {
            let (half_w, half_h) = (c / 2.0, d / 2.0);
            [a - half_w, b - half_h, a + half_w, b + half_h]
        }
    }
}

fn from_xyxy(bbox: [f64; 4], format: BoundingBoxFormat) -> [f64; 4] {
    let [x1, y1, x2, y2] = bbox;
    match format {
        BoundingBoxFormat::Xyxy => bbox,
        BoundingBoxFormat::Xywh => [x1, y1, x2 - x1, y2 - y1],
        BoundingBoxFormat::Cxcywh => [
            (x1 + x2) / 2.0,
            (y1 + y2) / 2.0,
            x2 - x1,
            y2 - y1,
        ],
    }
}

/// Converts a single box between coordinate formats.
///
/// # Examples
///
/// ```
/// use warpkit_image::BoundingBoxFormat;
/// use warpkit_imgproc::format::convert_format;
///
/// let xywh = convert_format(
///     [2.0, 3.0, 6.0, 8.0],
///     BoundingBoxFormat::Xyxy,
///     BoundingBoxFormat::Xywh,
/// );
/// assert_eq!(xywh, [2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn convert_format(
    bbox: [f64; 4],
    old_format: BoundingBoxFormat,
    new_format: BoundingBoxFormat,
) -> [f64; 4] {
    if old_format == new_format {
        return bbox;
    }
    from_xyxy(to_xyxy(bbox, old_format), new_format)
}

/// Applies `f` to every box of a `[..., 4]` tensor, honoring its device.
///
/// Coordinates are computed in f64 and cast back to `T` truncating toward zero.
pub(crate) fn map_boxes<T, F>(boxes: &Tensor<T>, f: F) -> Result<Tensor<T>, KernelError>
where
    T: Element,
    F: Fn([f64; 4]) -> [f64; 4] + Send + Sync,
{
    check_boxes_shape(boxes)?;

    let mut data = vec![T::default(); boxes.numel()];
    par_iter_planes(boxes.device(), boxes.as_slice(), 4, &mut data, 4, |src, dst| {
        let bbox = [
            src[0].to_f64(),
            src[1].to_f64(),
            src[2].to_f64(),
            src[3].to_f64(),
        ];
        for (d, v) in dst.iter_mut().zip(f(bbox)) {
            *d = T::from_f64_trunc(v);
        }
    });

    Ok(Tensor::from_shape_vec(boxes.shape(), data)?.with_device(boxes.device()))
}

pub(crate) fn check_boxes_shape<T>(boxes: &Tensor<T>) -> Result<(), KernelError> {
    if boxes.shape().last() != Some(&4) {
        return Err(KernelError::InvalidArgument(format!(
            "bounding boxes must have a trailing dimension of 4, but got shape {:?}",
            boxes.shape()
        )));
    }
    Ok(())
}

/// Converts every box of a `[..., 4]` tensor between coordinate formats.
///
/// Converting to the same format returns a tensor sharing the input storage.
///
/// # Errors
///
/// Returns [`KernelError::InvalidArgument`] if the trailing dimension is not 4.
pub fn convert_format_bounding_boxes<T: Element>(
    boxes: &Tensor<T>,
    old_format: BoundingBoxFormat,
    new_format: BoundingBoxFormat,
) -> Result<Tensor<T>, KernelError> {
    if old_format == new_format {
        return Ok(boxes.clone());
    }
    map_boxes(boxes, |bbox| convert_format(bbox, old_format, new_format))
}

/// Clamps every box of a `[..., 4]` tensor to the frame of `spatial_size`.
pub fn clamp_bounding_boxes<T: Element>(
    boxes: &Tensor<T>,
    format: BoundingBoxFormat,
    spatial_size: SpatialSize,
) -> Result<Tensor<T>, KernelError> {
    map_boxes(boxes, |bbox| {
        crate::geometry::clamp_bounding_box(bbox, format, spatial_size)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_single_box() {
        let xyxy = [2.0, 4.0, 10.0, 8.0];
        let cxcywh = convert_format(xyxy, BoundingBoxFormat::Xyxy, BoundingBoxFormat::Cxcywh);
        assert_eq!(cxcywh, [6.0, 6.0, 8.0, 4.0]);
        let xywh = convert_format(cxcywh, BoundingBoxFormat::Cxcywh, BoundingBoxFormat::Xywh);
        assert_eq!(xywh, [2.0, 4.0, 8.0, 4.0]);
        assert_eq!(
            convert_format(xywh, BoundingBoxFormat::Xywh, BoundingBoxFormat::Xyxy),
            xyxy
        );
    }

    #[test]
    fn convert_every_format_pair_and_back() -> Result<(), KernelError> {
        // even sides keep the centers integral
        let xyxy = [0.0, 2.0, 4.0, 8.0, 3.0, 1.0, 11.0, 7.0];
        for old in BoundingBoxFormat::ALL {
            let data: Vec<f64> = xyxy
                .chunks_exact(4)
                .flat_map(|b| convert_format([b[0], b[1], b[2], b[3]], BoundingBoxFormat::Xyxy, old))
                .collect();
            let floats = Tensor::<f32>::from_shape_vec(&[2, 4], data.iter().map(|&v| v as f32).collect())?;
            let ints = Tensor::<i64>::from_shape_vec(&[2, 4], data.iter().map(|&v| v as i64).collect())?;
            for new in BoundingBoxFormat::ALL {
                let there = convert_format_bounding_boxes(&floats, old, new)?;
                let back = convert_format_bounding_boxes(&there, new, old)?;
                assert_eq!(back.as_slice(), floats.as_slice(), "f32 {old} -> {new}");

                let there = convert_format_bounding_boxes(&ints, old, new)?;
                let back = convert_format_bounding_boxes(&there, new, old)?;
                assert_eq!(back.as_slice(), ints.as_slice(), "i64 {old} -> {new}");
            }
        }
        Ok(())
    }

    #[test]
    fn convert_tensor() -> Result<(), KernelError> {
        let boxes = Tensor::<f32>::from_shape_vec(
            &[2, 4],
            vec![0.0, 0.0, 4.0, 2.0, 1.0, 1.0, 3.0, 5.0],
        )?;
        let out =
            convert_format_bounding_boxes(&boxes, BoundingBoxFormat::Xyxy, BoundingBoxFormat::Xywh)?;
        assert_eq!(out.shape(), &[2, 4]);
        assert_eq!(out.as_slice(), &[0.0, 0.0, 4.0, 2.0, 1.0, 1.0, 2.0, 4.0]);

        let same =
            convert_format_bounding_boxes(&boxes, BoundingBoxFormat::Xyxy, BoundingBoxFormat::Xyxy)?;
        assert!(same.shares_storage(&boxes));
        Ok(())
    }

    #[test]
    fn convert_integer_boxes_truncate() -> Result<(), KernelError> {
        let boxes = Tensor::<i64>::from_shape_vec(&[1, 4], vec![0, 0, 5, 3])?;
        let out = convert_format_bounding_boxes(
            &boxes,
            BoundingBoxFormat::Xyxy,
            BoundingBoxFormat::Cxcywh,
        )?;
        // 2.5 and 1.5 truncate toward zero
        assert_eq!(out.as_slice(), &[2, 1, 5, 3]);
        Ok(())
    }

    #[test]
    fn clamp_tensor() -> Result<(), KernelError> {
        let boxes = Tensor::<f64>::from_shape_vec(&[1, 4], vec![-1.0, 2.0, 30.0, 9.0])?;
        let out = clamp_bounding_boxes(
            &boxes,
            BoundingBoxFormat::Xyxy,
            SpatialSize::new(8, 16)?,
        )?;
        assert_eq!(out.as_slice(), &[0.0, 2.0, 16.0, 8.0]);
        Ok(())
    }

    #[test]
    fn reject_bad_shape() -> Result<(), KernelError> {
        let boxes = Tensor::<f32>::zeros(&[2, 3]);
        let err = convert_format_bounding_boxes(
            &boxes,
            BoundingBoxFormat::Xyxy,
            BoundingBoxFormat::Xywh,
        )
        .unwrap_err();
        assert!(err.is_invalid_argument());
        Ok(())
    }
}

use warpkit_image::{Datapoint, SpatialSize};
use warpkit_imgproc::{
    geometry::{compute_output_size, SizeArg, SizeSpec},
    interpolation::InterpolationMode,
};
use warpkit_tensor::{Element, Tensor};

use crate::dispatch;
use crate::error::TransformError;
use crate::v1;

/// A transform applied to one datapoint at a time.
pub trait Transform {
    /// Applies the transform.
    fn forward<T: Element>(&self, input: Datapoint<T>) -> Result<Datapoint<T>, TransformError>;

    /// Applies the transform to several datapoints that describe the same sample.
    fn forward_all<T: Element>(
        &self,
        inputs: Vec<Datapoint<T>>,
    ) -> Result<Vec<Datapoint<T>>, TransformError> {
        inputs.into_iter().map(|input| self.forward(input)).collect()
    }
}

/// Derives the output size of a geometric transform from the input size, the
/// requested size and the optional cap on the longer edge.
pub type GetParams =
    fn(SpatialSize, SizeSpec, Option<usize>) -> Result<SpatialSize, TransformError>;

/// A transform that only ever sees plain tensors.
pub trait LegacyTransform {
    /// The parameter derivation of the transform.
    const GET_PARAMS: GetParams;

    /// Applies the transform to a tensor image.
    fn forward_tensor<T: Element>(&self, input: &Tensor<T>) -> Result<Tensor<T>, TransformError>;

    /// Applies the transform through the compiled kernels.
    fn forward_tensor_compiled<T: Element>(
        &self,
        input: &Tensor<T>,
    ) -> Result<Tensor<T>, TransformError>;
}

/// A transform with a legacy tensor-only counterpart.
pub trait LegacyCompatible {
    /// The legacy transform.
    type Legacy: LegacyTransform;

    /// The parameter derivation of the transform. It is the very function the
    /// legacy transform uses.
    const GET_PARAMS: GetParams;

    /// Builds the legacy transform with the same parameters.
    fn to_legacy(&self) -> Self::Legacy;
}

/// Resize the input to a given size.
///
/// The parameters are validated when the transform is built, so a malformed
/// size fails before any input is seen.
///
/// # Example
///
/// ```
/// use warpkit_image::{Datapoint, Image};
/// use warpkit_imgproc::interpolation::InterpolationMode;
/// use warpkit_tensor::Tensor;
/// use warpkit_transforms::{Resize, Transform};
///
/// let resize = Resize::new(12usize, InterpolationMode::Bilinear, Some(13), Some(true)).unwrap();
/// let image = Image::new(Tensor::<f32>::zeros(&[3, 17, 11])).unwrap();
/// let out = resize.forward(Datapoint::from(image)).unwrap();
///
/// assert_eq!(out.as_tensor().unwrap().shape(), &[3, 13, 8]);
/// assert!(Resize::new(vec![1usize, 2, 3], InterpolationMode::Bilinear, None, None).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resize {
    size: SizeSpec,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
    antialias: Option<bool>,
}

impl Resize {
    /// Builds a resize transform.
    ///
    /// # Arguments
    ///
    /// * `size` - An integer or a one element sequence for the shorter edge, or `[h, w]`.
    /// * `interpolation` - The interpolation mode.
    /// * `max_size` - Optional cap on the longer output edge. Only valid with a shorter edge size.
    /// * `antialias` - Antialias bilinear and bicubic downsampling.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidArgument`] for a sequence of other than one
    /// or two values, a zero entry, or a `max_size` that does not fit `size`.
    pub fn new(
        size: impl Into<SizeArg>,
        interpolation: InterpolationMode,
        max_size: Option<usize>,
        antialias: Option<bool>,
    ) -> Result<Self, TransformError> {
        let size = SizeSpec::parse(size).map_err(|e| TransformError::InvalidArgument(e.to_string()))?;
        match (size, max_size) {
            (SizeSpec::Exact { .. }, Some(_)) => {
                return Err(TransformError::InvalidArgument(format!(
                    "max_size should only be passed if size specifies the length of the smaller edge, \
                     i.e. size should be an int or a sequence of length 1, but got size={size}"
                )))
            }
            (SizeSpec::Shorter(requested), Some(max_size)) if max_size <= requested => {
                return Err(TransformError::InvalidArgument(format!(
                    "max_size = {max_size} must be strictly greater than the requested size for the smaller edge size = {requested}"
                )))
            }
            _ => {}
        }
        Ok(Self {
            size,
            interpolation,
            max_size,
            antialias,
        })
    }

    /// The requested size.
    pub fn size(&self) -> SizeSpec {
        self.size
    }

    /// The interpolation mode.
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// The cap on the longer output edge.
    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// The antialias flag.
    pub fn antialias(&self) -> Option<bool> {
        self.antialias
    }

    /// Derives the output size for an input size.
    pub fn get_params(
        input_size: SpatialSize,
        size: SizeSpec,
        max_size: Option<usize>,
    ) -> Result<SpatialSize, TransformError> {
        Ok(compute_output_size(input_size, size, max_size)?)
    }
}

impl Transform for Resize {
    fn forward<T: Element>(&self, input: Datapoint<T>) -> Result<Datapoint<T>, TransformError> {
        dispatch::resize(
            input,
            self.size,
            self.interpolation,
            self.max_size,
            self.antialias,
        )
    }
}

impl LegacyCompatible for Resize {
    type Legacy = v1::Resize;

    const GET_PARAMS: GetParams = Resize::get_params;

    fn to_legacy(&self) -> v1::Resize {
        v1::Resize::from_parts(self.size, self.interpolation, self.max_size, self.antialias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warpkit_image::{BoundingBoxFormat, BoundingBoxes, Image};

    #[test]
    fn new_validates_size() {
        for size in [vec![], vec![1usize, 2, 3], vec![0]] {
            let err = Resize::new(size, InterpolationMode::Bilinear, None, None).unwrap_err();
            assert!(err.is_invalid_argument());
        }
        let err = Resize::new([12usize, 13], InterpolationMode::Bilinear, Some(20), None)
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("size should be an int or a sequence of length 1"));
        let err = Resize::new(12usize, InterpolationMode::Bilinear, Some(12), None).unwrap_err();
        assert!(err
            .to_string()
            .contains("must be strictly greater than the requested size"));
    }

    #[test]
    fn forward_all_shares_parameters() -> Result<(), TransformError> {
        let resize = Resize::new(8usize, InterpolationMode::Nearest, None, None)?;
        let image = Image::new(Tensor::<f32>::zeros(&[3, 17, 11]))?;
        let boxes = BoundingBoxes::new(
            Tensor::<f32>::zeros(&[4, 4]),
            BoundingBoxFormat::Xywh,
            SpatialSize::new(17, 11)?,
        )?;
        let inputs: Vec<Datapoint<f32>> = vec![image.into(), boxes.into()];
        let out = resize.forward_all(inputs)?;
        assert_eq!(out[0].spatial_size()?, out[1].spatial_size()?);
        assert_eq!(out[0].spatial_size()?, SpatialSize::new(12, 8)?);
        Ok(())
    }

    #[test]
    fn get_params_matches_output() -> Result<(), TransformError> {
        let input = SpatialSize::new(17, 11)?;
        let resize = Resize::new(12usize, InterpolationMode::Nearest, Some(13), None)?;
        let expected = Resize::get_params(input, resize.size(), resize.max_size())?;
        let out = resize.forward(Datapoint::from(Tensor::<u8>::zeros(&[1, 17, 11])))?;
        assert_eq!(out.spatial_size()?, expected);
        Ok(())
    }

    #[test]
    fn legacy_counterpart() -> Result<(), TransformError> {
        let resize = Resize::new(7usize, InterpolationMode::Bilinear, None, Some(true))?;
        let legacy = resize.to_legacy();
        let tensor = Tensor::<f32>::from_shape_fn(&[3, 17, 11], |idx| idx[1] as f32 - idx[2] as f32);

        let out = resize.forward(Datapoint::from(tensor.clone()))?;
        let legacy_out = legacy.forward_tensor(&tensor)?;
        assert_eq!(out.as_tensor().map(|t| t.as_slice()), Some(legacy_out.as_slice()));
        Ok(())
    }

    #[test]
    fn legacy_shares_get_params() {
        assert!(std::ptr::fn_addr_eq(
            <Resize as LegacyCompatible>::GET_PARAMS,
            <v1::Resize as LegacyTransform>::GET_PARAMS,
        ));
    }
}

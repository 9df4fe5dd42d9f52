//! Legacy transforms that accept plain tensors only.

use warpkit_imgproc::{
    geometry::{SizeArg, SizeSpec},
    interpolation::InterpolationMode,
    resize,
};
use warpkit_tensor::{Element, Tensor};

use crate::compiled;
use crate::dispatch::{KernelId, RESIZE_API};
use crate::error::TransformError;
use crate::telemetry;
use crate::transform::{self, GetParams, LegacyTransform};

/// Legacy resize of tensor images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    size: SizeSpec,
    interpolation: InterpolationMode,
    max_size: Option<usize>,
    antialias: Option<bool>,
}

impl Resize {
    /// Builds a legacy resize with the same validation as [`transform::Resize::new`].
    pub fn new(
        size: impl Into<SizeArg>,
        interpolation: InterpolationMode,
        max_size: Option<usize>,
        antialias: Option<bool>,
    ) -> Result<Self, TransformError> {
        let checked = transform::Resize::new(size, interpolation, max_size, antialias)?;
        Ok(Self::from_parts(
            checked.size(),
            interpolation,
            max_size,
            antialias,
        ))
    }

    pub(crate) fn from_parts(
        size: SizeSpec,
        interpolation: InterpolationMode,
        max_size: Option<usize>,
        antialias: Option<bool>,
    ) -> Self {
        Self {
            size,
            interpolation,
            max_size,
            antialias,
        }
    }
}

impl LegacyTransform for Resize {
    const GET_PARAMS: GetParams = transform::Resize::get_params;

    fn forward_tensor<T: Element>(&self, input: &Tensor<T>) -> Result<Tensor<T>, TransformError> {
        telemetry::log_api_usage_once(RESIZE_API);
        Ok(resize::resize_image(
            input,
            self.size,
            self.interpolation,
            self.max_size,
            self.antialias.unwrap_or(false),
        )?)
    }

    fn forward_tensor_compiled<T: Element>(
        &self,
        input: &Tensor<T>,
    ) -> Result<Tensor<T>, TransformError> {
        telemetry::log_api_usage_once(RESIZE_API);
        compiled::compile(KernelId::ResizeImage).resize_image(
            input,
            self.size,
            self.interpolation,
            self.max_size,
            self.antialias.unwrap_or(false),
        )
    }
}

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use image::DynamicImage;
use warpkit_image::{BoundingBoxFormat, SpatialSize};
use warpkit_imgproc::{
    geometry::SizeSpec,
    interpolation::{InterpolationMode, PlanCache, Resampler},
    resize,
};
use warpkit_tensor::{Element, Tensor};

use crate::dispatch::KernelId;
use crate::error::TransformError;

/// A kernel prepared for repeated execution.
///
/// Tensor kernels keep their axis plans in a [`PlanCache`], so a second call with
/// the same geometry skips the weight computation. Results are identical to the
/// eager kernels.
#[derive(Debug)]
pub struct CompiledKernel {
    id: KernelId,
    plans: PlanCache,
}

impl CompiledKernel {
    fn new(id: KernelId) -> Self {
        Self {
            id,
            plans: PlanCache::new(),
        }
    }

    /// The kernel this was compiled from.
    pub fn id(&self) -> KernelId {
        self.id
    }

    /// Number of axis plans memoized so far.
    pub fn cached_plans(&self) -> usize {
        self.plans.len()
    }

    fn ensure(&self, expected: KernelId) -> Result<(), TransformError> {
        if self.id != expected {
            return Err(TransformError::KernelMismatch {
                expected,
                actual: self.id,
            });
        }
        Ok(())
    }

    /// Runs the compiled image kernel.
    pub fn resize_image<T: Element>(
        &self,
        image: &Tensor<T>,
        size: SizeSpec,
        interpolation: InterpolationMode,
        max_size: Option<usize>,
        antialias: bool,
    ) -> Result<Tensor<T>, TransformError> {
        self.ensure(KernelId::ResizeImage)?;
        Ok(resize::resize_image_with(
            Resampler::Planned(&self.plans),
            image,
            size,
            interpolation,
            max_size,
            antialias,
        )?)
    }

    /// Runs the compiled video kernel.
    pub fn resize_video<T: Element>(
        &self,
        video: &Tensor<T>,
        size: SizeSpec,
        interpolation: InterpolationMode,
        max_size: Option<usize>,
        antialias: bool,
    ) -> Result<Tensor<T>, TransformError> {
        self.ensure(KernelId::ResizeVideo)?;
        Ok(resize::resize_video_with(
            Resampler::Planned(&self.plans),
            video,
            size,
            interpolation,
            max_size,
            antialias,
        )?)
    }

    /// Runs the compiled mask kernel.
    pub fn resize_mask<T: Element>(
        &self,
        mask: &Tensor<T>,
        size: SizeSpec,
        max_size: Option<usize>,
    ) -> Result<Tensor<T>, TransformError> {
        self.ensure(KernelId::ResizeMask)?;
        Ok(resize::resize_mask_with(
            Resampler::Planned(&self.plans),
            mask,
            size,
            max_size,
        )?)
    }

    /// Runs the compiled bounding box kernel.
    pub fn resize_bounding_boxes<T: Element>(
        &self,
        boxes: &Tensor<T>,
        format: BoundingBoxFormat,
        spatial_size: SpatialSize,
        size: SizeSpec,
        max_size: Option<usize>,
    ) -> Result<(Tensor<T>, SpatialSize), TransformError> {
        self.ensure(KernelId::ResizeBoundingBoxes)?;
        Ok(resize::resize_bounding_boxes(
            boxes,
            format,
            spatial_size,
            size,
            max_size,
        )?)
    }

    /// Runs the compiled `image` crate kernel.
    pub fn resize_image_pil<'a>(
        &self,
        image: &'a DynamicImage,
        size: SizeSpec,
        interpolation: InterpolationMode,
        max_size: Option<usize>,
    ) -> Result<Cow<'a, DynamicImage>, TransformError> {
        self.ensure(KernelId::ResizeImagePil)?;
        Ok(resize::resize_image_pil(
            image,
            size,
            interpolation,
            max_size,
        )?)
    }
}

type KernelCache = RwLock<HashMap<KernelId, Arc<CompiledKernel>>>;

static COMPILED: OnceLock<KernelCache> = OnceLock::new();

/// Returns the compiled form of a kernel, building it on first use.
///
/// The cache is process wide. Concurrent first calls may both build; the first
/// insert wins and every caller gets the cached instance.
pub fn compile(id: KernelId) -> Arc<CompiledKernel> {
    let cache = COMPILED.get_or_init(KernelCache::default);

    if let Some(kernel) = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
    {
        return kernel.clone();
    }

    log::debug!("compiling kernel {id}");
    let kernel = Arc::new(CompiledKernel::new(id));
    cache
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(id)
        .or_insert(kernel)
        .clone()
}

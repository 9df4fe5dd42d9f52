use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use warpkit_tensor::Element;

use super::filter::Filter;
use super::InterpolationMode;
use crate::error::KernelError;

/// Identifies the resampling of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisKey {
    /// Input length along the axis
    pub input: usize,
    /// Output length along the axis
    pub output: usize,
    /// Interpolation mode
    pub mode: InterpolationMode,
    /// Whether the filter widens when downsampling
    pub antialias: bool,
}

/// The contributing input window of one output index.
#[derive(Debug, Clone, PartialEq)]
pub struct Taps {
    /// First contributing input index
    pub start: usize,
    /// Normalized weights of the indices `start..start + weights.len()`
    pub weights: Vec<f64>,
}

/// How every output index of an axis is computed from the input.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisPlan {
    /// Input and output have the same length.
    Identity,
    /// Each output copies one input index.
    Nearest(Vec<usize>),
    /// Each output is a weighted sum over a window of inputs.
    Weighted(Vec<Taps>),
}

impl AxisPlan {
    /// Builds the plan of an axis.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::UnsupportedInterpolation`] for modes tensors cannot
    /// be resampled with, and [`KernelError::InvalidArgument`] for empty axes.
    pub fn build(key: AxisKey) -> Result<Self, KernelError> {
        let AxisKey {
            input,
            output,
            mode,
            antialias,
        } = key;

        if !mode.is_tensor_supported() {
            return Err(KernelError::UnsupportedInterpolation {
                mode,
                backend: "tensor",
            });
        }
        if input == 0 || output == 0 {
            return Err(KernelError::InvalidArgument(format!(
                "cannot resample an axis of length {input} to length {output}"
            )));
        }
        if input == output {
            return Ok(AxisPlan::Identity);
        }

        let scale = input as f64 / output as f64;
        let last = input - 1;

        let plan = match mode {
            InterpolationMode::Nearest => AxisPlan::Nearest(
                (0..output)
                    .map(|i| ((i as f64 * scale).floor() as usize).min(last))
                    .collect(),
            ),
            InterpolationMode::NearestExact => AxisPlan::Nearest(
                (0..output)
                    .map(|i| (((i as f64 + 0.5) * scale).floor() as usize).min(last))
                    .collect(),
            ),
            _ => {
                let filter = Filter::for_mode(mode).ok_or(KernelError::UnsupportedInterpolation {
                    mode,
                    backend: "tensor",
                })?;
                AxisPlan::Weighted(
                    (0..output)
                        .map(|i| compute_taps(filter, i, input, scale, antialias))
                        .collect(),
                )
            }
        };

        Ok(plan)
    }

    /// Samples output index `i`, reading inputs through `fetch`.
    #[inline]
    pub fn sample<T: Element>(&self, i: usize, fetch: impl Fn(usize) -> T) -> T {
        match self {
            AxisPlan::Identity => fetch(i),
            AxisPlan::Nearest(indices) => fetch(indices[i]),
            AxisPlan::Weighted(taps) => {
                let Taps { start, weights } = &taps[i];
                let acc = weights
                    .iter()
                    .enumerate()
                    .fold(0.0, |acc, (k, w)| acc + w * fetch(start + k).to_f64());
                T::from_f64(acc)
            }
        }
    }

    /// Returns true for [`AxisPlan::Identity`].
    pub fn is_identity(&self) -> bool {
        matches!(self, AxisPlan::Identity)
    }
}

fn compute_taps(filter: Filter, i: usize, input: usize, scale: f64, antialias: bool) -> Taps {
    let filterscale = if antialias && scale > 1.0 { scale } else { 1.0 };
    let support = filter.support() * filterscale;
    let center = (i as f64 + 0.5) * scale;

    let start = (center - support + 0.5).floor().max(0.0) as usize;
    let end = ((center + support + 0.5).floor() as usize).min(input);

    let mut weights: Vec<f64> = (start..end)
        .map(|j| filter.eval((j as f64 - center + 0.5) / filterscale))
        .collect();

    let total: f64 = weights.iter().sum();
    if total != 0.0 {
        weights.iter_mut().for_each(|w| *w /= total);
    }

    Taps { start, weights }
}

/// Memoized axis plans, shared between calls with the same geometry.
///
/// The cache holds at most [`PlanCache::capacity`] plans. Inserting into a full
/// cache drops every cached plan first.
#[derive(Debug)]
pub struct PlanCache {
    plans: RwLock<HashMap<AxisKey, Arc<AxisPlan>>>,
    capacity: usize,
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl PlanCache {
    /// Number of plans kept by [`PlanCache::new`].
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Creates an empty cache holding up to [`PlanCache::DEFAULT_CAPACITY`] plans.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache holding up to `capacity` plans, at least one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            plans: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of cached plans.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the cached plan for `key`, building it on a miss.
    ///
    /// Concurrent misses may build the same plan twice; the first insert wins.
    pub fn get_or_build(&self, key: AxisKey) -> Result<Arc<AxisPlan>, KernelError> {
        if let Some(plan) = self
            .plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            log::trace!("axis plan cache hit for {key:?}");
            return Ok(plan.clone());
        }

        log::debug!("building axis plan for {key:?}");
        let plan = Arc::new(AxisPlan::build(key)?);
        let mut plans = self.plans.write().unwrap_or_else(PoisonError::into_inner);
        if plans.len() >= self.capacity && !plans.contains_key(&key) {
            log::debug!("axis plan cache full ({} plans), clearing", plans.len());
            plans.clear();
        }
        Ok(plans.entry(key).or_insert(plan).clone())
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        self.plans.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where axis plans come from.
#[derive(Debug, Clone, Copy, Default)]
pub enum Resampler<'a> {
    /// Build every plan on the spot.
    #[default]
    Direct,
    /// Reuse plans from a cache.
    Planned(&'a PlanCache),
}

impl std::fmt::Display for Resampler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resampler::Direct => write!(f, "direct"),
            Resampler::Planned(_) => write!(f, "planned"),
        }
    }
}

impl Resampler<'_> {
    /// Returns the plan of an axis.
    pub fn axis(&self, key: AxisKey) -> Result<Arc<AxisPlan>, KernelError> {
        match self {
            Resampler::Direct => Ok(Arc::new(AxisPlan::build(key)?)),
            Resampler::Planned(cache) => cache.get_or_build(key),
        }
    }
}

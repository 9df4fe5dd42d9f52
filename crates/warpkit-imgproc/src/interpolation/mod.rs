//! Interpolation modes and the separable resampling primitive.
//!
//! Tensor inputs are resampled one axis at a time. Each axis gets an
//! [`AxisPlan`] telling, for every output index, which input indices contribute
//! and with which weights. Plans are either built per call
//! ([`Resampler::Direct`]) or memoized in a [`PlanCache`]
//! ([`Resampler::Planned`]); both produce identical results.
//!
//! # Interpolation Modes
//!
//! - **Nearest** / **NearestExact**: index gathering, no arithmetic on values
//! - **Bilinear**: triangle filter
//! - **Bicubic**: cubic convolution with `a = -0.5`
//! - **Box**, **Hamming**, **Lanczos**: only available for `image` crate inputs

mod filter;
mod mode;
mod plan;
pub(crate) mod resample;

pub use mode::InterpolationMode;
pub use plan::{AxisKey, AxisPlan, PlanCache, Resampler, Taps};

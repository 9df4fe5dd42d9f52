use warpkit_tensor::{Element, Tensor};

use crate::error::ContractViolation;

/// Tolerances for [`assert_close`]. The default demands exact equality.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tolerance {
    /// Relative tolerance
    pub rtol: f64,
    /// Absolute tolerance
    pub atol: f64,
}

impl Tolerance {
    /// Exact equality.
    pub const EXACT: Tolerance = Tolerance {
        rtol: 0.0,
        atol: 0.0,
    };

    /// Creates a tolerance.
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }

    /// Absolute tolerance only.
    pub fn atol(atol: f64) -> Self {
        Self { rtol: 0.0, atol }
    }
}

/// Checks that two tensors have the same shape and close values.
///
/// Each pair must satisfy `|actual - expected| <= atol + rtol * |expected|`.
/// Two NaNs compare equal.
///
/// ```
/// use warpkit_conformance::{assert_close, Tolerance};
/// use warpkit_tensor::Tensor;
///
/// let a = Tensor::from_shape_vec(&[2], vec![1.0f32, 2.0]).unwrap();
/// let b = Tensor::from_shape_vec(&[2], vec![1.0f32, 2.5]).unwrap();
/// assert!(assert_close(&a, &b, Tolerance::default()).is_err());
/// assert!(assert_close(&a, &b, Tolerance::atol(0.5)).is_ok());
/// ```
pub fn assert_close<T: Element>(
    actual: &Tensor<T>,
    expected: &Tensor<T>,
    tolerance: Tolerance,
) -> Result<(), ContractViolation> {
    if actual.shape() != expected.shape() {
        return Err(ContractViolation::failed(
            "assert_close",
            format!(
                "shape mismatch: {:?} vs {:?}",
                actual.shape(),
                expected.shape()
            ),
        ));
    }

    let Tolerance { rtol, atol } = tolerance;
    for (index, (a, e)) in actual
        .as_slice()
        .iter()
        .zip(expected.as_slice())
        .enumerate()
    {
        let (a, e) = (a.to_f64(), e.to_f64());
        if a.is_nan() && e.is_nan() {
            continue;
        }
        if !((a - e).abs() <= atol + rtol * e.abs()) {
            return Err(ContractViolation::NotClose {
                index,
                actual: a,
                expected: e,
                rtol,
                atol,
            });
        }
    }
    Ok(())
}

use num_traits::{Bounded, NumCast, ToPrimitive};

/// Runtime name of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// Boolean elements, used by detection masks.
    Bool,
    /// Unsigned 8-bit integers.
    U8,
    /// Signed 64-bit integers.
    I64,
    /// 32-bit floats.
    F32,
    /// 64-bit floats.
    F64,
}

impl DType {
    /// Returns true for floating point element types.
    pub fn is_floating_point(&self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DType::Bool => "bool",
            DType::U8 => "u8",
            DType::I64 => "i64",
            DType::F32 => "f32",
            DType::F64 => "f64",
        };
        write!(f, "{name}")
    }
}

/// Trait for tensor element types.
///
/// Kernels compute in `f64`/`f32` and cast back through [`Element::from_f64`], which
/// rounds to the nearest value and saturates for integral types. Coordinate kernels
/// cast back through [`Element::from_f64_trunc`] instead, which truncates toward zero.
pub trait Element: Copy + Default + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    /// The runtime name of the type.
    const DTYPE: DType;

    /// Widen the value to `f64`.
    fn to_f64(self) -> f64;

    /// Narrow a `f64` value to the element type.
    fn from_f64(value: f64) -> Self;

    /// Narrow a `f64` value to the element type, truncating toward zero.
    ///
    /// Floating point types keep the value unchanged.
    fn from_f64_trunc(value: f64) -> Self {
        Self::from_f64(value)
    }
}

fn saturating_cast<T: NumCast + Bounded + Default>(value: f64) -> T {
    let lo = T::min_value().to_f64().unwrap_or(f64::MIN);
    let hi = T::max_value().to_f64().unwrap_or(f64::MAX);
    // NaN survives the clamp and fails the cast
    num_traits::cast(value.clamp(lo, hi)).unwrap_or_default()
}

impl Element for u8 {
    const DTYPE: DType = DType::U8;

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        saturating_cast(value.round())
    }

    fn from_f64_trunc(value: f64) -> Self {
        saturating_cast(value.trunc())
    }
}

impl Element for i64 {
    const DTYPE: DType = DType::I64;

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        saturating_cast(value.round())
    }

    fn from_f64_trunc(value: f64) -> Self {
        saturating_cast(value.trunc())
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn from_f64(value: f64) -> Self {
        value >= 0.5
    }

    fn from_f64_trunc(value: f64) -> Self {
        value != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{DType, Element};

    #[test]
    fn integral_casts_round_and_saturate() {
        assert_eq!(u8::from_f64(254.6), 255);
        assert_eq!(u8::from_f64(300.0), 255);
        assert_eq!(u8::from_f64(-3.0), 0);
        assert_eq!(u8::from_f64(f64::NAN), 0);
        assert_eq!(i64::from_f64(-2.5), -3);
        assert_eq!(i64::from_f64(7.4), 7);
    }

    #[test]
    fn integral_casts_truncate_toward_zero() {
        assert_eq!(i64::from_f64_trunc(4.5), 4);
        assert_eq!(i64::from_f64_trunc(-2.7), -2);
        assert_eq!(u8::from_f64_trunc(254.9), 254);
        assert_eq!(u8::from_f64_trunc(300.0), 255);
        assert_eq!(u8::from_f64_trunc(-0.5), 0);
        assert_eq!(i64::from_f64_trunc(f64::NAN), 0);
        assert_eq!(f32::from_f64_trunc(1.5), 1.5);
        assert!(bool::from_f64_trunc(0.3));
    }

    #[test]
    fn bool_threshold() {
        assert!(bool::from_f64(0.5));
        assert!(!bool::from_f64(0.49));
        assert_eq!(true.to_f64(), 1.0);
    }

    #[test]
    fn dtype_names() {
        assert_eq!(<f32 as Element>::DTYPE, DType::F32);
        assert!(DType::F64.is_floating_point());
        assert!(!DType::U8.is_floating_point());
        assert_eq!(DType::I64.to_string(), "i64");
    }
}

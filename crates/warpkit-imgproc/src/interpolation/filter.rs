use super::InterpolationMode;

const BICUBIC_A: f64 = -0.5;

/// Continuous reconstruction filters for the weighted modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Filter {
    Triangle,
    Cubic,
}

impl Filter {
    pub(crate) fn for_mode(mode: InterpolationMode) -> Option<Filter> {
        match mode {
            InterpolationMode::Bilinear => Some(Filter::Triangle),
            InterpolationMode::Bicubic => Some(Filter::Cubic),
            _ => None,
        }
    }

    /// Half width of the filter at scale 1.
    pub(crate) fn support(&self) -> f64 {
        match self {
            Filter::Triangle => 1.0,
            Filter::Cubic => 2.0,
        }
    }

    pub(crate) fn eval(&self, x: f64) -> f64 {
        let x = x.abs();
        match self {
            Filter::Triangle => {
                if x < 1.0 {
                    1.0 - x
                } else {
                    0.0
                }
            }
            Filter::Cubic => {
                let a = BICUBIC_A;
                if x < 1.0 {
                    ((a + 2.0) * x - (a + 3.0)) * x * x + 1.0
                } else if x < 2.0 {
                    (((x - 5.0) * x + 8.0) * x - 4.0) * a
                } else {
                    0.0
                }
            }
        }
    }
}

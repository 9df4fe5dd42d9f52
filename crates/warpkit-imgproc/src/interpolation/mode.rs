use crate::error::KernelError;

/// Interpolation mode for the resize operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationMode {
    /// Nearest neighbor, source index `floor(i * scale)`.
    Nearest,
    /// Nearest neighbor sampled at pixel centers, source index `floor((i + 0.5) * scale)`.
    NearestExact,
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Bicubic interpolation
    Bicubic,
    /// Box filter
    Box,
    /// Hamming filter
    Hamming,
    /// Lanczos filter
    Lanczos,
}

impl InterpolationMode {
    /// Every mode, in declaration order.
    pub const ALL: [InterpolationMode; 7] = [
        InterpolationMode::Nearest,
        InterpolationMode::NearestExact,
        InterpolationMode::Bilinear,
        InterpolationMode::Bicubic,
        InterpolationMode::Box,
        InterpolationMode::Hamming,
        InterpolationMode::Lanczos,
    ];

    /// The lowercase name of the mode.
    pub fn name(&self) -> &'static str {
        match self {
            InterpolationMode::Nearest => "nearest",
            InterpolationMode::NearestExact => "nearest-exact",
            InterpolationMode::Bilinear => "bilinear",
            InterpolationMode::Bicubic => "bicubic",
            InterpolationMode::Box => "box",
            InterpolationMode::Hamming => "hamming",
            InterpolationMode::Lanczos => "lanczos",
        }
    }

    /// The legacy integer code of the mode.
    ///
    /// `NearestExact` shares the code of `Nearest`.
    pub fn code(&self) -> u32 {
        match self {
            InterpolationMode::Nearest | InterpolationMode::NearestExact => 0,
            InterpolationMode::Lanczos => 1,
            InterpolationMode::Bilinear => 2,
            InterpolationMode::Bicubic => 3,
            InterpolationMode::Box => 4,
            InterpolationMode::Hamming => 5,
        }
    }

    /// Returns true if tensor inputs can be resampled with this mode.
    pub fn is_tensor_supported(&self) -> bool {
        matches!(
            self,
            InterpolationMode::Nearest
                | InterpolationMode::NearestExact
                | InterpolationMode::Bilinear
                | InterpolationMode::Bicubic
        )
    }

    /// Returns true if the `antialias` flag changes the result of this mode on tensors.
    pub fn is_antialiasable(&self) -> bool {
        matches!(
            self,
            InterpolationMode::Bilinear | InterpolationMode::Bicubic
        )
    }
}

impl TryFrom<u32> for InterpolationMode {
    type Error = KernelError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(InterpolationMode::Nearest),
            1 => Ok(InterpolationMode::Lanczos),
            2 => Ok(InterpolationMode::Bilinear),
            3 => Ok(InterpolationMode::Bicubic),
            4 => Ok(InterpolationMode::Box),
            5 => Ok(InterpolationMode::Hamming),
            _ => Err(KernelError::InvalidArgument(format!(
                "unknown interpolation code {code}, expected a value in 0..=5"
            ))),
        }
    }
}

impl std::fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

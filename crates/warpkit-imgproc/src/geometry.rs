use num_traits::Float;
use warpkit_image::{BoundingBoxFormat, SpatialSize};

use crate::error::KernelError;
use crate::format::convert_format;

/// A size argument as a caller writes it: a bare integer or a sequence.
///
/// This is the unvalidated form. Use [`SizeSpec::parse`] to turn it into a
/// [`SizeSpec`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SizeArg {
    /// A single integer.
    Int(usize),
    /// A sequence of integers.
    Seq(Vec<usize>),
}

impl From<usize> for SizeArg {
    fn from(size: usize) -> Self {
        SizeArg::Int(size)
    }
}

impl From<Vec<usize>> for SizeArg {
    fn from(size: Vec<usize>) -> Self {
        SizeArg::Seq(size)
    }
}

impl From<&[usize]> for SizeArg {
    fn from(size: &[usize]) -> Self {
        SizeArg::Seq(size.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for SizeArg {
    fn from(size: [usize; N]) -> Self {
        SizeArg::Seq(size.to_vec())
    }
}

impl From<SizeSpec> for SizeArg {
    fn from(size: SizeSpec) -> Self {
        match size {
            SizeSpec::Shorter(s) => SizeArg::Seq(vec![s]),
            SizeSpec::Exact { height, width } => SizeArg::Seq(vec![height, width]),
        }
    }
}

/// The validated target size of a resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeSpec {
    /// Match the shorter edge to this length and keep the aspect ratio.
    Shorter(usize),
    /// Resize to exactly this size.
    Exact {
        /// Target height in pixels
        height: usize,
        /// Target width in pixels
        width: usize,
    },
}

impl SizeSpec {
    /// Validates a size argument.
    ///
    /// An integer or a one element sequence selects [`SizeSpec::Shorter`], a two
    /// element sequence `[h, w]` selects [`SizeSpec::Exact`].
    ///
    /// # Examples
    ///
    /// ```
    /// use warpkit_imgproc::geometry::SizeSpec;
    ///
    /// assert_eq!(SizeSpec::parse(17usize).unwrap(), SizeSpec::Shorter(17));
    /// assert_eq!(SizeSpec::parse([17usize]).unwrap(), SizeSpec::Shorter(17));
    /// assert_eq!(
    ///     SizeSpec::parse([12usize, 13]).unwrap(),
    ///     SizeSpec::Exact { height: 12, width: 13 }
    /// );
    /// assert!(SizeSpec::parse([1usize, 2, 3]).is_err());
    /// ```
    pub fn parse(size: impl Into<SizeArg>) -> Result<Self, KernelError> {
        Self::try_from(size.into())
    }

    /// Returns true if only the shorter edge is pinned.
    pub fn is_shorter_edge(&self) -> bool {
        matches!(self, SizeSpec::Shorter(_))
    }
}

impl TryFrom<SizeArg> for SizeSpec {
    type Error = KernelError;

    fn try_from(size: SizeArg) -> Result<Self, Self::Error> {
        let spec = match size {
            SizeArg::Int(s) => SizeSpec::Shorter(s),
            SizeArg::Seq(seq) => match seq.as_slice() {
                [s] => SizeSpec::Shorter(*s),
                [height, width] => SizeSpec::Exact {
                    height: *height,
                    width: *width,
                },
                _ => {
                    return Err(KernelError::InvalidArgument(format!(
                        "size can either be an integer or a list or tuple of one or two integers, but got {seq:?}"
                    )))
                }
            },
        };
        match spec {
            SizeSpec::Shorter(0) | SizeSpec::Exact { height: 0, .. } | SizeSpec::Exact { width: 0, .. } => {
                Err(KernelError::InvalidArgument(format!(
                    "size must contain positive integers, but got {spec:?}"
                )))
            }
            _ => Ok(spec),
        }
    }
}

impl std::fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SizeSpec::Shorter(s) => write!(f, "[{s}]"),
            SizeSpec::Exact { height, width } => write!(f, "[{height}, {width}]"),
        }
    }
}

/// Computes the output size of a resize.
///
/// With [`SizeSpec::Shorter`] the shorter edge becomes `s` and the longer edge
/// scales by the same ratio, truncated toward zero. If `max_size` is given the
/// longer edge is then capped at it and the shorter edge rescaled, again with
/// truncation. With [`SizeSpec::Exact`] the size is returned as is and
/// `max_size` must be absent.
///
/// # Arguments
///
/// * `input_size` - The spatial size of the input.
/// * `size` - The requested size.
/// * `max_size` - Optional cap on the longer output edge.
///
/// # Errors
///
/// Returns [`KernelError::InvalidArgument`] when `max_size` is not strictly
/// greater than the requested shorter edge, when it is combined with an exact
/// size, or when a requested edge is zero.
///
/// # Examples
///
/// ```
/// use warpkit_image::SpatialSize;
/// use warpkit_imgproc::geometry::{compute_output_size, SizeSpec};
///
/// let input = SpatialSize::new(17, 11).unwrap();
///
/// let out = compute_output_size(input, SizeSpec::Shorter(12), None).unwrap();
/// assert_eq!((out.height, out.width), (18, 12));
///
/// let out = compute_output_size(input, SizeSpec::Shorter(12), Some(13)).unwrap();
/// assert_eq!((out.height, out.width), (13, 8));
/// ```
pub fn compute_output_size(
    input_size: SpatialSize,
    size: SizeSpec,
    max_size: Option<usize>,
) -> Result<SpatialSize, KernelError> {
    match size {
        SizeSpec::Exact { height, width } => {
            if max_size.is_some() {
                return Err(KernelError::InvalidArgument(format!(
                    "max_size should only be passed if size specifies the length of the smaller edge, \
                     i.e. size should be an int or a sequence of length 1, but got size={size}"
                )));
            }
            Ok(SpatialSize::new(height, width)?)
        }
        SizeSpec::Shorter(requested) => {
            if requested == 0 {
                return Err(KernelError::InvalidArgument(
                    "size must be a positive integer".to_string(),
                ));
            }
            if let Some(max_size) = max_size {
                if max_size <= requested {
                    return Err(KernelError::InvalidArgument(format!(
                        "max_size = {max_size} must be strictly greater than the requested size for the smaller edge size = {requested}"
                    )));
                }
            }

            let SpatialSize { height, width } = input_size;
            let (short, long) = if width <= height {
                (width, height)
            } else {
                (height, width)
            };

            let mut new_short = requested;
            let mut new_long = (requested as f64 * long as f64 / short as f64) as usize;

            if let Some(max_size) = max_size {
                if new_long > max_size {
                    new_short = (max_size as f64 * new_short as f64 / new_long as f64) as usize;
                    new_long = max_size;
                }
            }

            let (new_height, new_width) = if width <= height {
                (new_long, new_short)
            } else {
                (new_short, new_long)
            };

            Ok(SpatialSize::new(new_height, new_width)?)
        }
    }
}

/// Returns a 2x3 matrix scaling x by `sx` and y by `sy`.
pub fn scale_matrix<F: Float>(sx: F, sy: F) -> [F; 6] {
    let zero = F::zero();
    [sx, zero, zero, zero, sy, zero]
}

/// Inverts a 2x3 affine transformation matrix.
///
/// A singular matrix inverts to all zeros.
pub fn invert_affine_transform<F: Float>(m: &[F; 6]) -> [F; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    let determinant = a * e - b * d;
    let inv_determinant = if determinant != F::zero() {
        F::one() / determinant
    } else {
        F::zero()
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Returns a 2x3 rotation matrix for a 2D rotation around a center point.
///
/// The rotation matrix is defined as:
///
/// | alpha  beta  tx |
/// | -beta  alpha ty |
///
/// where alpha = scale * cos(angle) and beta = scale * sin(angle).
///
/// # Arguments
///
/// * `center` - The center point of the rotation.
/// * `angle` - The angle of rotation in degrees.
/// * `scale` - The scale factor.
pub fn get_rotation_matrix2d<F: Float>(center: (F, F), angle: F, scale: F) -> [F; 6] {
    let angle = angle.to_radians();
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (F::one() - alpha) * center.0 - beta * center.1;
    let ty = beta * center.0 + (F::one() - alpha) * center.1;

    [alpha, beta, tx, -beta, alpha, ty]
}

/// Applies an affine transformation to a point.
fn transform_point<F: Float>(x: F, y: F, m: &[F; 6]) -> (F, F) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies a 2x3 affine matrix to a list of points.
pub fn apply_affine_to_points<F: Float>(points: &[(F, F)], m: &[F; 6]) -> Vec<(F, F)> {
    points
        .iter()
        .map(|&(x, y)| transform_point(x, y, m))
        .collect()
}

/// Clamps a single box to the frame `[0, width] x [0, height]`.
///
/// The box is converted to XYXY, clamped and converted back to `format`.
pub fn clamp_bounding_box(
    bbox: [f64; 4],
    format: BoundingBoxFormat,
    spatial_size: SpatialSize,
) -> [f64; 4] {
    let [x1, y1, x2, y2] = convert_format(bbox, format, BoundingBoxFormat::Xyxy);
    let (w, h) = (spatial_size.width as f64, spatial_size.height as f64);
    let clamped = [
        x1.clamp(0.0, w),
        y1.clamp(0.0, h),
        x2.clamp(0.0, w),
        y2.clamp(0.0, h),
    ];
    convert_format(clamped, BoundingBoxFormat::Xyxy, format)
}

/// Maps a single box through an affine matrix.
///
/// The four corners are transformed and the axis aligned hull of the results
/// becomes the new box, which is then clamped to `spatial_size` (the frame after
/// the transform) and returned in the original `format`.
///
/// # Examples
///
/// ```
/// use warpkit_image::{BoundingBoxFormat, SpatialSize};
/// use warpkit_imgproc::geometry::{scale_matrix, transform_bounding_box};
///
/// let out = transform_bounding_box(
///     [1.0, 2.0, 4.0, 6.0],
///     BoundingBoxFormat::Xyxy,
///     SpatialSize::new(20, 20).unwrap(),
///     &scale_matrix(2.0, 0.5),
/// );
/// assert_eq!(out, [2.0, 1.0, 8.0, 3.0]);
/// ```
pub fn transform_bounding_box(
    bbox: [f64; 4],
    format: BoundingBoxFormat,
    spatial_size: SpatialSize,
    m: &[f64; 6],
) -> [f64; 4] {
    let [x1, y1, x2, y2] = convert_format(bbox, format, BoundingBoxFormat::Xyxy);
    let corners = apply_affine_to_points(&[(x1, y1), (x2, y1), (x1, y2), (x2, y2)], m);

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (x, y) in corners {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    let out = convert_format(
        [min_x, min_y, max_x, max_y],
        BoundingBoxFormat::Xyxy,
        format,
    );
    clamp_bounding_box(out, format, spatial_size)
}

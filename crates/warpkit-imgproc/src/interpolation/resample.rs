use std::borrow::Cow;

use warpkit_image::SpatialSize;
use warpkit_tensor::Element;

use super::AxisPlan;

/// Resamples one row-major plane, columns first and rows second.
///
/// The intermediate buffer holds `T`, so integral inputs are rounded between
/// the two passes. `dst` must hold `dst_size.height * dst_size.width` values.
pub(crate) fn resample_plane<T: Element>(
    src: &[T],
    src_size: SpatialSize,
    dst: &mut [T],
    dst_size: SpatialSize,
    rows: &AxisPlan,
    cols: &AxisPlan,
) {
    let (src_w, dst_w) = (src_size.width, dst_size.width);

    let horizontal: Cow<[T]> = if cols.is_identity() {
        Cow::Borrowed(src)
    } else {
        let mut tmp = Vec::with_capacity(src_size.height * dst_w);
        for row in src.chunks_exact(src_w) {
            tmp.extend((0..dst_w).map(|x| cols.sample(x, |j| row[j])));
        }
        Cow::Owned(tmp)
    };

    for (y, dst_row) in dst.chunks_exact_mut(dst_w).enumerate() {
        for (x, dst_pixel) in dst_row.iter_mut().enumerate() {
            *dst_pixel = rows.sample(y, |j| horizontal[j * dst_w + x]);
        }
    }
}

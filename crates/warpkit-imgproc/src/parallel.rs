use rayon::prelude::*;

use warpkit_tensor::Device;

/// Apply a function to every plane of a batched buffer.
///
/// `src` is split into consecutive planes of `src_plane` values and `dst` into
/// planes of `dst_plane` values. On [`Device::Rayon`] the planes are processed on
/// the global rayon pool, on [`Device::Cpu`] one after another. Each plane sees
/// the same computation either way.
pub fn par_iter_planes<T1, T2>(
    device: Device,
    src: &[T1],
    src_plane: usize,
    dst: &mut [T2],
    dst_plane: usize,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Sync,
    T2: Send,
{
    if src_plane == 0 || dst_plane == 0 {
        return;
    }

    match device {
        Device::Rayon => src
            .par_chunks_exact(src_plane)
            .zip(dst.par_chunks_exact_mut(dst_plane))
            .for_each(|(src_chunk, dst_chunk)| f(src_chunk, dst_chunk)),
        Device::Cpu => src
            .chunks_exact(src_plane)
            .zip(dst.chunks_exact_mut(dst_plane))
            .for_each(|(src_chunk, dst_chunk)| f(src_chunk, dst_chunk)),
    }
}

use warpkit_image::SpatialSize;
use warpkit_tensor::{Device, Element, Tensor};

use crate::close::{assert_close, Tolerance};
use crate::ensure;
use crate::error::ContractViolation;

/// The output of a kernel under test.
///
/// Kernels return either a tensor or a tensor plus updated metadata.
pub trait KernelOutput {
    /// Element type of the tensor part.
    type Elem: Element;

    /// The tensor part of the output.
    fn tensor(&self) -> &Tensor<Self::Elem>;

    /// Returns true if the non-tensor parts of two outputs agree.
    fn same_metadata(&self, _other: &Self) -> bool {
        true
    }
}

impl<T: Element> KernelOutput for Tensor<T> {
    type Elem = T;

    fn tensor(&self) -> &Tensor<T> {
        self
    }
}

impl<T: Element> KernelOutput for (Tensor<T>, SpatialSize) {
    type Elem = T;

    fn tensor(&self) -> &Tensor<T> {
        &self.0
    }

    fn same_metadata(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

/// A kernel bound to all of its parameters but the input.
pub type BoundKernel<'a, T, O> = &'a dyn Fn(&Tensor<T>) -> Result<O, ContractViolation>;

/// Which parts of [`check_kernel`] to run.
pub struct KernelChecks<'a, T, O> {
    /// Compare a run on [`Device::Cpu`] with a run on [`Device::Rayon`].
    pub check_devices: bool,
    /// Run the kernel on inputs with leading batch dimensions.
    pub check_batched: bool,
    /// Run the kernel on inputs with an empty batch.
    pub check_degenerate: bool,
    /// The compiled form of the kernel, compared against the eager one.
    pub compiled: Option<BoundKernel<'a, T, O>>,
    /// Tolerance of the compiled comparison.
    pub tolerance: Tolerance,
}

impl<T, O> Default for KernelChecks<'_, T, O> {
    fn default() -> Self {
        Self {
            check_devices: true,
            check_batched: true,
            check_degenerate: true,
            compiled: None,
            tolerance: Tolerance::EXACT,
        }
    }
}

const BATCH_DIMS: [&[usize]; 2] = [&[2], &[2, 1]];
const DEGENERATE_BATCH_DIMS: [&[usize]; 3] = [&[0], &[5, 0], &[0, 5]];

fn check_preserves<T: Element>(
    check: &'static str,
    input: &Tensor<T>,
    output: &Tensor<T>,
) -> Result<(), ContractViolation> {
    ensure!(
        output.dtype() == input.dtype(),
        check,
        "dtype changed from {} to {}",
        input.dtype(),
        output.dtype()
    );
    ensure!(
        output.device() == input.device(),
        check,
        "device changed from {} to {}",
        input.device(),
        output.device()
    );
    Ok(())
}

/// Checks the contracts every kernel must honor.
///
/// - the input is not modified
/// - dtype and device of the input are kept
/// - a serial and a parallel run give identical results
/// - the compiled form agrees with the eager form within the tolerance
/// - leading batch dimensions are transparent, even when empty
///
/// # Errors
///
/// Returns the first [`ContractViolation`] found, or the error of the kernel.
pub fn check_kernel<T, O, E, K>(
    kernel: K,
    input: &Tensor<T>,
    checks: KernelChecks<'_, T, O>,
) -> Result<(), ContractViolation>
where
    T: Element,
    O: KernelOutput<Elem = T>,
    E: Into<ContractViolation>,
    K: Fn(&Tensor<T>) -> Result<O, E>,
{
    let run = |t: &Tensor<T>| -> Result<O, ContractViolation> { kernel(t).map_err(Into::into) };

    let version = input.version();
    let snapshot = input.as_slice().to_vec();
    let expected = run(input)?;
    ensure!(
        input.version() == version && input.as_slice() == snapshot.as_slice(),
        "no_inplace",
        "the kernel modified its input"
    );
    check_preserves("preserves_dtype_and_device", input, expected.tensor())?;

    if checks.check_devices {
        let serial = run(&input.to_device(Device::Cpu))?;
        let parallel = run(&input.to_device(Device::Rayon))?;
        ensure!(
            serial.tensor().device() == Device::Cpu && parallel.tensor().device() == Device::Rayon,
            "device_agreement",
            "outputs were not produced on the input device"
        );
        assert_close(parallel.tensor(), serial.tensor(), Tolerance::EXACT)?;
        ensure!(
            parallel.same_metadata(&serial),
            "device_agreement",
            "metadata differs between devices"
        );
    }

    if let Some(compiled) = checks.compiled {
        log::debug!("comparing compiled kernel on input of shape {:?}", input.shape());
        let actual = compiled(input)?;
        check_preserves("compiled_preserves_dtype_and_device", input, actual.tensor())?;
        assert_close(actual.tensor(), expected.tensor(), checks.tolerance)?;
        ensure!(
            actual.same_metadata(&expected),
            "compiled_agreement",
            "metadata differs from the eager kernel"
        );
    }

    if checks.check_batched {
        for batch_dims in BATCH_DIMS {
            let batched = run(&input.repeat(batch_dims)?)?;
            let shape = [batch_dims, expected.tensor().shape()].concat();
            ensure!(
                batched.tensor().shape() == shape.as_slice(),
                "batched",
                "expected shape {shape:?} for batch dims {batch_dims:?}, got {:?}",
                batched.tensor().shape()
            );
            ensure!(
                batched.same_metadata(&expected),
                "batched",
                "metadata differs for batch dims {batch_dims:?}"
            );
            let sample = expected.tensor().as_slice();
            if !sample.is_empty() {
                for (i, chunk) in batched
                    .tensor()
                    .as_slice()
                    .chunks_exact(sample.len())
                    .enumerate()
                {
                    ensure!(
                        chunk == sample,
                        "batched",
                        "batch entry {i} differs from the unbatched output for batch dims {batch_dims:?}"
                    );
                }
            }
        }
    }

    if checks.check_degenerate {
        for batch_dims in DEGENERATE_BATCH_DIMS {
            let empty = run(&input.repeat(batch_dims)?)?;
            let shape = [batch_dims, expected.tensor().shape()].concat();
            ensure!(
                empty.tensor().shape() == shape.as_slice(),
                "degenerate_batch",
                "expected shape {shape:?} for batch dims {batch_dims:?}, got {:?}",
                empty.tensor().shape()
            );
        }
    }

    Ok(())
}

use warpkit_image::{DataKind, Datapoint};
use warpkit_transforms::dispatch::{KernelId, Signature};
use warpkit_transforms::TransformError;
use warpkit_tensor::Element;

use crate::close::{assert_close, Tolerance};
use crate::ensure;
use crate::error::ContractViolation;
use crate::recorder::{capture, Event};

/// A type no dispatcher accepts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotADatapoint;

/// A dispatcher bound to all of its parameters but the input.
pub type BoundDispatcher<'a, T> =
    &'a dyn Fn(Datapoint<T>) -> Result<Datapoint<T>, TransformError>;

/// A dispatcher entry point taking a value of unknown type.
pub type BoundUnknown<'a, T> =
    &'a dyn Fn(NotADatapoint) -> Result<Datapoint<T>, TransformError>;

/// Which parts of [`check_dispatcher`] to run.
pub struct DispatcherChecks<'a, T> {
    /// The api name the dispatcher must report exactly once per call.
    pub api: Option<&'static str>,
    /// Verify that the registered kernel, and only it, ran.
    pub check_dispatch: bool,
    /// The compiled form of the dispatcher. Exercised for images and plain tensors.
    pub compiled: Option<BoundDispatcher<'a, T>>,
    /// The dispatcher called with [`NotADatapoint`].
    pub unknown: Option<BoundUnknown<'a, T>>,
}

impl<T> Default for DispatcherChecks<'_, T> {
    fn default() -> Self {
        Self {
            api: None,
            check_dispatch: true,
            compiled: None,
            unknown: None,
        }
    }
}

fn check_same_kind<T: Element>(
    check: &'static str,
    input: &Datapoint<T>,
    output: &Datapoint<T>,
) -> Result<(), ContractViolation> {
    ensure!(
        output.kind() == input.kind(),
        check,
        "expected a {} output, got {}",
        input.kind(),
        output.kind()
    );
    if let (Datapoint::BoundingBoxes(before), Datapoint::BoundingBoxes(after)) = (input, output) {
        ensure!(
            before.format() == after.format(),
            check,
            "bounding box format changed from {} to {}",
            before.format(),
            after.format()
        );
    }
    Ok(())
}

/// Checks the contracts every dispatcher must honor for one input.
///
/// - one api usage event per call
/// - exactly the registered kernel runs
/// - the output has the kind of the input and keeps its metadata
/// - the compiled form runs and agrees for images and plain tensors
/// - inputs of unknown type fail with [`TransformError::InvalidType`] naming the type
///
/// Returns the output of the dispatcher.
pub fn check_dispatcher<T, D>(
    dispatcher: D,
    input: Datapoint<T>,
    expected_kernel: KernelId,
    checks: DispatcherChecks<'_, T>,
) -> Result<Datapoint<T>, ContractViolation>
where
    T: Element,
    D: Fn(Datapoint<T>) -> Result<Datapoint<T>, TransformError>,
{
    let (output, events) = capture(|| dispatcher(input.clone()));
    let output = output?;

    if let Some(api) = checks.api {
        let calls: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Api(name) => Some(*name),
                _ => None,
            })
            .collect();
        ensure!(
            calls == [api],
            "logs_api_usage",
            "expected one api usage event for {api}, got {calls:?}"
        );
    }

    if checks.check_dispatch {
        let kernels: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Kernel(name) => Some(*name),
                _ => None,
            })
            .collect();
        ensure!(
            kernels == [expected_kernel.name()],
            "dispatch",
            "expected {expected_kernel} for a {} input, got {kernels:?}",
            input.kind()
        );
    }

    check_same_kind("preserves_kind", &input, &output)?;

    if let Some(compiled) = checks.compiled {
        if matches!(input.kind(), DataKind::Image | DataKind::Tensor) {
            let actual = compiled(input.clone())?;
            check_same_kind("compiled_smoke", &input, &actual)?;
            if let (Some(actual), Some(expected)) = (actual.as_tensor(), output.as_tensor()) {
                assert_close(actual, expected, Tolerance::EXACT)?;
            }
        }
    }

    if let Some(unknown) = checks.unknown {
        let type_name = std::any::type_name::<NotADatapoint>();
        match unknown(NotADatapoint) {
            Err(err @ TransformError::InvalidType(_)) => ensure!(
                err.to_string().contains(type_name),
                "unknown_type",
                "error does not name {type_name}: {err}"
            ),
            Err(err) => {
                return Err(ContractViolation::failed(
                    "unknown_type",
                    format!("expected an invalid type error, got {err}"),
                ))
            }
            Ok(_) => {
                return Err(ContractViolation::failed(
                    "unknown_type",
                    format!("{type_name} was accepted"),
                ))
            }
        }
    }

    Ok(output)
}

/// Checks that the explicit parameters of a kernel appear in the dispatcher
/// parameter list, with the same names and in the same order.
///
/// Parameters the datapoint kind carries itself are not explicit.
pub fn check_dispatcher_signatures_match(
    dispatcher: &Signature,
    kernel: &Signature,
    kind: DataKind,
) -> Result<(), ContractViolation> {
    let explicit = kernel.explicit_params(kind);
    let mut remaining = dispatcher.params.iter();
    for param in &explicit {
        ensure!(
            remaining.any(|p| p == param),
            "signature",
            "parameter {param} of {} is missing from {} or out of order: {:?} vs {:?}",
            kernel.name,
            dispatcher.name,
            explicit,
            dispatcher.params
        );
    }
    Ok(())
}

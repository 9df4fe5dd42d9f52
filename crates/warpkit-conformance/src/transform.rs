use warpkit_image::Datapoint;
use warpkit_tensor::{Element, Tensor};
use warpkit_transforms::{LegacyCompatible, LegacyTransform, Transform, TransformError};

use crate::close::{assert_close, Tolerance};
use crate::ensure;
use crate::error::ContractViolation;

/// Builds a transform, applies it and checks that the output keeps the kind
/// and metadata of the input.
///
/// Applying the transform to a list of copies of the input must give the same
/// result for every copy. Returns the output for `input`.
pub fn check_transform<Tr, T, B>(
    build: B,
    input: Datapoint<T>,
) -> Result<Datapoint<T>, ContractViolation>
where
    Tr: Transform,
    T: Element,
    B: FnOnce() -> Result<Tr, TransformError>,
{
    let transform = build()?;
    let output = transform.forward(input.clone())?;
    ensure!(
        output.kind() == input.kind(),
        "transform_preserves_kind",
        "expected a {} output, got {}",
        input.kind(),
        output.kind()
    );
    if let (Datapoint::BoundingBoxes(before), Datapoint::BoundingBoxes(after)) = (&input, &output)
    {
        ensure!(
            before.format() == after.format(),
            "transform_preserves_kind",
            "bounding box format changed"
        );
    }

    let all = transform.forward_all(vec![input.clone(), input])?;
    let size = output.spatial_size()?;
    for out in &all {
        ensure!(
            out.spatial_size()? == size,
            "forward_all",
            "expected size {size}, got {}",
            out.spatial_size()?
        );
    }
    Ok(output)
}

/// Checks that the legacy counterpart of a transform gives the same result on a
/// plain tensor, through both its eager and compiled paths.
///
/// Both transforms must derive their parameters through the same function.
pub fn check_transform_legacy<Tr, T>(transform: &Tr, input: &Tensor<T>) -> Result<(), ContractViolation>
where
    Tr: Transform + LegacyCompatible,
    T: Element,
{
    let expected = match transform.forward(Datapoint::Tensor(input.clone()))? {
        Datapoint::Tensor(t) => t,
        other => {
            return Err(ContractViolation::failed(
                "legacy",
                format!("a plain tensor came back as {}", other.kind()),
            ))
        }
    };

    ensure!(
        std::ptr::fn_addr_eq(Tr::GET_PARAMS, <Tr::Legacy as LegacyTransform>::GET_PARAMS),
        "legacy_get_params",
        "the legacy transform derives its parameters through a different function"
    );

    let legacy = transform.to_legacy();
    assert_close(&legacy.forward_tensor(input)?, &expected, Tolerance::EXACT)?;
    assert_close(
        &legacy.forward_tensor_compiled(input)?,
        &expected,
        Tolerance::EXACT,
    )?;
    Ok(())
}

use approx::assert_abs_diff_eq;
use warpkit_conformance::{
    assert_close, capture, check_dispatcher, check_dispatcher_signatures_match, check_kernel,
    check_transform, check_transform_legacy,
    inputs::{
        make_bounding_boxes, make_detection_mask, make_image, make_image_pil,
        make_segmentation_mask, make_smooth_image_pil, make_video,
    },
    ContractViolation, DispatcherChecks, Event, KernelChecks, NotADatapoint, Tolerance,
};
use warpkit_image::{
    to_image_tensor, BoundingBoxFormat, DataKind, Datapoint, SpatialSize,
};
use warpkit_imgproc::{
    geometry::{compute_output_size, scale_matrix, transform_bounding_box, SizeArg, SizeSpec},
    interpolation::InterpolationMode,
    resize::{
        resize_bounding_boxes, resize_image, resize_image_pil, resize_mask, resize_video,
    },
};
use warpkit_tensor::{Element, Tensor};
use warpkit_transforms::{
    compiled::compile,
    dispatch::{
        self, kernel_for, KernelId, ResizeExt, DATAPOINT_RESIZE_SIGNATURE, KERNEL_TABLE,
        RESIZE_API, RESIZE_SIGNATURE,
    },
    telemetry::TransformWarning,
    v1, LegacyTransform, Resize,
};

const INPUT_SIZE: (usize, usize) = (17, 11);

const TENSOR_MODES: [InterpolationMode; 4] = [
    InterpolationMode::Nearest,
    InterpolationMode::NearestExact,
    InterpolationMode::Bilinear,
    InterpolationMode::Bicubic,
];

const PIL_ONLY_MODES: [InterpolationMode; 3] = [
    InterpolationMode::Box,
    InterpolationMode::Hamming,
    InterpolationMode::Lanczos,
];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn input_size() -> SpatialSize {
    SpatialSize::from(INPUT_SIZE)
}

/// Size arguments as a caller may write them: an integer, one element
/// sequences and two element sequences.
fn output_sizes() -> Vec<SizeArg> {
    vec![
        17usize.into(),
        vec![17usize].into(),
        [17usize].into(),
        vec![12usize, 13].into(),
        [12usize, 13].into(),
    ]
}

fn output_specs() -> Result<Vec<SizeSpec>, ContractViolation> {
    Ok(output_sizes()
        .into_iter()
        .map(SizeSpec::try_from)
        .collect::<Result<_, _>>()?)
}

fn max_sizes(size: SizeSpec) -> Vec<Option<usize>> {
    match size {
        SizeSpec::Shorter(requested) => vec![None, Some(requested + 1)],
        SizeSpec::Exact { .. } => vec![None],
    }
}

fn make_input(kind: DataKind) -> Result<Datapoint<u8>, ContractViolation> {
    let size = input_size();
    Ok(match kind {
        DataKind::Tensor => Datapoint::Tensor(make_image::<u8>(size, 3, &[])?.into_inner()),
        DataKind::Image => make_image::<u8>(size, 3, &[])?.into(),
        DataKind::BoundingBoxes => {
            make_bounding_boxes::<u8>(size, BoundingBoxFormat::Xyxy, 5, &[])?.into()
        }
        DataKind::Mask => make_segmentation_mask(size, 10, &[])?.into(),
        DataKind::Video => make_video::<u8>(size, 2, 3, &[])?.into(),
        DataKind::Pil => make_image_pil(size, 3)?.into(),
    })
}

fn check_image_kernel<T: Element>() -> Result<(), ContractViolation> {
    let compiled = compile(KernelId::ResizeImage);
    for size in output_specs()? {
        for max_size in max_sizes(size) {
            for interpolation in TENSOR_MODES {
                for antialias in [false, true] {
                    let image = make_image::<T>(input_size(), 3, &[])?;
                    check_kernel(
                        |t: &Tensor<T>| resize_image(t, size, interpolation, max_size, antialias),
                        image.as_tensor(),
                        KernelChecks {
                            compiled: Some(
                                &|t: &Tensor<T>| -> Result<Tensor<T>, ContractViolation> {
                                    Ok(compiled.resize_image(
                                        t,
                                        size,
                                        interpolation,
                                        max_size,
                                        antialias,
                                    )?)
                                },
                            ),
                            ..Default::default()
                        },
                    )?;
                }
            }
        }
    }
    Ok(())
}

#[test]
fn kernel_image_tensor() -> Result<(), ContractViolation> {
    init_logger();
    check_image_kernel::<u8>()?;
    check_image_kernel::<f32>()
}

fn check_bounding_boxes_kernel<T: Element>() -> Result<(), ContractViolation> {
    let compiled = compile(KernelId::ResizeBoundingBoxes);
    let spatial_size = input_size();
    for format in BoundingBoxFormat::ALL {
        for size in output_specs()? {
            for max_size in max_sizes(size) {
                let boxes = make_bounding_boxes::<T>(spatial_size, format, 5, &[])?;
                check_kernel(
                    |t: &Tensor<T>| resize_bounding_boxes(t, format, spatial_size, size, max_size),
                    boxes.as_tensor(),
                    KernelChecks {
                        compiled: Some(
                            &|t: &Tensor<T>| -> Result<(Tensor<T>, SpatialSize), ContractViolation> {
                                Ok(compiled.resize_bounding_boxes(
                                    t,
                                    format,
                                    spatial_size,
                                    size,
                                    max_size,
                                )?)
                            },
                        ),
                        ..Default::default()
                    },
                )?;
            }
        }
    }
    Ok(())
}

#[test]
fn kernel_bounding_boxes() -> Result<(), ContractViolation> {
    init_logger();
    check_bounding_boxes_kernel::<f32>()?;
    check_bounding_boxes_kernel::<i64>()
}

fn check_mask_kernel<T: Element>(mask: &Tensor<T>) -> Result<(), ContractViolation> {
    let compiled = compile(KernelId::ResizeMask);
    for size in output_specs()? {
        for max_size in max_sizes(size) {
            check_kernel(
                |t: &Tensor<T>| resize_mask(t, size, max_size),
                mask,
                KernelChecks {
                    compiled: Some(&|t: &Tensor<T>| -> Result<Tensor<T>, ContractViolation> {
                        Ok(compiled.resize_mask(t, size, max_size)?)
                    }),
                    ..Default::default()
                },
            )?;
        }
    }
    Ok(())
}

#[test]
fn kernel_mask() -> Result<(), ContractViolation> {
    init_logger();
    check_mask_kernel(make_segmentation_mask(input_size(), 10, &[])?.as_tensor())?;
    check_mask_kernel(make_detection_mask(input_size(), 3, &[])?.as_tensor())
}

#[test]
fn kernel_mask_keeps_labels() -> Result<(), ContractViolation> {
    let mask = make_segmentation_mask(input_size(), 4, &[])?;
    let out = resize_mask(mask.as_tensor(), SizeSpec::Shorter(5), None)?;
    assert!(out.as_slice().iter().all(|label| mask.as_slice().contains(label)));
    Ok(())
}

#[test]
fn kernel_video() -> Result<(), ContractViolation> {
    init_logger();
    let compiled = compile(KernelId::ResizeVideo);
    let video = make_video::<u8>(input_size(), 2, 3, &[])?;
    for size in output_specs()? {
        for max_size in max_sizes(size) {
            for interpolation in TENSOR_MODES {
                check_kernel(
                    |t: &Tensor<u8>| resize_video(t, size, interpolation, max_size, true),
                    video.as_tensor(),
                    KernelChecks {
                        compiled: Some(
                            &|t: &Tensor<u8>| -> Result<Tensor<u8>, ContractViolation> {
                                Ok(compiled.resize_video(t, size, interpolation, max_size, true)?)
                            },
                        ),
                        ..Default::default()
                    },
                )?;
            }
        }
    }
    Ok(())
}

#[test]
fn kernel_image_pil() -> Result<(), ContractViolation> {
    init_logger();
    for channels in [1, 2, 3, 4] {
        let pil = make_image_pil(input_size(), channels)?;
        for size in output_specs()? {
            for max_size in max_sizes(size) {
                let expected = compute_output_size(input_size(), size, max_size)?;
                for interpolation in InterpolationMode::ALL {
                    let out = resize_image_pil(&pil, size, interpolation, max_size)?;
                    assert_eq!(
                        (out.height() as usize, out.width() as usize),
                        (expected.height, expected.width),
                        "{interpolation} {size}"
                    );
                    assert_eq!(out.color(), pil.color());
                }
            }
        }
    }
    Ok(())
}

#[test]
fn kernel_pil_only_modes() -> Result<(), ContractViolation> {
    let image = make_image::<u8>(input_size(), 3, &[])?;
    let video = make_video::<u8>(input_size(), 2, 3, &[])?;
    for interpolation in PIL_ONLY_MODES {
        let size = SizeSpec::Shorter(5);
        let err = resize_image(image.as_tensor(), size, interpolation, None, true).unwrap_err();
        assert!(err.to_string().contains(interpolation.name()), "{err}");
        assert!(resize_video(video.as_tensor(), size, interpolation, None, true).is_err());

        let err = dispatch::resize(
            Datapoint::from(image.clone()),
            5usize,
            interpolation,
            None,
            Some(true),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unsupported interpolation mode"), "{err}");

        let pil = make_image_pil(input_size(), 3)?;
        let out = dispatch::resize(Datapoint::<u8>::from(pil), 5usize, interpolation, None, None)?;
        assert_eq!(out.spatial_size()?, SpatialSize::new(7, 5)?);
    }
    Ok(())
}

#[test]
fn kernel_max_size_error() -> Result<(), ContractViolation> {
    let size = SizeSpec::Exact {
        height: 12,
        width: 13,
    };
    let image = make_image::<u8>(input_size(), 3, &[])?;
    let video = make_video::<u8>(input_size(), 2, 3, &[])?;
    let mask = make_segmentation_mask(input_size(), 10, &[])?;
    let boxes = make_bounding_boxes::<f32>(input_size(), BoundingBoxFormat::Xyxy, 3, &[])?;
    let pil = make_image_pil(input_size(), 3)?;
    let max_size = Some(20);

    let errors = [
        resize_image(
            image.as_tensor(),
            size,
            InterpolationMode::Bilinear,
            max_size,
            true,
        )
        .unwrap_err(),
        resize_video(
            video.as_tensor(),
            size,
            InterpolationMode::Bilinear,
            max_size,
            true,
        )
        .unwrap_err(),
        resize_mask(mask.as_tensor(), size, max_size).unwrap_err(),
        resize_bounding_boxes(
            boxes.as_tensor(),
            boxes.format(),
            boxes.spatial_size(),
            size,
            max_size,
        )
        .unwrap_err(),
        resize_image_pil(&pil, size, InterpolationMode::Bilinear, max_size).unwrap_err(),
    ];
    for err in errors {
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("max_size should only be passed"), "{err}");
    }

    let err = resize_image(
        image.as_tensor(),
        SizeSpec::Shorter(12),
        InterpolationMode::Bilinear,
        Some(12),
        true,
    )
    .unwrap_err();
    assert!(err.to_string().contains("must be strictly greater"), "{err}");
    Ok(())
}

#[test]
fn max_size_equal_to_short_edge_plus_one() -> Result<(), ContractViolation> {
    init_logger();
    let requested = input_size().min_edge();
    let max_size = requested + 1;
    for kind in DataKind::ALL {
        let out = dispatch::resize(
            make_input(kind)?,
            requested,
            InterpolationMode::Bilinear,
            Some(max_size),
            Some(true),
        )?;
        assert_eq!(out.spatial_size()?.max_edge(), max_size, "{kind}");
    }
    Ok(())
}

#[test]
fn interpolation_int_codes() -> Result<(), ContractViolation> {
    let image = make_image::<u8>(input_size(), 3, &[])?;
    for interpolation in InterpolationMode::ALL {
        let expected = match interpolation {
            InterpolationMode::NearestExact => InterpolationMode::Nearest,
            other => other,
        };
        assert_eq!(InterpolationMode::try_from(interpolation.code())?, expected);
    }
    for code in [0u32, 2, 3] {
        let mode = InterpolationMode::try_from(code)?;
        let by_code = resize_image(image.as_tensor(), SizeSpec::Shorter(7), mode, None, true)?;
        let by_name = resize_image(
            image.as_tensor(),
            SizeSpec::Shorter(7),
            TENSOR_MODES
                .into_iter()
                .find(|m| m.code() == code)
                .unwrap_or(InterpolationMode::Bilinear),
            None,
            true,
        )?;
        assert_close(&by_code, &by_name, Tolerance::EXACT)?;
    }
    assert!(InterpolationMode::try_from(42u32).is_err());
    Ok(())
}

#[test]
fn image_correctness_against_pil() -> Result<(), ContractViolation> {
    init_logger();
    let pil = make_smooth_image_pil(input_size());
    let image = to_image_tensor(&pil)?;
    for interpolation in [InterpolationMode::Bilinear, InterpolationMode::Bicubic] {
        for size in output_specs()? {
            for max_size in max_sizes(size) {
                let actual = resize_image(image.as_tensor(), size, interpolation, max_size, true)?;
                let expected = to_image_tensor(&*resize_image_pil(
                    &pil,
                    size,
                    interpolation,
                    max_size,
                )?)?;
                assert_close(&actual, expected.as_tensor(), Tolerance::atol(2.0))?;
            }
        }
    }
    Ok(())
}

#[test]
fn bounding_boxes_correctness() -> Result<(), ContractViolation> {
    let spatial_size = input_size();
    for format in BoundingBoxFormat::ALL {
        let boxes = make_bounding_boxes::<f64>(spatial_size, format, 6, &[])?;
        for size in output_specs()? {
            for max_size in max_sizes(size) {
                let (actual, new_size) = resize_bounding_boxes(
                    boxes.as_tensor(),
                    format,
                    spatial_size,
                    size,
                    max_size,
                )?;
                assert_eq!(new_size, compute_output_size(spatial_size, size, max_size)?);

                let m = scale_matrix(
                    new_size.width as f64 / spatial_size.width as f64,
                    new_size.height as f64 / spatial_size.height as f64,
                );
                for (bbox, out) in boxes
                    .as_slice()
                    .chunks_exact(4)
                    .zip(actual.as_slice().chunks_exact(4))
                {
                    let expected = transform_bounding_box(
                        [bbox[0], bbox[1], bbox[2], bbox[3]],
                        format,
                        new_size,
                        &m,
                    );
                    for (a, e) in out.iter().zip(expected) {
                        assert_abs_diff_eq!(*a, e, epsilon = 1e-9);
                    }
                }
            }
        }
    }
    Ok(())
}

fn check_dispatcher_for(kind: DataKind, size: SizeSpec) -> Result<(), ContractViolation> {
    let expected_kernel = kernel_for(kind).ok_or_else(|| {
        ContractViolation::failed("kernel_table", format!("no kernel registered for {kind}"))
    })?;
    for max_size in max_sizes(size) {
        let out = check_dispatcher(
            |dp| dispatch::resize(dp, size, InterpolationMode::Bilinear, max_size, Some(true)),
            make_input(kind)?,
            expected_kernel,
            DispatcherChecks {
                api: Some(RESIZE_API),
                compiled: Some(&|dp: Datapoint<u8>| {
                    dispatch::resize_compiled(
                        dp,
                        size,
                        InterpolationMode::Bilinear,
                        max_size,
                        Some(true),
                    )
                }),
                unknown: Some(&|x: NotADatapoint| {
                    dispatch::resize_any::<u8, _>(
                        x,
                        size,
                        InterpolationMode::Bilinear,
                        max_size,
                        Some(true),
                    )
                }),
                ..Default::default()
            },
        )?;
        assert_eq!(
            out.spatial_size()?,
            compute_output_size(input_size(), size, max_size)?
        );
    }
    Ok(())
}

#[test]
fn dispatcher() -> Result<(), ContractViolation> {
    init_logger();
    for kind in DataKind::ALL {
        for size in output_specs()? {
            check_dispatcher_for(kind, size)?;
        }
    }
    Ok(())
}

#[test]
fn dispatcher_bounding_boxes_update_spatial_size() -> Result<(), ContractViolation> {
    for format in BoundingBoxFormat::ALL {
        let boxes = make_bounding_boxes::<f32>(input_size(), format, 4, &[2])?;
        let out = dispatch::resize(
            Datapoint::from(boxes),
            [12usize, 13],
            InterpolationMode::Nearest,
            None,
            None,
        )?;
        let Datapoint::BoundingBoxes(out) = out else {
            return Err(ContractViolation::failed("kind", "expected bounding boxes"));
        };
        assert_eq!(out.format(), format);
        assert_eq!(out.spatial_size(), SpatialSize::new(12, 13)?);
        assert_eq!(out.shape(), &[2, 4, 4]);
    }
    Ok(())
}

#[test]
fn dispatcher_signatures() -> Result<(), ContractViolation> {
    for (kind, kernel) in KERNEL_TABLE {
        check_dispatcher_signatures_match(&RESIZE_SIGNATURE, kernel.signature(), *kind)?;
        check_dispatcher_signatures_match(
            &DATAPOINT_RESIZE_SIGNATURE,
            kernel.signature(),
            *kind,
        )?;
    }
    Ok(())
}

#[test]
fn datapoint_method_matches_dispatcher() -> Result<(), ContractViolation> {
    for kind in DataKind::ALL {
        let input = make_input(kind)?;
        let ((by_method, by_dispatcher), events) = capture(|| {
            (
                input.clone().resize(12usize, InterpolationMode::Nearest, None, None),
                dispatch::resize(input.clone(), 12usize, InterpolationMode::Nearest, None, None),
            )
        });
        let (by_method, by_dispatcher) = (by_method?, by_dispatcher?);
        assert_eq!(by_method.kind(), by_dispatcher.kind());
        assert_eq!(by_method.spatial_size()?, by_dispatcher.spatial_size()?);
        if let (Some(a), Some(b)) = (by_method.as_tensor(), by_dispatcher.as_tensor()) {
            assert_close(a, b, Tolerance::EXACT)?;
        }
        // only the dispatcher reports api usage
        let calls = events.iter().filter(|e| matches!(e, Event::Api(_))).count();
        assert_eq!(calls, 1);
    }
    Ok(())
}

fn count_warnings(events: &[Event], warning: TransformWarning) -> usize {
    events
        .iter()
        .filter(|e| **e == Event::Warning(warning))
        .count()
}

#[test]
fn antialias_warning() -> Result<(), ContractViolation> {
    init_logger();
    for kind in [DataKind::Tensor, DataKind::Image, DataKind::Video] {
        for (interpolation, antialias, expected) in [
            (InterpolationMode::Bilinear, None, 1),
            (InterpolationMode::Bicubic, None, 1),
            (InterpolationMode::Bilinear, Some(true), 0),
            (InterpolationMode::Bilinear, Some(false), 0),
            (InterpolationMode::Nearest, None, 0),
        ] {
            let (out, events) = capture(|| {
                dispatch::resize(make_input(kind)?, 12usize, interpolation, None, antialias)
                    .map_err(ContractViolation::from)
            });
            out?;
            assert_eq!(
                count_warnings(&events, TransformWarning::AntialiasDefault),
                expected,
                "{kind} {interpolation} {antialias:?}"
            );
        }
    }

    for kind in [DataKind::Mask, DataKind::BoundingBoxes] {
        let (out, events) = capture(|| {
            dispatch::resize(make_input(kind)?, 12usize, InterpolationMode::Bilinear, None, None)
                .map_err(ContractViolation::from)
        });
        out?;
        assert!(events.iter().all(|e| !matches!(e, Event::Warning(_))), "{kind}");
    }
    Ok(())
}

#[test]
fn pil_antialias_warning() -> Result<(), ContractViolation> {
    for (antialias, expected) in [(Some(false), 1), (Some(true), 0), (None, 0)] {
        let (out, events) = capture(|| {
            dispatch::resize(
                make_input(DataKind::Pil)?,
                12usize,
                InterpolationMode::Bilinear,
                None,
                antialias,
            )
            .map_err(ContractViolation::from)
        });
        out?;
        assert_eq!(
            count_warnings(&events, TransformWarning::PilAntialiasIgnored),
            expected,
            "{antialias:?}"
        );
        assert_eq!(count_warnings(&events, TransformWarning::AntialiasDefault), 0);
    }
    Ok(())
}

#[test]
fn noop_resize_is_identity() -> Result<(), ContractViolation> {
    let requested = input_size().min_edge();
    for kind in DataKind::ALL {
        let input = make_input(kind)?;
        let out = dispatch::resize(
            input.clone(),
            requested,
            InterpolationMode::Bicubic,
            None,
            Some(true),
        )?;
        assert_eq!(out.kind(), kind);
        assert_eq!(out.spatial_size()?, input_size());
        match (&input, &out) {
            (Datapoint::Pil(a), Datapoint::Pil(b)) => assert_eq!(a.as_bytes(), b.as_bytes()),
            _ => {
                let (Some(a), Some(b)) = (input.as_tensor(), out.as_tensor()) else {
                    return Err(ContractViolation::failed("noop", "missing tensor"));
                };
                assert!(b.shares_storage(a), "{kind}");
            }
        }
    }
    Ok(())
}

#[test]
fn transform() -> Result<(), ContractViolation> {
    init_logger();
    for size in output_sizes() {
        let spec = SizeSpec::try_from(size.clone())?;
        for max_size in max_sizes(spec) {
            for kind in DataKind::ALL {
                let out = check_transform(
                    || Resize::new(size.clone(), InterpolationMode::Bilinear, max_size, Some(true)),
                    make_input(kind)?,
                )?;
                assert_eq!(
                    out.spatial_size()?,
                    Resize::get_params(input_size(), spec, max_size)?
                );
            }

            let transform =
                Resize::new(size.clone(), InterpolationMode::Bicubic, max_size, Some(true))?;
            let image = make_image::<f32>(input_size(), 3, &[2])?;
            check_transform_legacy(&transform, image.as_tensor())?;
        }
    }
    Ok(())
}

#[test]
fn transform_rejects_bad_arguments() {
    let bad: [(SizeArg, Option<usize>); 5] = [
        (vec![12usize, 13, 14].into(), None),
        (Vec::<usize>::new().into(), None),
        (0usize.into(), None),
        ([12usize, 13].into(), Some(20)),
        (12usize.into(), Some(12)),
    ];
    for (size, max_size) in bad {
        let err =
            Resize::new(size.clone(), InterpolationMode::Bilinear, max_size, None).unwrap_err();
        assert!(err.is_invalid_argument(), "{size:?} {max_size:?}: {err}");
        assert!(v1::Resize::new(size, InterpolationMode::Bilinear, max_size, None).is_err());
    }
}

#[test]
fn transform_get_params_match_legacy() -> Result<(), ContractViolation> {
    for (height, width) in [(17, 11), (11, 17), (8, 8), (1, 40)] {
        let input = SpatialSize::new(height, width)?;
        for size in output_specs()? {
            for max_size in max_sizes(size) {
                assert_eq!(
                    Resize::get_params(input, size, max_size)?,
                    (v1::Resize::GET_PARAMS)(input, size, max_size)?
                );
            }
        }
    }
    Ok(())
}

#[test]
fn resize_shorter_edge_keeps_aspect_ratio() -> Result<(), ContractViolation> {
    let out = compute_output_size(input_size(), SizeSpec::Shorter(12), None)?;
    assert_eq!((out.height, out.width), (18, 12));
    let out = compute_output_size(input_size(), SizeSpec::Shorter(12), Some(13))?;
    assert_eq!((out.height, out.width), (13, 8));
    Ok(())
}

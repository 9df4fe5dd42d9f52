use warpkit_image::DataKind;

/// Identifies a kernel of the kernel table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelId {
    /// [`warpkit_imgproc::resize::resize_image`]
    ResizeImage,
    /// [`warpkit_imgproc::resize::resize_bounding_boxes`]
    ResizeBoundingBoxes,
    /// [`warpkit_imgproc::resize::resize_mask`]
    ResizeMask,
    /// [`warpkit_imgproc::resize::resize_video`]
    ResizeVideo,
    /// [`warpkit_imgproc::resize::resize_image_pil`]
    ResizeImagePil,
}

impl KernelId {
    /// Every kernel, in declaration order.
    pub const ALL: [KernelId; 5] = [
        KernelId::ResizeImage,
        KernelId::ResizeBoundingBoxes,
        KernelId::ResizeMask,
        KernelId::ResizeVideo,
        KernelId::ResizeImagePil,
    ];

    /// The function name of the kernel.
    pub fn name(&self) -> &'static str {
        self.signature().name
    }

    /// The declared parameter list of the kernel.
    pub fn signature(&self) -> &'static Signature {
        match self {
            KernelId::ResizeImage => &RESIZE_IMAGE_SIGNATURE,
            KernelId::ResizeBoundingBoxes => &RESIZE_BOUNDING_BOXES_SIGNATURE,
            KernelId::ResizeMask => &RESIZE_MASK_SIGNATURE,
            KernelId::ResizeVideo => &RESIZE_VIDEO_SIGNATURE,
            KernelId::ResizeImagePil => &RESIZE_IMAGE_PIL_SIGNATURE,
        }
    }
}

impl std::fmt::Display for KernelId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The parameter list of a dispatcher, kernel or datapoint method.
///
/// `input` names the positional input, `params` lists the remaining parameters
/// in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Function name
    pub name: &'static str,
    /// Name of the input parameter
    pub input: &'static str,
    /// Remaining parameters in order
    pub params: &'static [&'static str],
}

impl Signature {
    /// The parameters without those carried implicitly by a datapoint kind.
    ///
    /// ```
    /// use warpkit_image::DataKind;
    /// use warpkit_transforms::dispatch::KernelId;
    ///
    /// let sig = KernelId::ResizeBoundingBoxes.signature();
    /// assert_eq!(sig.explicit_params(DataKind::BoundingBoxes), ["size", "max_size"]);
    /// ```
    pub fn explicit_params(&self, kind: DataKind) -> Vec<&'static str> {
        let metadata = kind.metadata_fields();
        self.params
            .iter()
            .copied()
            .filter(|p| !metadata.contains(p))
            .collect()
    }
}

const RESIZE_PARAMS: &[&str] = &["size", "interpolation", "max_size", "antialias"];

/// Signature of [`crate::dispatch::resize`].
pub const RESIZE_SIGNATURE: Signature = Signature {
    name: "resize",
    input: "input",
    params: RESIZE_PARAMS,
};

/// Signature of [`crate::dispatch::ResizeExt::resize`].
pub const DATAPOINT_RESIZE_SIGNATURE: Signature = Signature {
    name: "Datapoint::resize",
    input: "self",
    params: RESIZE_PARAMS,
};

/// Signature of the image kernel.
pub const RESIZE_IMAGE_SIGNATURE: Signature = Signature {
    name: "resize_image",
    input: "image",
    params: RESIZE_PARAMS,
};

/// Signature of the bounding box kernel.
pub const RESIZE_BOUNDING_BOXES_SIGNATURE: Signature = Signature {
    name: "resize_bounding_boxes",
    input: "boxes",
    params: &["format", "spatial_size", "size", "max_size"],
};

/// Signature of the mask kernel.
pub const RESIZE_MASK_SIGNATURE: Signature = Signature {
    name: "resize_mask",
    input: "mask",
    params: &["size", "max_size"],
};

/// Signature of the video kernel.
pub const RESIZE_VIDEO_SIGNATURE: Signature = Signature {
    name: "resize_video",
    input: "video",
    params: RESIZE_PARAMS,
};

/// Signature of the `image` crate kernel.
pub const RESIZE_IMAGE_PIL_SIGNATURE: Signature = Signature {
    name: "resize_image_pil",
    input: "image",
    params: &["size", "interpolation", "max_size"],
};

/// The resize kernel registered for every datapoint kind.
///
/// Plain tensors are treated as images.
pub const KERNEL_TABLE: &[(DataKind, KernelId)] = &[
    (DataKind::Tensor, KernelId::ResizeImage),
    (DataKind::Image, KernelId::ResizeImage),
    (DataKind::BoundingBoxes, KernelId::ResizeBoundingBoxes),
    (DataKind::Mask, KernelId::ResizeMask),
    (DataKind::Video, KernelId::ResizeVideo),
    (DataKind::Pil, KernelId::ResizeImagePil),
];

/// Looks up the kernel registered for `kind`.
pub fn kernel_for(kind: DataKind) -> Option<KernelId> {
    KERNEL_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, id)| *id)
}

use thiserror::Error;

use crate::{device::Device, element::DType, element::Element, storage::TensorStorage};

/// An error type for tensor operations.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// Tensor shape does not match the provided data.
    ///
    /// The product of the shape dimensions must equal the number of elements.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// Index exceeds tensor bounds.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: usize,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// Tensor dimensions incompatible for the requested operation.
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },

    /// Operation not supported for this tensor configuration.
    #[error("Unsupported operation: {operation} - {reason}")]
    UnsupportedOperation {
        /// Name of the operation that failed
        operation: String,
        /// Reason why the operation is not supported
        reason: String,
    },
}

impl TensorError {
    /// Creates an InvalidShape error with clear context.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates an IndexOutOfBounds error with clear context.
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }

    /// Creates an UnsupportedOperation error with context.
    pub fn unsupported_operation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Returns a user-friendly suggestion for resolving the error.
    pub fn suggestion(&self) -> &str {
        match self {
            Self::InvalidShape { .. } => {
                "Ensure the product of shape dimensions equals the number of data elements"
            }
            Self::IndexOutOfBounds { .. } => {
                "Verify indices are within bounds (0 <= index < dimension_size)"
            }
            Self::DimensionMismatch { .. } => {
                "Check the number of trailing dimensions the operation expects"
            }
            Self::UnsupportedOperation { .. } => {
                "Check API documentation for operation requirements and supported configurations"
            }
        }
    }
}

/// Computes the strides for a row-major (C-contiguous) tensor layout.
///
/// ```rust
/// use warpkit_tensor::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape(&[2, 3, 4]), vec![12, 4, 1]);
/// ```
pub fn get_strides_from_shape(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A dynamic-rank, row-major tensor.
///
/// Storage is shared between clones. Every mutable access goes through
/// [`Tensor::as_slice_mut`], which detaches shared storage and bumps the revision
/// returned by [`Tensor::version`].
#[derive(Debug)]
pub struct Tensor<T> {
    storage: TensorStorage<T>,
    shape: Vec<usize>,
    strides: Vec<usize>,
    device: Device,
    version: u64,
}

impl<T> Tensor<T> {
    /// Creates a tensor from a shape and an owned vector.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::InvalidShape`] if the data length does not match the shape.
    pub fn from_shape_vec(shape: &[usize], data: Vec<T>) -> Result<Self, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        Ok(Self {
            storage: TensorStorage::from_vec(data),
            shape: shape.to_vec(),
            strides: get_strides_from_shape(shape),
            device: Device::Cpu,
            version: 0,
        })
    }

    /// Creates a tensor filled by calling `f` with each multi-index in row-major order.
    pub fn from_shape_fn<F>(shape: &[usize], mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        let numel = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(numel);
        let mut index = vec![0usize; shape.len()];
        for _ in 0..numel {
            data.push(f(&index));
            for d in (0..shape.len()).rev() {
                index[d] += 1;
                if index[d] < shape[d] {
                    break;
                }
                index[d] = 0;
            }
        }
        Self {
            storage: TensorStorage::from_vec(data),
            shape: shape.to_vec(),
            strides: get_strides_from_shape(shape),
            device: Device::Cpu,
            version: 0,
        }
    }

    /// Returns the same tensor tagged with another device, sharing storage.
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// The shape of the tensor.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The row-major strides of the tensor.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of dimensions.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    #[inline]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// The device the tensor is tagged with.
    #[inline]
    pub fn device(&self) -> Device {
        self.device
    }

    /// Revision counter, bumped on every mutable access.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The element data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Pointer to the first element. Two tensors with equal pointers share storage.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Returns true if both tensors share the same allocation.
    pub fn shares_storage(&self, other: &Tensor<T>) -> bool {
        self.storage.ptr_eq(&other.storage)
    }

    /// Returns a reference to the element at `index`.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for ((&i, &size), &stride) in index.iter().zip(&self.shape).zip(&self.strides) {
            if i >= size {
                return None;
            }
            offset += i * stride;
        }
        self.as_slice().get(offset)
    }

    /// Splits the shape into a flattened batch count and the `trailing` last dims.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::DimensionMismatch`] if the tensor has fewer than
    /// `trailing` dimensions.
    pub fn split_batch(&self, trailing: usize) -> Result<(usize, &[usize]), TensorError> {
        if self.ndim() < trailing {
            return Err(TensorError::dimension_mismatch(
                format!("expected at least {trailing} dimensions"),
                &vec![0; trailing],
                &self.shape,
            ));
        }
        let split = self.ndim() - trailing;
        let batch = self.shape[..split].iter().product();
        Ok((batch, &self.shape[split..]))
    }

    /// Returns a tensor with a new shape sharing the same storage.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::InvalidShape`] if the number of elements differs.
    pub fn reshape(&self, shape: &[usize]) -> Result<Tensor<T>, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != self.numel() {
            return Err(TensorError::invalid_shape(numel, self.numel()));
        }
        Ok(Self {
            storage: self.storage.clone(),
            shape: shape.to_vec(),
            strides: get_strides_from_shape(shape),
            device: self.device,
            version: self.version,
        })
    }
}

impl<T: Clone> Tensor<T> {
    /// Creates a tensor filled with `value`.
    pub fn from_shape_val(shape: &[usize], value: T) -> Self {
        let numel = shape.iter().product::<usize>();
        Self {
            storage: TensorStorage::from_vec(vec![value; numel]),
            shape: shape.to_vec(),
            strides: get_strides_from_shape(shape),
            device: Device::Cpu,
            version: 0,
        }
    }

    /// Creates a tensor filled with the default value of `T`.
    pub fn zeros(shape: &[usize]) -> Self
    where
        T: Default,
    {
        Self::from_shape_val(shape, T::default())
    }

    /// Mutable access to the data. Detaches shared storage and bumps the revision.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        self.version += 1;
        self.storage.make_mut()
    }

    /// Copies the tensor onto `device`. Returns a shared clone if already there.
    pub fn to_device(&self, device: Device) -> Tensor<T> {
        if device == self.device {
            return self.clone();
        }
        Self {
            storage: TensorStorage::from_vec(self.as_slice().to_vec()),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            device,
            version: 0,
        }
    }

    /// Prepends `batch_dims` to the shape, repeating the data once per batch entry.
    ///
    /// ```rust
    /// use warpkit_tensor::Tensor;
    ///
    /// let t = Tensor::from_shape_vec(&[2], vec![1u8, 2]).unwrap();
    /// let r = t.repeat(&[3]).unwrap();
    /// assert_eq!(r.shape(), &[3, 2]);
    /// assert_eq!(r.as_slice(), &[1, 2, 1, 2, 1, 2]);
    /// ```
    pub fn repeat(&self, batch_dims: &[usize]) -> Result<Tensor<T>, TensorError> {
        let copies = batch_dims.iter().product::<usize>();
        let mut data = Vec::with_capacity(copies * self.numel());
        for _ in 0..copies {
            data.extend_from_slice(self.as_slice());
        }
        let shape = [batch_dims, self.shape()].concat();
        Ok(Tensor::from_shape_vec(&shape, data)?.with_device(self.device))
    }

    /// Applies `f` to every element, keeping shape and device.
    pub fn map<U, F>(&self, f: F) -> Tensor<U>
    where
        F: Fn(&T) -> U,
    {
        Tensor {
            storage: TensorStorage::from_vec(self.as_slice().iter().map(f).collect()),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            device: self.device,
            version: 0,
        }
    }

    /// Consumes the tensor and returns the underlying vector.
    pub fn into_vec(self) -> Vec<T> {
        self.storage.into_vec()
    }
}

impl<T: Element> Tensor<T> {
    /// The runtime element type.
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Casts every element through `f64` into `U`.
    pub fn cast<U: Element>(&self) -> Tensor<U> {
        self.map(|&x| U::from_f64(x.to_f64()))
    }
}

impl<T> Clone for Tensor<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            device: self.device,
            version: self.version,
        }
    }
}

//! Arc-based storage shared between tensor clones.
//!
//! Clones only bump a reference count. Writers go through
//! [`TensorStorage::make_mut`], which copies the buffer first when it is shared, so
//! a kernel holding a clone of its input can never observe or cause mutation.

use std::sync::Arc;

/// Reference-counted, copy-on-write element buffer.
#[derive(Debug)]
pub struct TensorStorage<T> {
    inner: Arc<Vec<T>>,
}

impl<T> TensorStorage<T> {
    /// Wraps an owned vector.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            inner: Arc::new(data),
        }
    }

    /// Number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true when the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the buffer as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }

    /// Returns the pointer to the first element.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.inner.as_ptr()
    }

    /// Returns true if both storages point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of tensors currently sharing this buffer.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T: Clone> TensorStorage<T> {
    /// Returns a mutable slice, detaching from other owners first.
    pub fn make_mut(&mut self) -> &mut [T] {
        Arc::make_mut(&mut self.inner).as_mut_slice()
    }

    /// Consumes the storage and returns the vector, copying only if shared.
    pub fn into_vec(self) -> Vec<T> {
        Arc::try_unwrap(self.inner).unwrap_or_else(|shared| shared.as_ref().clone())
    }
}

impl<T> Clone for TensorStorage<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

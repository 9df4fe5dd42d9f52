#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `warpkit-tensor` provides the buffer type every transform kernel consumes: a
//! row-major, dynamic-rank array whose storage is shared behind an `Arc`.
//!
//! - **Tensor**: shape, shared storage, device tag and a revision counter
//! - **Element**: the closed set of element types a kernel may see
//! - **Device**: where the kernel executes (`Cpu` serially, `Rayon` on the pool)
//!
//! Clones are cheap and share storage. Mutable access is copy-on-write and bumps
//! the revision, so callers can verify that a kernel did not touch its input.
//!
//! ```rust
//! use warpkit_tensor::{Device, Tensor};
//!
//! let t = Tensor::<u8>::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
//! assert_eq!(t.shape(), &[2, 3]);
//! assert_eq!(t.get(&[1, 2]), Some(&6));
//! assert_eq!(t.device(), Device::Cpu);
//!
//! let batched = t.repeat(&[2, 1]).unwrap();
//! assert_eq!(batched.shape(), &[2, 1, 2, 3]);
//! ```

/// Device module containing the execution device tag.
pub mod device;

/// Element module containing the supported element types.
pub mod element;

/// Storage module containing the shared, copy-on-write buffer.
pub mod storage;

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

pub use crate::device::Device;
pub use crate::element::{DType, Element};
pub use crate::storage::TensorStorage;
pub use crate::tensor::{get_strides_from_shape, Tensor, TensorError};

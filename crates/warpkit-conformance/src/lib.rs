#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Every check returns `Result<(), ContractViolation>` so a test can propagate
//! the first broken contract with `?`.
//!
//! - [`check_kernel`]: non-mutation, dtype and device preservation, serial vs
//!   parallel and compiled vs eager agreement, batch transparency
//! - [`check_dispatcher`]: telemetry, routing, kind preservation, unknown inputs
//! - [`check_dispatcher_signatures_match`]: parameter lists of dispatcher and kernel
//! - [`check_transform`] and [`check_transform_legacy`]: transform objects

/// Float comparison with tolerances.
pub mod close;

/// Dispatcher checks.
pub mod dispatcher;

/// Error types for the conformance checks.
pub mod error;

/// Deterministic input factories.
pub mod inputs;

/// Kernel checks.
pub mod kernel;

/// Telemetry recording for the current thread.
pub mod recorder;

/// Transform checks.
pub mod transform;

pub use crate::close::{assert_close, Tolerance};
pub use crate::dispatcher::{
    check_dispatcher, check_dispatcher_signatures_match, DispatcherChecks, NotADatapoint,
};
pub use crate::error::ContractViolation;
pub use crate::kernel::{check_kernel, KernelChecks, KernelOutput};
pub use crate::recorder::{capture, Event};
pub use crate::transform::{check_transform, check_transform_legacy};

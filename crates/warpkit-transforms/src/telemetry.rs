use std::sync::{Arc, PoisonError, RwLock};

/// Receiver of usage events and warnings.
///
/// Install one with [`set_telemetry_sink`]. Every dispatcher call reports one
/// [`TelemetrySink::api_usage`] event and one [`TelemetrySink::kernel_invoked`]
/// event per kernel it runs.
pub trait TelemetrySink: Send + Sync {
    /// A public entry point was called.
    fn api_usage(&self, api: &'static str);

    /// A kernel from the kernel table ran.
    fn kernel_invoked(&self, _kernel: &'static str) {}

    /// A non-fatal warning was raised.
    fn warning(&self, _warning: &TransformWarning) {}
}

/// Non-fatal conditions reported while dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformWarning {
    /// `antialias` was left unset for a bilinear or bicubic resize of a tensor backed input.
    AntialiasDefault,
    /// `antialias` was disabled for an `image` crate input, which always antialiases.
    PilAntialiasIgnored,
}

impl std::fmt::Display for TransformWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TransformWarning::AntialiasDefault => write!(
                f,
                "The default value of the antialias parameter of all the resizing transforms \
                 is unset and treated as false for tensor inputs. Set antialias explicitly \
                 to silence this warning."
            ),
            TransformWarning::PilAntialiasIgnored => write!(
                f,
                "Anti-alias option is always applied for PIL Image input. \
                 Argument antialias is ignored."
            ),
        }
    }
}

static SINK: RwLock<Option<Arc<dyn TelemetrySink>>> = RwLock::new(None);

fn current_sink() -> Option<Arc<dyn TelemetrySink>> {
    SINK.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Installs the process wide telemetry sink and returns the previous one.
///
/// Pass `None` to disable telemetry.
pub fn set_telemetry_sink(
    sink: Option<Arc<dyn TelemetrySink>>,
) -> Option<Arc<dyn TelemetrySink>> {
    let mut guard = SINK.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *guard, sink)
}

/// Reports one call of a public entry point.
pub fn log_api_usage_once(api: &'static str) {
    log::trace!("api usage: {api}");
    if let Some(sink) = current_sink() {
        sink.api_usage(api);
    }
}

pub(crate) fn report_kernel(kernel: &'static str) {
    if let Some(sink) = current_sink() {
        sink.kernel_invoked(kernel);
    }
}

pub(crate) fn warn(warning: TransformWarning) {
    log::warn!("{warning}");
    if let Some(sink) = current_sink() {
        sink.warning(&warning);
    }
}

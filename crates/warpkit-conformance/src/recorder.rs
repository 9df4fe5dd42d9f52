use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::thread::{self, ThreadId};

use warpkit_transforms::telemetry::{set_telemetry_sink, TelemetrySink, TransformWarning};

/// A telemetry event seen by the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A public entry point was called.
    Api(&'static str),
    /// A kernel ran.
    Kernel(&'static str),
    /// A warning was raised.
    Warning(TransformWarning),
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<(ThreadId, Event)>>,
}

impl RecordingSink {
    fn push(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((thread::current().id(), event));
    }

    fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn since(&self, mark: usize, thread: ThreadId) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .skip(mark)
            .filter(|(id, _)| *id == thread)
            .map(|(_, event)| event.clone())
            .collect()
    }
}

impl TelemetrySink for RecordingSink {
    fn api_usage(&self, api: &'static str) {
        self.push(Event::Api(api));
    }

    fn kernel_invoked(&self, kernel: &'static str) {
        self.push(Event::Kernel(kernel));
    }

    fn warning(&self, warning: &TransformWarning) {
        self.push(Event::Warning(*warning));
    }
}

static RECORDER: OnceLock<Arc<RecordingSink>> = OnceLock::new();

fn recorder() -> &'static Arc<RecordingSink> {
    RECORDER.get_or_init(|| {
        let sink = Arc::new(RecordingSink::default());
        if set_telemetry_sink(Some(sink.clone())).is_some() {
            log::warn!("replaced an installed telemetry sink with the conformance recorder");
        }
        sink
    })
}

/// Runs `f` and returns its result with the telemetry events it raised.
///
/// The recorder is installed as the process wide sink on first use. Only events
/// raised on the calling thread are returned, so captures in concurrently
/// running tests do not see each other.
///
/// ```
/// use warpkit_conformance::{capture, Event};
/// use warpkit_transforms::telemetry::log_api_usage_once;
///
/// let ((), events) = capture(|| log_api_usage_once("my_api"));
/// assert_eq!(events, [Event::Api("my_api")]);
/// ```
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<Event>) {
    let sink = recorder();
    let mark = sink.len();
    let result = f();
    (result, sink.since(mark, thread::current().id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use warpkit_transforms::telemetry::log_api_usage_once;

    #[test]
    fn capture_filters_other_threads() {
        let ((), events) = capture(|| {
            thread::spawn(|| log_api_usage_once("elsewhere"))
                .join()
                .unwrap();
            log_api_usage_once("here");
        });
        assert_eq!(events, [Event::Api("here")]);
    }
}

use crate::{Output, Severity};

/// Default output that forwards every line to [`tracing`] under the `step_meter` target.
///
/// Detail lines become `TRACE` events, info lines `INFO` events and warnings `WARN` events.
/// The output tag is attached as the `tag` field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingOutput;

impl Output for TracingOutput {
    #[cfg_attr(test, mutants::skip)] // Events go to the subscriber, there is nothing to assert on.
    fn log(&self, severity: Severity, tag: &str, message: &str) {
        match severity {
            Severity::Detail => tracing::trace!(target: "step_meter", tag, "{message}"),
            Severity::Info => tracing::info!(target: "step_meter", tag, "{message}"),
            Severity::Warning => tracing::warn!(target: "step_meter", tag, "{message}"),
        }
    }
}

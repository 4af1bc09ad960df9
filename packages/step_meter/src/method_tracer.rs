use std::fmt::Debug;
use std::path::Path;

use crate::Result;

/// Hook that starts and stops an external method tracer around the outermost session.
///
/// The meter calls [`start_tracing()`](Self::start_tracing) when the first session of an
/// idle meter starts and [`stop_tracing()`](Self::stop_tracing) when that session ends,
/// provided `Config::tracing_enabled` is set. Tracing is best-effort: errors are logged
/// and never affect the measurements.
pub trait MethodTracer: Debug + Send {
    /// Starts tracing, writing the trace to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracer could not start. The meter logs and ignores it.
    fn start_tracing(&mut self, path: &Path) -> Result<()>;

    /// Stops tracing.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracer could not stop. The meter logs and ignores it.
    fn stop_tracing(&mut self) -> Result<()>;
}

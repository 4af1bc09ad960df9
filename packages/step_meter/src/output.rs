use std::fmt::Debug;

use crate::Severity;

/// Destination for report lines.
///
/// Implementations receive one call per line and must tolerate rapid, repeated calls.
/// The meter never reads anything back.
pub trait Output: Debug + Send {
    /// Emits one line of a report.
    fn log(&self, severity: Severity, tag: &str, message: &str);
}

use std::fmt::{self, Display};
use std::sync::{Arc, Mutex};

use crate::{ERR_POISONED_LOCK, Output, Severity};

/// One line captured by a [`MemoryOutput`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapturedLine {
    severity: Severity,
    tag: String,
    message: String,
}

impl CapturedLine {
    /// Severity the line was emitted with.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Output tag the line was emitted with.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Text of the line.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Output that keeps every line in memory.
///
/// Clones share the same buffer, so you can hand one clone to a meter and inspect
/// the captured lines through another.
///
/// # Examples
///
/// ```
/// use step_meter::{MemoryOutput, Meter};
///
/// let output = MemoryOutput::new();
///
/// let mut meter = Meter::new();
/// meter.set_output(Box::new(output.clone()));
///
/// meter.start_log("parse");
/// meter.beat_log("tokenize");
/// meter.finish();
///
/// assert!(output.contains("tokenize"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryOutput {
    lines: Arc<Mutex<Vec<CapturedLine>>>,
}

impl MemoryOutput {
    /// Creates an empty output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line captured so far.
    #[must_use]
    pub fn lines(&self) -> Vec<CapturedLine> {
        self.lines.lock().expect(ERR_POISONED_LOCK).clone()
    }

    /// Whether any captured line contains `needle` in its message.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines
            .lock()
            .expect(ERR_POISONED_LOCK)
            .iter()
            .any(|line| line.message.contains(needle))
    }

    /// Discards every captured line.
    pub fn clear(&self) {
        self.lines.lock().expect(ERR_POISONED_LOCK).clear();
    }
}

impl Output for MemoryOutput {
    fn log(&self, severity: Severity, tag: &str, message: &str) {
        self.lines
            .lock()
            .expect(ERR_POISONED_LOCK)
            .push(CapturedLine {
                severity,
                tag: tag.to_string(),
                message: message.to_string(),
            });
    }
}

impl Display for MemoryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines.lock().expect(ERR_POISONED_LOCK).iter() {
            writeln!(f, "{} : {} : {}", line.severity, line.tag, line.message)?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn clones_share_lines() {
        let output = MemoryOutput::new();
        let clone = output.clone();

        clone.log(Severity::Info, "meter", "hello");
        clone.log(Severity::Warning, "meter", "skipped");

        let lines = output.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].severity(), Severity::Info);
        assert_eq!(lines[0].tag(), "meter");
        assert_eq!(lines[1].message(), "skipped");
        assert!(output.contains("hell"));
        assert!(!output.contains("absent"));
    }

    #[test]
    fn display_lists_lines() {
        let output = MemoryOutput::new();
        output.log(Severity::Detail, "tag", "row");

        assert_eq!(output.to_string(), "detail : tag : row\n");

        output.clear();
        assert!(output.to_string().is_empty());
    }

    static_assertions::assert_impl_all!(MemoryOutput: Send, Sync);
}

use crate::Severity;

const DELIMITER_LENGTH: usize = 80;

/// One formatted line of a [`Report`](crate::Report).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportLine {
    severity: Severity,
    text: String,
}

impl ReportLine {
    pub(crate) fn new(severity: Severity, text: String) -> Self {
        Self { severity, text }
    }

    /// A line of dashes separating the sections of a report.
    pub(crate) fn delimiter() -> Self {
        Self::new(Severity::Detail, "-".repeat(DELIMITER_LENGTH))
    }

    /// Severity the line is emitted with.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Text of the line.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

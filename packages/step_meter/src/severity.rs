use std::fmt::{self, Display};

/// How important a report line is.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum Severity {
    /// Per-step rows and delimiters.
    Detail,

    /// Summary and top-N lines.
    Info,

    /// Rows of skipped steps.
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Detail => "detail",
            Self::Info => "info",
            Self::Warning => "warning",
        };

        f.write_str(name)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn ordered_by_importance() {
        assert!(Severity::Detail < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
    }

    #[test]
    fn display_names() {
        assert_eq!(Severity::Detail.to_string(), "detail");
        assert_eq!(Severity::Info.to_string(), "info");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}

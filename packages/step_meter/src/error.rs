use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by the collaborators of a meter.
///
/// The meter itself never returns these to its callers: collaborator failures are logged
/// and otherwise ignored, because measurements must not depend on best-effort extras.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A method tracer could not start tracing.
    #[error("could not start method tracing to '{}': {reason}", path.display())]
    TracingStart {
        /// The trace file the tracer was asked to write.
        path: PathBuf,

        /// A human-readable description of the problem.
        reason: String,
    },

    /// A method tracer could not stop tracing.
    #[error("could not stop method tracing: {reason}")]
    TracingStop {
        /// A human-readable description of the problem.
        reason: String,
    },
}

/// A specialized `Result` type for collaborator operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn messages_name_the_problem() {
        let start = Error::TracingStart {
            path: PathBuf::from("/tmp/trace.out"),
            reason: "disk full".to_string(),
        };
        assert_eq!(
            start.to_string(),
            "could not start method tracing to '/tmp/trace.out': disk full"
        );

        let stop = Error::TracingStop {
            reason: "not tracing".to_string(),
        };
        assert_eq!(stop.to_string(), "could not stop method tracing: not tracing");
    }
}

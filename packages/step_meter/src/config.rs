use std::env;
use std::path::PathBuf;

use crate::ClockSource;

/// Default output tag attached to every report line.
pub const DEFAULT_OUTPUT_TAG: &str = "meter";

/// Default number of events a session can hold.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Default number of longest steps listed in a report.
pub const DEFAULT_TOP_N_LONGEST: i32 = 5;

const DEFAULT_TRACE_FILE_NAME: &str = "dmtrace.trace";

/// Report layout and recording behavior of a [`Meter`](crate::Meter).
///
/// Changes take effect for reports generated afterwards. The clock selection and the event
/// stream sizing take effect when the next session starts on an idle meter.
///
/// Invalid values never cause failures: a non-positive `top_n_longest` disables the
/// top-N section and a zero `event_capacity` still leaves room for the start event.
#[derive(Clone, Debug, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "configuration is meant to be built with struct update syntax from the default"
)]
pub struct Config {
    /// Tag passed to the output with every line.
    pub output_tag: String,

    /// Whether to call the method tracer around the outermost session.
    pub tracing_enabled: bool,

    /// File the method tracer writes to.
    pub tracing_file_path: PathBuf,

    /// Show a grid of raw timestamps, one cell per event, on every row.
    pub show_steps_grid: bool,

    /// Show the time from the session start to each step.
    pub show_accumulated_time: bool,

    /// Show each step's share of the session total, in percent.
    pub show_cost_percent: bool,

    /// Show each step's own duration.
    pub show_cost_time: bool,

    /// Show the log message (or default label) of each step.
    pub show_log_message: bool,

    /// Show the final total and step count after the rows.
    pub show_summary: bool,

    /// Start every row with a `| ` marker.
    pub show_row_marker: bool,

    /// How many of the longest steps to list after the summary. Zero or less disables the list.
    pub top_n_longest: i32,

    /// Read the general-purpose monotonic clock instead of the high-resolution OS clock.
    pub use_alternate_clock: bool,

    /// Number of events preallocated per session.
    pub event_capacity: usize,

    /// Grow the event stream when it is full instead of treating overflow as a fatal error.
    pub growable_event_stream: bool,
}

impl Config {
    /// Restores every option to its default value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The default location of the method trace file.
    #[must_use]
    pub fn default_tracing_file_path() -> PathBuf {
        env::temp_dir().join(DEFAULT_TRACE_FILE_NAME)
    }

    /// The number of top-N entries to show, or `None` if the list is disabled.
    #[must_use]
    pub fn top_n(&self) -> Option<usize> {
        usize::try_from(self.top_n_longest)
            .ok()
            .filter(|&count| count > 0)
    }

    /// The clock source this configuration selects.
    #[must_use]
    pub fn clock_source(&self) -> ClockSource {
        ClockSource::from_alternate_flag(self.use_alternate_clock)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_tag: DEFAULT_OUTPUT_TAG.to_string(),
            tracing_enabled: false,
            tracing_file_path: Self::default_tracing_file_path(),
            show_steps_grid: false,
            show_accumulated_time: false,
            show_cost_percent: true,
            show_cost_time: true,
            show_log_message: true,
            show_summary: true,
            show_row_marker: true,
            top_n_longest: DEFAULT_TOP_N_LONGEST,
            use_alternate_clock: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            growable_event_stream: false,
        }
    }
}

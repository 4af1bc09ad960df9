#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Step and loop timing for micro-benchmarks, with formatted cost reports.
//!
//! A [`Meter`] records timestamped events into a stack of sessions. Each session is a flat
//! list of steps: you mark the end of every step of interest and the report shows how long
//! each one took, what share of the session it represents and which steps were the most
//! expensive. Loops get their own statistics (average, minimum and maximum iteration time),
//! with endless loops keeping only their most recent iterations in a fixed-size ring.
//!
//! The core types are:
//! - [`Meter`] - The session stack and the recording API
//! - [`Report`] - Statistics of one session, emitted line by line to an [`Output`]
//! - [`Config`] - Report columns, top-N list size, clock selection and event stream sizing
//! - [`Registry`] - One meter per execution context, for code that cannot pass a meter around
//!
//! This package is meant for development and benchmarking, not for production telemetry.
//!
//! # Simple usage
//!
//! ```
//! use step_meter::{MemoryOutput, Meter};
//!
//! let output = MemoryOutput::new();
//!
//! let mut meter = Meter::new();
//! meter.set_output(Box::new(output.clone()));
//!
//! meter.start_log("import");
//!
//! let rows = (0..1_000).map(|i| i * 2).collect::<Vec<_>>();
//! meter.beat_log("generate rows");
//!
//! let total: u64 = rows.iter().sum();
//! meter.beat_log("sum rows");
//!
//! println!("{total}");
//! meter.skip_log("print");
//!
//! meter.finish();
//!
//! // Every line of the report went to the output.
//! assert!(output.contains("generate rows"));
//! assert!(output.contains("final: "));
//! ```
//!
//! # Loops
//!
//! Declare the expected iteration count, or open an endless loop if it is not known in
//! advance. Mark the end of every iteration with [`Meter::recap()`].
//!
//! ```
//! use step_meter::Meter;
//!
//! let mut meter = Meter::new();
//! meter.start();
//!
//! meter.loop_log(10, "fixed");
//! for _ in 0..10 {
//!     meter.recap();
//! }
//! meter.unloop();
//!
//! meter.loop_endless();
//! for _ in 0..1_000 {
//!     meter.recap();
//! }
//! meter.unloop_log("endless");
//!
//! let report = meter.report();
//! let closing = report.steps().last().unwrap();
//! assert!(closing.log().contains("calls:1000"));
//!
//! meter.end();
//! meter.pop();
//! ```
//!
//! # Output
//!
//! By default reports go to [`tracing`](https://docs.rs/tracing) under the `step_meter`
//! target: step rows at `TRACE`, the summary and top-N list at `INFO` and skipped steps at
//! `WARN`. Install a [`MemoryOutput`] or your own [`Output`] to send them elsewhere.
//!
//! # Threading
//!
//! A meter belongs to one thread at a time. Either pass it around explicitly, look it up in
//! a [`Registry`] keyed by whatever identifies your execution context, or use
//! [`with_thread_meter()`] for a meter that lives as long as the current thread.

mod calibration;
mod clock;
mod clock_source;
mod config;
mod error;
mod event;
mod event_kind;
mod event_stream;
mod loop_buffer;
mod measure;
mod memory_output;
mod meter;
mod method_tracer;
mod noop_tracer;
mod output;
mod pal;
mod registry;
mod report;
mod report_line;
mod severity;
mod step;
mod step_row;
mod tracing_output;
mod units;

pub use calibration::Calibration;
pub use clock::Clock;
pub use clock_source::ClockSource;
pub use config::{Config, DEFAULT_EVENT_CAPACITY, DEFAULT_OUTPUT_TAG, DEFAULT_TOP_N_LONGEST};
pub use error::{Error, Result};
pub use event::Event;
pub use event_kind::EventKind;
pub use event_stream::EventStream;
pub use loop_buffer::{DEFAULT_ENDLESS_CAPACITY, LoopBuffer, LoopSummary, chronological_to_physical};
pub(crate) use measure::Record;
pub use measure::{Measure, SessionId};
pub use memory_output::{CapturedLine, MemoryOutput};
pub use meter::{LOOP_ENDLESS, Meter};
pub use method_tracer::MethodTracer;
pub use noop_tracer::NoopTracer;
pub use output::Output;
pub use registry::{Registry, with_thread_meter};
pub use report::Report;
pub use report_line::ReportLine;
pub use severity::Severity;
pub use step::Step;
pub use step_row::StepRow;
pub use tracing_output::TracingOutput;
pub use units::percent;

pub(crate) const ERR_POISONED_LOCK: &str =
    "encountered poisoned lock - program validity cannot be guaranteed";

use std::time::Duration;

use crate::{Config, EventKind, Measure, StepRow, percent};

/// One report row, derived from one event of a session.
///
/// The duration of a step is the time between the previous event and this one. The first
/// event of a session (its start) has a duration of zero.
#[derive(Clone, Debug)]
pub struct Step {
    index: usize,
    kind: EventKind,
    timestamp: u64,
    total: u64,
    accumulated: u64,
    skipped: u64,
    cost_percent: f64,
    log: String,
}

impl Step {
    /// Derives the step for the event at `index` of `measure`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a recorded event of `measure`.
    pub(crate) fn new(measure: &Measure, index: usize) -> Self {
        let events = measure.events();

        let event = events
            .get(index)
            .expect("steps are only derived from recorded events");
        let previous = events
            .get(index.saturating_sub(1))
            .expect("the previous index is recorded if the current one is");

        let timestamp = event.timestamp();
        let previous_timestamp = previous.timestamp();

        let start = measure.start();
        let end = measure.last_timestamp();

        let total = timestamp.saturating_sub(previous_timestamp);
        let skipped = if event.is_excluded() { total } else { 0 };

        Self {
            index,
            kind: event.kind(),
            timestamp,
            total,
            accumulated: timestamp.saturating_sub(start),
            skipped,
            cost_percent: percent(timestamp, start, end) - percent(previous_timestamp, start, end),
            log: label(measure, index, event.kind()),
        }
    }

    /// Position of the event in the session.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// What the underlying event represents.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Clock reading of the underlying event, in nanoseconds.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Time since the previous event.
    #[must_use]
    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.total)
    }

    /// Time since the session started.
    #[must_use]
    pub fn accumulated(&self) -> Duration {
        Duration::from_nanos(self.accumulated)
    }

    /// Whether the step was recorded with `skip()` and is excluded from the session total.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self.kind, EventKind::Exclude)
    }

    /// The part of the step's duration excluded from the session total.
    #[must_use]
    pub fn skipped(&self) -> Duration {
        Duration::from_nanos(self.skipped)
    }

    /// The step's share of the session, in percent.
    #[must_use]
    pub fn cost_percent(&self) -> f64 {
        self.cost_percent
    }

    /// Log text of the row: the attached message or a default label, prefixed with the
    /// loop statistics for steps that close a loop.
    #[must_use]
    pub fn log(&self) -> &str {
        &self.log
    }

    pub(crate) fn skipped_nanos(&self) -> u64 {
        self.skipped
    }

    /// Duration that counts when ranking steps by cost.
    pub(crate) fn cost_nanos(&self) -> u64 {
        self.total.saturating_sub(self.skipped)
    }

    /// Formats the step as a report row with the columns enabled in `config`.
    ///
    /// `event_count` is the number of events in the session and sizes the steps grid.
    #[must_use]
    pub fn row<'a>(&'a self, config: &'a Config, event_count: usize) -> StepRow<'a> {
        StepRow::new(self, config, event_count)
    }
}

/// Default label for an event without a log message.
fn label(measure: &Measure, index: usize, kind: EventKind) -> String {
    let body = match measure.events().log(index).filter(|message| !message.is_empty()) {
        Some(message) => message.to_string(),
        None if matches!(kind, EventKind::LoopStart { .. }) => format!("loop #{index}"),
        None => format!("step #{index}"),
    };

    // Loop statistics belong to the row that closes the loop.
    match kind {
        EventKind::LoopEnd { start_index } => match measure.loop_at(start_index) {
            Some(buffer) => format!("{}{body}", buffer.summary()),
            None => body,
        },
        _ => body,
    }
}

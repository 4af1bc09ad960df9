use std::cmp::Ordering;
use std::num::NonZero;
use std::time::Duration;

use crate::pal::PlatformFacade;
use crate::{
    Calibration, Clock, Config, Measure, MethodTracer, NoopTracer, Output, Record, Report,
    SessionId, TracingOutput,
};

/// Loop size that requests an endless loop, for callers that pass the size around as a number.
///
/// Any negative size means the same; this value exists so call sites can say what they mean.
pub const LOOP_ENDLESS: i64 = -1000;

// Start, beat, skip, loop start, loop end and end of the calibration session.
const CALIBRATION_EVENT_CAPACITY: usize = 6;

/// A stack of measurement sessions for one execution context.
///
/// Sessions are opened with [`start()`](Self::start) and nest: every recording operation
/// applies to the most recently started session that has not been popped yet. A meter with
/// no open session is idle; recording on an idle meter is a caller bug and panics with a
/// message naming the operation.
///
/// Every recording operation has a `_log` form that records the event and then attaches a
/// message to it, shown in the report in place of the default `step #N` label.
///
/// The meter is meant to be owned by one thread at a time. Use a
/// [`Registry`](crate::Registry) to share meters keyed by execution context or
/// [`with_thread_meter()`](crate::with_thread_meter) for one meter per thread.
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
///
/// meter.loop_count(3);
/// for token in ["a", "b", "c"] {
///     let _ = token.len();
///     meter.recap();
/// }
/// meter.unloop_log("tokens");
///
/// meter.skip_log("write debug dump");
/// meter.finish();
///
/// assert!(!meter.is_tracking());
/// assert!(output.contains("tokens"));
/// ```
#[derive(Debug)]
pub struct Meter {
    sessions: Vec<Measure>,
    config: Config,
    clock: Clock,
    output: Box<dyn Output>,
    tracer: Box<dyn MethodTracer>,

    // Whether the tracer was started for the current outermost session and not stopped yet.
    tracing_active: bool,

    calibration: Option<Calibration>,
}

impl Meter {
    /// Creates an idle meter with the default configuration, reporting through `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an idle meter with the given configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self::with_platform(PlatformFacade::real(), config)
    }

    pub(crate) fn with_platform(platform: PlatformFacade, config: Config) -> Self {
        Self {
            sessions: Vec::new(),
            clock: Clock::with_platform(platform, config.clock_source()),
            config,
            output: Box::new(TracingOutput),
            tracer: Box::new(NoopTracer),
            tracing_active: false,
            calibration: None,
        }
    }

    /// Starts a new session on top of the stack and records its start event.
    ///
    /// Valid in any state. When the meter was idle, the clock source is re-read from the
    /// configuration and the method tracer is started if tracing is enabled.
    ///
    /// The returned identifier is the stack position of the new session. It is only good for
    /// comparing against [`current_id()`](Self::current_id) later.
    pub fn start(&mut self) -> SessionId {
        self.push_session(
            self.config.event_capacity,
            self.config.growable_event_stream,
            self.config.tracing_enabled,
        )
    }

    fn push_session(&mut self, event_capacity: usize, growable: bool, trace: bool) -> SessionId {
        if self.sessions.is_empty() {
            self.clock = self.fresh_clock();

            if trace {
                self.start_tracing();
            }
        }

        let id = SessionId::new(self.sessions.len());
        let timestamp = self.clock.now();

        self.sessions
            .push(Measure::new(id, timestamp, event_capacity, growable));

        tracing::debug!(session = %id, depth = self.sessions.len(), "session started");

        id
    }

    /// Starts a new session and attaches `message` to its start event.
    pub fn start_log(&mut self, message: impl Into<String>) -> SessionId {
        let id = self.start();
        self.log(message);
        id
    }

    /// Records a step whose duration counts towards the session total.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn beat(&mut self) {
        self.record("beat()", Record::Include);
    }

    /// Records a counted step and attaches `message` to it.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn beat_log(&mut self, message: impl Into<String>) {
        self.beat();
        self.log(message);
    }

    /// Records a step whose duration is excluded from the session total.
    ///
    /// The step is still listed in the report, at warning severity.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn skip(&mut self) {
        self.record("skip()", Record::Exclude);
    }

    /// Records an excluded step and attaches `message` to it.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn skip_log(&mut self, message: impl Into<String>) {
        self.skip();
        self.log(message);
    }

    /// Opens a loop of unknown length. Only the most recent iterations are kept.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn loop_endless(&mut self) {
        self.loop_count(LOOP_ENDLESS);
    }

    /// Opens a loop that is expected to run `count` iterations.
    ///
    /// A negative `count` opens an endless loop. Iterations beyond `count` are counted
    /// and overwrite the oldest stored ones.
    ///
    /// # Panics
    ///
    /// Panics if no session is open or if `count` is larger than `u32::MAX`.
    pub fn loop_count(&mut self, count: i64) {
        self.record("loop()", Record::LoopStart { declared: count });
    }

    /// Opens a loop and attaches `message` to it. See [`loop_count()`](Self::loop_count).
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn loop_log(&mut self, count: i64, message: impl Into<String>) {
        self.loop_count(count);
        self.log(message);
    }

    /// Marks the end of one iteration of the innermost open loop.
    ///
    /// Does nothing if no loop is open.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn recap(&mut self) {
        self.record("recap()", Record::Recap);
    }

    /// Marks the end of one iteration and attaches `message` to the most recent step.
    ///
    /// Iterations do not take a step of their own, so the message lands on whatever step
    /// was recorded last.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn recap_log(&mut self, message: impl Into<String>) {
        self.recap();
        self.log(message);
    }

    /// Closes the innermost open loop.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn unloop(&mut self) {
        self.record("unloop()", Record::LoopEnd);
    }

    /// Closes the innermost open loop and attaches `message` to the closing step. The loop
    /// statistics are shown in front of the message.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn unloop_log(&mut self, message: impl Into<String>) {
        self.unloop();
        self.log(message);
    }

    /// Attaches `message` to the most recently recorded step, replacing any earlier message.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn log(&mut self, message: impl Into<String>) {
        self.open_session_mut("log()").attach_log(message.into());
    }

    /// Records the end event of the current session. Does not generate a report.
    ///
    /// Stops the method tracer if this ends the outermost session.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn end(&mut self) {
        self.record("end()", Record::End);

        if self.sessions.len() == 1 {
            self.stop_tracing();
        }
    }

    /// Records the end event and attaches `message` to it.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn end_log(&mut self, message: impl Into<String>) {
        self.end();
        self.log(message);
    }

    /// Generates the report of the current session and emits it to the configured output.
    ///
    /// Does not change the session stack and can be called any number of times.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn stats(&self) {
        self.report_for("stats()").emit(self.output.as_ref());
    }

    /// Generates the report of the current session and emits it to `output`.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn stats_to(&self, output: &dyn Output) {
        self.report_for("stats_to()").emit(output);
    }

    /// Generates the report of the current session without emitting it.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    #[must_use]
    pub fn report(&self) -> Report {
        self.report_for("report()")
    }

    /// Ends the current session, emits its report and pops it.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn finish(&mut self) {
        self.end();
        self.stats();
        self.pop();
    }

    /// Like [`finish()`](Self::finish) but attaches `message` to the end event first.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn finish_log(&mut self, message: impl Into<String>) {
        self.end_log(message);
        self.stats();
        self.pop();
    }

    /// Removes the current session. The session started before it becomes current again.
    ///
    /// # Panics
    ///
    /// Panics if no session is open.
    pub fn pop(&mut self) {
        let Some(popped) = self.sessions.pop() else {
            panic!("pop() requires an open session");
        };

        tracing::debug!(session = %popped.id(), depth = self.sessions.len(), "session popped");

        if self.sessions.is_empty() {
            // Covers an outermost session popped without end().
            self.stop_tracing();
        }
    }

    /// Discards every session except the current one. Does nothing on an idle meter.
    pub fn clear(&mut self) {
        let keep_from = self.sessions.len().saturating_sub(1);

        if keep_from > 0 {
            self.sessions.drain(..keep_from);
            tracing::debug!(discarded = keep_from, "nested sessions cleared");
        }
    }

    /// Measures the cost of one call of each recording primitive.
    ///
    /// Runs a complete throwaway session (`start`, `beat`, `log`, `skip`, `loop`, `recap`,
    /// `unloop`, `end`, `pop`) on top of the stack, timing every call separately. The stack
    /// is left as it was. The result is also kept as [`last_calibration()`](Self::last_calibration).
    ///
    /// The throwaway session ignores the configured event capacity and never starts the
    /// method tracer.
    pub fn calibrate(&mut self) -> Calibration {
        let stopwatch = self.fresh_clock();

        let mut previous = stopwatch.now();
        let mut lap = || {
            let now = stopwatch.now();
            let elapsed = now.saturating_sub(previous);
            previous = now;
            Duration::from_nanos(elapsed)
        };

        self.push_session(CALIBRATION_EVENT_CAPACITY, false, false);
        let start = lap();
        self.beat();
        let beat = lap();
        self.log("calibrate");
        let log = lap();
        self.skip();
        let skip = lap();
        self.loop_endless();
        let loop_start = lap();
        self.recap();
        let recap = lap();
        self.unloop();
        let unloop = lap();
        self.end();
        let end = lap();
        self.pop();
        let pop = lap();

        let calibration = Calibration {
            start,
            beat,
            log,
            skip,
            loop_start,
            recap,
            unloop,
            end,
            pop,
        };

        tracing::debug!(%calibration, "meter calibrated");

        self.calibration = Some(calibration);
        calibration
    }

    /// The result of the most recent [`calibrate()`](Self::calibrate) call, if any.
    #[must_use]
    pub fn last_calibration(&self) -> Option<Calibration> {
        self.calibration
    }

    /// Compares the combined duration of two sets of steps of the current session.
    ///
    /// `left` and `right` are step indexes. Each side's total is divided by `accuracy`
    /// (rounding down) before comparing, so differences smaller than `accuracy` compare as
    /// equal. A zero `accuracy` compares exact nanoseconds.
    ///
    /// # Panics
    ///
    /// Panics if no session is open or if an index is not a recorded step of the current session.
    #[must_use]
    pub fn compare(&self, left: &[usize], right: &[usize], accuracy: Duration) -> Ordering {
        let measure = self.open_session("compare()");

        let left = u128::from(sum_step_durations(measure, left));
        let right = u128::from(sum_step_durations(measure, right));

        let Some(unit) = NonZero::new(accuracy.as_nanos()) else {
            return left.cmp(&right);
        };

        (left / unit).cmp(&(right / unit))
    }

    /// Whether at least one session is open.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Number of open sessions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.sessions.len()
    }

    /// Identifier of the current session, if any.
    #[must_use]
    pub fn current_id(&self) -> Option<SessionId> {
        self.sessions.last().map(Measure::id)
    }

    /// The current session, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Measure> {
        self.sessions.last()
    }

    /// The clock of the current measurement run.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration. See [`Config`] for when changes take effect.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Restores the default configuration.
    pub fn reset_config(&mut self) {
        self.config.reset();
    }

    /// Replaces the output that [`stats()`](Self::stats) emits to.
    pub fn set_output(&mut self, output: Box<dyn Output>) {
        self.output = output;
    }

    /// Restores the default output, which forwards to `tracing`.
    pub fn reset_output(&mut self) {
        self.output = Box::new(TracingOutput);
    }

    /// Replaces the method tracer used when `Config::tracing_enabled` is set.
    pub fn set_tracer(&mut self, tracer: Box<dyn MethodTracer>) {
        self.tracer = tracer;
    }

    fn record(&mut self, operation: &str, record: Record) {
        let timestamp = self.clock.now();
        self.open_session_mut(operation).record(timestamp, record);
    }

    fn open_session(&self, operation: &str) -> &Measure {
        self.sessions
            .last()
            .unwrap_or_else(|| panic!("{operation} requires an open session"))
    }

    fn open_session_mut(&mut self, operation: &str) -> &mut Measure {
        self.sessions
            .last_mut()
            .unwrap_or_else(|| panic!("{operation} requires an open session"))
    }

    fn fresh_clock(&self) -> Clock {
        Clock::with_platform(self.clock.platform().clone(), self.config.clock_source())
    }

    fn report_for(&self, operation: &str) -> Report {
        Report::generate(self.open_session(operation), &self.config)
    }

    fn start_tracing(&mut self) {
        let path = &self.config.tracing_file_path;

        match self.tracer.start_tracing(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "method tracing started");
                self.tracing_active = true;
            }
            Err(error) => tracing::warn!(%error, "continuing without method tracing"),
        }
    }

    fn stop_tracing(&mut self) {
        if !self.tracing_active {
            return;
        }

        self.tracing_active = false;

        match self.tracer.stop_tracing() {
            Ok(()) => tracing::debug!("method tracing stopped"),
            Err(error) => tracing::warn!(%error, "ignoring method tracer failure"),
        }
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

fn sum_step_durations(measure: &Measure, indexes: &[usize]) -> u64 {
    let events = measure.events();

    indexes
        .iter()
        .map(|&index| {
            let event = events.get(index).unwrap_or_else(|| {
                panic!(
                    "compare() step index {index} is not recorded in session {}",
                    measure.id()
                )
            });

            let previous = events
                .get(index.saturating_sub(1))
                .expect("the previous index is recorded if the current one is");

            event.timestamp().saturating_sub(previous.timestamp())
        })
        .fold(0, u64::saturating_add)
}

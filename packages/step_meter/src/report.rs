use std::cmp::Reverse;
use std::fmt::{self, Display};
use std::time::Duration;

use crate::units::{SKIPPED_NOISE_NANOS, nanos_to_millis};
use crate::{Config, Measure, Output, ReportLine, SessionId, Severity, Step};

/// Statistics of one session, ready to be emitted line by line.
///
/// A report is a snapshot: it is generated from the events recorded up to the moment it
/// is requested and is not affected by anything recorded later.
///
/// # Examples
///
/// ```
/// use step_meter::Meter;
///
/// let mut meter = Meter::new();
///
/// meter.start_log("startup");
/// meter.beat_log("load config");
/// meter.skip_log("warm caches");
/// meter.end();
///
/// let report = meter.report();
/// assert_eq!(report.steps().len(), 4);
/// assert!(report.final_duration() <= report.total());
///
/// for line in report.lines() {
///     println!("{}", line.text());
/// }
///
/// meter.pop();
/// ```
#[derive(Debug)]
pub struct Report {
    session: SessionId,
    tag: String,
    steps: Vec<Step>,
    total: u64,
    skipped: u64,

    // Indexes of the longest non-skipped steps, longest first.
    longest: Vec<usize>,

    lines: Vec<ReportLine>,
}

impl Report {
    pub(crate) fn generate(measure: &Measure, config: &Config) -> Self {
        let event_count = measure.events().len();

        let steps = (0..event_count)
            .map(|index| Step::new(measure, index))
            .collect::<Vec<_>>();

        let total = measure.total();
        let skipped = steps
            .iter()
            .map(Step::skipped_nanos)
            .fold(0, u64::saturating_add);

        let longest = config
            .top_n()
            .map(|count| select_longest(&steps, count))
            .unwrap_or_default();

        let mut lines = Vec::with_capacity(event_count.saturating_add(longest.len()).saturating_add(5));

        for step in &steps {
            let severity = if step.is_skipped() {
                Severity::Warning
            } else {
                Severity::Detail
            };

            lines.push(ReportLine::new(severity, step.row(config, event_count).to_string()));
        }

        if config.show_summary {
            lines.push(ReportLine::delimiter());
            lines.push(ReportLine::new(
                Severity::Info,
                Summary {
                    total,
                    skipped,
                    steps: event_count,
                }
                .to_string(),
            ));
        }

        if config.top_n().is_some() {
            lines.push(ReportLine::delimiter());

            for (rank, &index) in (1_usize..).zip(&longest) {
                let step = steps
                    .get(index)
                    .expect("longest steps are selected from this list");

                lines.push(ReportLine::new(
                    Severity::Info,
                    format!("top-{rank}: {}", step.row(config, event_count)),
                ));
            }
        }

        lines.push(ReportLine::delimiter());

        Self {
            session: measure.id(),
            tag: config.output_tag.clone(),
            steps,
            total,
            skipped,
            longest,
            lines,
        }
    }

    /// The session the report was generated for.
    #[must_use]
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// One step per recorded event, in chronological order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Time from the session start to its most recent event.
    #[must_use]
    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.total)
    }

    /// Sum of the durations of all skipped steps.
    #[must_use]
    pub fn skipped(&self) -> Duration {
        Duration::from_nanos(self.skipped)
    }

    /// The session total without the skipped steps.
    #[must_use]
    pub fn final_duration(&self) -> Duration {
        Duration::from_nanos(self.total.saturating_sub(self.skipped))
    }

    /// The longest non-skipped steps, longest first. Empty if the top-N list is disabled.
    pub fn longest(&self) -> impl Iterator<Item = &Step> {
        self.longest
            .iter()
            .filter_map(|&index| self.steps.get(index))
    }

    /// The formatted lines of the report, in emission order.
    #[must_use]
    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    /// Sends every line to `output`, tagged with the output tag the report was generated with.
    pub fn emit(&self, output: &dyn Output) {
        for line in &self.lines {
            output.log(line.severity(), &self.tag, line.text());
        }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line.text())?;
        }

        Ok(())
    }
}

struct Summary {
    total: u64,
    skipped: u64,
    steps: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "final: {:.3} ms",
            nanos_to_millis(self.total.saturating_sub(self.skipped))
        )?;

        if self.skipped > SKIPPED_NOISE_NANOS {
            write!(f, " (-{:.3} ms)", nanos_to_millis(self.skipped))?;
        }

        write!(f, ", steps: {}", self.steps)
    }
}

/// Picks the indexes of up to `count` non-skipped steps with the largest cost, largest first.
///
/// Steps of equal cost keep their chronological order.
fn select_longest(steps: &[Step], count: usize) -> Vec<usize> {
    let mut candidates = steps
        .iter()
        .filter(|step| !step.is_skipped())
        .collect::<Vec<_>>();

    candidates.sort_by_key(|step| Reverse(step.cost_nanos()));

    candidates
        .into_iter()
        .take(count)
        .map(Step::index)
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{MemoryOutput, Record};

    const MS: u64 = 1_000_000;

    // start 0 | beat 1 ms | skip 4 ms | beat 6 ms | beat 10 ms | end 10.5 ms
    fn measure() -> Measure {
        let mut measure = Measure::new(SessionId::new(0), 0, 32, false);
        measure.record(MS, Record::Include);
        measure.record(4 * MS, Record::Exclude);
        measure.record(6 * MS, Record::Include);
        measure.record(10 * MS, Record::Include);
        measure.record(10 * MS + MS / 2, Record::End);
        measure
    }

    #[test]
    fn skipped_time_is_subtracted_from_total() {
        let report = Report::generate(&measure(), &Config::default());

        assert_eq!(report.total(), Duration::from_micros(10_500));
        assert_eq!(report.skipped(), Duration::from_millis(3));
        assert_eq!(report.final_duration(), Duration::from_micros(7_500));
    }

    #[test]
    fn lines_in_emission_order() {
        let report = Report::generate(&measure(), &Config::default());
        let lines = report.lines();

        // 6 rows, delimiter, summary, delimiter, 5 top entries, closing delimiter.
        assert_eq!(lines.len(), 15);

        assert_eq!(lines[2].severity(), Severity::Warning);
        assert!(lines[..6]
            .iter()
            .enumerate()
            .all(|(index, line)| index == 2 || line.severity() == Severity::Detail));

        assert_eq!(lines[6].text(), "-".repeat(80));
        assert_eq!(lines[7].severity(), Severity::Info);
        assert_eq!(lines[7].text(), "final: 7.500 ms (-3.000 ms), steps: 6");
        assert_eq!(lines[8].text(), "-".repeat(80));
        assert!(lines[9].text().starts_with("top-1: "));
        assert!(lines[9].text().ends_with("step #4"));
        assert_eq!(lines[14].text(), "-".repeat(80));
    }

    #[test]
    fn longest_excludes_skipped_steps() {
        let report = Report::generate(&measure(), &Config::default());

        let ranked = report.longest().map(Step::index).collect::<Vec<_>>();

        // Costs: #4 = 4 ms, #3 = 2 ms, #1 = 1 ms, #5 = 0.5 ms, #0 = 0. #2 is skipped.
        assert_eq!(ranked, [4, 3, 1, 5, 0]);
    }

    #[test]
    fn longest_respects_requested_count() {
        let config = Config {
            top_n_longest: 2,
            ..Config::default()
        };
        let report = Report::generate(&measure(), &config);

        let ranked = report.longest().map(Step::index).collect::<Vec<_>>();
        assert_eq!(ranked, [4, 3]);

        let top_lines = report
            .lines()
            .iter()
            .filter(|line| line.text().starts_with("top-"))
            .count();
        assert_eq!(top_lines, 2);
    }

    #[test]
    fn negative_top_n_omits_section() {
        let config = Config {
            top_n_longest: -1,
            ..Config::default()
        };
        let report = Report::generate(&measure(), &config);

        assert_eq!(report.longest().count(), 0);
        assert!(report.lines().iter().all(|line| !line.text().starts_with("top-")));
        // 6 rows, delimiter, summary, closing delimiter.
        assert_eq!(report.lines().len(), 9);
    }

    #[test]
    fn summary_can_be_disabled() {
        let config = Config {
            show_summary: false,
            top_n_longest: 0,
            ..Config::default()
        };
        let report = Report::generate(&measure(), &config);

        assert!(report.lines().iter().all(|line| !line.text().starts_with("final:")));
        assert_eq!(report.lines().len(), 7);
    }

    #[test]
    fn small_skips_are_not_shown_in_summary() {
        let mut measure = Measure::new(SessionId::new(0), 0, 8, false);
        measure.record(500, Record::Exclude);
        measure.record(2 * MS + 500, Record::End);

        let report = Report::generate(&measure, &Config::default());
        assert!(report
            .lines()
            .iter()
            .any(|line| line.text() == "final: 2.000 ms, steps: 3"));
    }

    #[test]
    fn instantaneous_session_has_zero_percentages() {
        let mut measure = Measure::new(SessionId::new(0), 7, 8, false);
        measure.record(7, Record::End);

        let report = Report::generate(&measure, &Config::default());

        assert!(report.steps().iter().all(|step| step.cost_percent().abs() < f64::EPSILON));
        assert_eq!(report.total(), Duration::ZERO);
    }

    #[test]
    fn emit_sends_every_line_with_tag() {
        let config = Config {
            output_tag: "bench".to_string(),
            ..Config::default()
        };
        let report = Report::generate(&measure(), &config);

        let output = MemoryOutput::new();
        report.emit(&output);

        let captured = output.lines();
        assert_eq!(captured.len(), report.lines().len());
        assert!(captured.iter().all(|line| line.tag() == "bench"));
        assert_eq!(report.to_string().lines().count(), captured.len());
    }
}

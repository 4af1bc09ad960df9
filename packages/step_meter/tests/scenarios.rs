//! End-to-end recording scenarios against the real clock.

use std::thread;
use std::time::{Duration, Instant};

use step_meter::{Config, EventKind, LOOP_ENDLESS, MemoryOutput, Meter, Severity};

const DELIMITER: &str =
    "--------------------------------------------------------------------------------";

fn meter_with_output() -> (Meter, MemoryOutput) {
    let output = MemoryOutput::new();
    let mut meter = Meter::new();
    meter.set_output(Box::new(output.clone()));
    (meter, output)
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot use the real operating system APIs.
fn single_step_total_matches_wall_time() {
    let (mut meter, _output) = meter_with_output();

    let wall_clock = Instant::now();
    meter.start();
    thread::sleep(Duration::from_millis(20));
    meter.beat_log("sleep");
    meter.end();
    let elapsed = wall_clock.elapsed();

    let report = meter.report();
    assert_eq!(report.steps().len(), 3);
    assert!(report.total() >= Duration::from_millis(20));
    assert!(report.total() <= elapsed);

    meter.pop();
    assert!(!meter.is_tracking());
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot use the real operating system APIs.
fn finished_session_report_layout() {
    let (mut meter, output) = meter_with_output();

    meter.start_log("begin");
    meter.beat_log("first");
    meter.beat_log("second");
    meter.finish_log("done");

    let lines = output.lines();

    // 4 rows, delimiter, summary, delimiter, 4 top entries, closing delimiter.
    assert_eq!(lines.len(), 12);
    assert!(lines[..4].iter().all(|line| line.severity() == Severity::Detail));
    assert_eq!(lines[4].message(), DELIMITER);
    assert!(lines[5].message().starts_with("final: "));
    assert!(lines[5].message().ends_with(", steps: 4"));
    assert_eq!(lines[5].severity(), Severity::Info);
    assert!(lines[7].message().starts_with("top-1: "));
    assert_eq!(lines[11].message(), DELIMITER);
    assert!(lines.iter().all(|line| line.tag() == "meter"));
}

#[test]
fn bounded_loop() {
    let mut meter = Meter::new();

    meter.start();
    meter.loop_log(5, "work");
    for _ in 0..5 {
        meter.recap();
    }
    meter.unloop();

    let report = meter.report();
    let closing = &report.steps()[2];
    assert_eq!(closing.kind(), EventKind::LoopEnd { start_index: 1 });
    assert!(closing.log().starts_with("avg/min/max/sum: "));
    assert!(closing.log().contains(" ms - calls:5 / "));

    let measure = meter.current().unwrap();
    let buffer = measure.loop_at(1).unwrap();
    assert_eq!(buffer.stored(), 5);
    assert_eq!(buffer.total_captured(), 5);
    assert_eq!(measure.events().log(1), Some("work"));

    meter.end();
    meter.pop();
}

#[test]
fn endless_loop_wraps_ring() {
    let mut meter = Meter::new();

    meter.start();
    meter.loop_count(LOOP_ENDLESS);
    for _ in 0..300 {
        meter.recap();
    }
    meter.unloop();

    let buffer = meter.current().unwrap().loop_at(1).unwrap();
    assert_eq!(buffer.capacity(), 256);
    assert_eq!(buffer.stored(), 256);
    assert_eq!(buffer.total_captured(), 300);

    let replay = buffer.iter().collect::<Vec<_>>();
    assert!(replay.windows(2).all(|pair| pair[0] <= pair[1]));

    meter.end();
    meter.pop();
}

#[test]
fn nested_sessions_return_to_idle() {
    let mut meter = Meter::new();

    let outer = meter.start();
    let inner = meter.start();
    assert_ne!(outer, inner);

    meter.end();
    meter.pop();
    assert_eq!(meter.current_id(), Some(outer));

    meter.end();
    meter.pop();
    assert!(!meter.is_tracking());
    assert_eq!(meter.depth(), 0);
}

#[test]
fn disabled_top_list_is_omitted() {
    let output = MemoryOutput::new();
    let mut meter = Meter::with_config(Config {
        top_n_longest: -1,
        ..Config::default()
    });
    meter.set_output(Box::new(output.clone()));

    meter.start();
    meter.beat();
    meter.finish();

    assert!(!output.contains("top-"));
    assert!(output.contains("final: "));
    // 3 rows, delimiter, summary, closing delimiter.
    assert_eq!(output.lines().len(), 6);
}

#[test]
#[cfg_attr(miri, ignore)] // Miri cannot use the real operating system APIs.
fn skipped_time_is_subtracted() {
    let (mut meter, output) = meter_with_output();

    meter.start();
    thread::sleep(Duration::from_millis(5));
    meter.skip_log("setup");
    meter.beat();
    meter.end();

    let report = meter.report();
    assert!(report.skipped() >= Duration::from_millis(5));
    assert_eq!(
        report.final_duration(),
        report.total().saturating_sub(report.skipped())
    );
    assert!(report.longest().all(|step| !step.is_skipped()));

    meter.stats();
    meter.pop();

    let warnings = output
        .lines()
        .into_iter()
        .filter(|line| line.severity() == Severity::Warning)
        .collect::<Vec<_>>();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message().ends_with("setup"));
    assert!(output.contains(" ms), steps: 4"));
}

#[test]
fn custom_tag_and_columns() {
    let output = MemoryOutput::new();
    let mut meter = Meter::with_config(Config {
        output_tag: "parser".to_string(),
        show_row_marker: false,
        show_cost_percent: false,
        show_cost_time: false,
        show_summary: false,
        top_n_longest: 0,
        ..Config::default()
    });
    meter.set_output(Box::new(output.clone()));

    meter.start_log("only the message");
    meter.finish();

    let lines = output.lines();
    assert_eq!(lines[0].message(), "only the message");
    assert_eq!(lines[0].tag(), "parser");
    assert_eq!(lines[1].message(), "step #1");
    assert_eq!(lines.len(), 3);
}

#[test]
fn calibration_is_displayable() {
    let mut meter = Meter::new();

    let calibration = meter.calibrate();

    assert!(
        calibration
            .to_string()
            .starts_with("Calibrate [St/Be/Lg/Sk/Lo/Re/Un/En/Po]: ")
    );
    assert_eq!(meter.last_calibration(), Some(calibration));
    assert!(!meter.is_tracking());
}

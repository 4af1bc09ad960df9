//! Shows nested sessions, endless loops and calibration, collecting the report in memory.

use std::hint::black_box;

use step_meter::{Config, MemoryOutput, Meter};

fn main() {
    let output = MemoryOutput::new();

    let mut meter = Meter::with_config(Config {
        show_accumulated_time: true,
        top_n_longest: 3,
        ..Config::default()
    });
    meter.set_output(Box::new(output.clone()));

    let calibration = meter.calibrate();
    println!("{calibration}");

    meter.start_log("outer");

    // A nested session gets its own report and does not disturb the outer one.
    meter.start_log("inner");
    let squares = (0..10_000_u64).map(|i| i.wrapping_mul(i)).collect::<Vec<_>>();
    meter.beat_log("squares");
    meter.finish();

    meter.loop_endless();
    for square in squares.iter().step_by(7) {
        black_box(square);
        meter.recap();
    }
    meter.unloop_log("sample squares");

    meter.finish_log("outer done");

    print!("{output}");
}

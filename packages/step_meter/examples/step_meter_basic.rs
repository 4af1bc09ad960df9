//! Measures a small text processing pipeline and prints the report through `tracing`.
//!
//! Run with `RUST_LOG=step_meter=trace` to see the per-step rows as well as the summary.

use std::hint::black_box;

use step_meter::Meter;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("step_meter=trace")),
        )
        .init();

    let mut meter = Meter::new();

    meter.start_log("pipeline");

    let text = "the quick brown fox jumps over the lazy dog ".repeat(10_000);
    meter.beat_log("build input");

    let words = text.split_whitespace().collect::<Vec<_>>();
    meter.beat_log("split words");

    meter.loop_log(i64::try_from(words.len()).unwrap_or(i64::MAX), "measure words");
    let mut longest = 0;
    for word in &words {
        longest = longest.max(black_box(word.len()));
        meter.recap();
    }
    meter.unloop_log("measure words");

    println!("longest word has {longest} letters");
    meter.skip_log("print result");

    meter.finish();
}

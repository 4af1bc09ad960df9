use std::fmt::{self, Display};

use crate::units::millis;
use crate::{Config, Step};

/// A [`Step`](crate::Step) formatted as a report row. Disabled columns are left out entirely.
#[derive(Debug)]
pub struct StepRow<'a> {
    step: &'a Step,
    config: &'a Config,
    event_count: usize,
}

impl<'a> StepRow<'a> {
    pub(crate) fn new(step: &'a Step, config: &'a Config, event_count: usize) -> Self {
        Self {
            step,
            config,
            event_count,
        }
    }
}

impl Display for StepRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = self.step;
        let config = self.config;

        if config.show_row_marker {
            f.write_str("| ")?;
        }

        if config.show_steps_grid {
            for cell in 0..self.event_count {
                let value = if cell == step.index() {
                    step.timestamp()
                } else {
                    0
                };
                write!(f, "{value} | ")?;
            }
        }

        if config.show_cost_percent {
            write!(f, "{:5.2}% | ", step.cost_percent())?;
        }

        if config.show_cost_time {
            write!(f, "{:8.3} ms | ", millis(step.total()))?;
        }

        if config.show_accumulated_time {
            write!(f, "{:8.3} ms | ", millis(step.accumulated()))?;
        }

        if config.show_log_message {
            f.write_str(step.log())?;
        }

        Ok(())
    }
}

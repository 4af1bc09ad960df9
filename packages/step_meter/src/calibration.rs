use std::fmt::{self, Display};
use std::time::Duration;

use crate::units::millis;

/// The measured overhead of each recording primitive of a [`Meter`](crate::Meter).
///
/// Produced by [`Meter::calibrate()`](crate::Meter::calibrate), which times one call of each
/// primitive back to back. The meter does not subtract these costs from reports; they are
/// exposed so callers can judge how much of a short step is tool overhead.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Calibration {
    pub(crate) start: Duration,
    pub(crate) beat: Duration,
    pub(crate) log: Duration,
    pub(crate) skip: Duration,
    pub(crate) loop_start: Duration,
    pub(crate) recap: Duration,
    pub(crate) unloop: Duration,
    pub(crate) end: Duration,
    pub(crate) pop: Duration,
}

impl Calibration {
    /// Cost of `start()`.
    #[must_use]
    pub fn start(&self) -> Duration {
        self.start
    }

    /// Cost of `beat()`.
    #[must_use]
    pub fn beat(&self) -> Duration {
        self.beat
    }

    /// Cost of `log()`.
    #[must_use]
    pub fn log(&self) -> Duration {
        self.log
    }

    /// Cost of `skip()`.
    #[must_use]
    pub fn skip(&self) -> Duration {
        self.skip
    }

    /// Cost of opening a loop.
    #[must_use]
    pub fn loop_start(&self) -> Duration {
        self.loop_start
    }

    /// Cost of `recap()`.
    #[must_use]
    pub fn recap(&self) -> Duration {
        self.recap
    }

    /// Cost of `unloop()`.
    #[must_use]
    pub fn unloop(&self) -> Duration {
        self.unloop
    }

    /// Cost of `end()`.
    #[must_use]
    pub fn end(&self) -> Duration {
        self.end
    }

    /// Cost of `pop()`.
    #[must_use]
    pub fn pop(&self) -> Duration {
        self.pop
    }
}

impl Display for Calibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Calibrate [St/Be/Lg/Sk/Lo/Re/Un/En/Po]: {:.3}/{:.3}/{:.3}/{:.3}/{:.3}/{:.3}/{:.3}/{:.3}/{:.3} ms",
            millis(self.start),
            millis(self.beat),
            millis(self.log),
            millis(self.skip),
            millis(self.loop_start),
            millis(self.recap),
            millis(self.unloop),
            millis(self.end),
            millis(self.pop),
        )
    }
}

/// Identifies which monotonic clock a [`Clock`](crate::Clock) reads.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ClockSource {
    /// The high-resolution monotonic clock of the operating system, unaffected by
    /// frequency adjustments. Falls back to [`ClockSource::Instant`] on targets that lack one.
    MonotonicRaw,

    /// The general-purpose monotonic clock behind [`std::time::Instant`].
    Instant,
}

impl ClockSource {
    /// Maps the `use_alternate_clock` configuration flag to a clock source.
    #[must_use]
    pub fn from_alternate_flag(use_alternate_clock: bool) -> Self {
        if use_alternate_clock {
            Self::Instant
        } else {
            Self::MonotonicRaw
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn alternate_flag_selects_instant() {
        assert_eq!(ClockSource::from_alternate_flag(true), ClockSource::Instant);
        assert_eq!(
            ClockSource::from_alternate_flag(false),
            ClockSource::MonotonicRaw
        );
    }
}

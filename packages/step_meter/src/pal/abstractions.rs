use std::fmt::Debug;

/// Provides raw monotonic timestamps from the two clock sources the meter can use.
///
/// Both readings are nanoseconds relative to an arbitrary, fixed epoch. Only differences
/// between readings of the same source are meaningful.
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Reads the general-purpose monotonic clock of the Rust standard library.
    fn instant_nanos(&self) -> u64;

    /// Reads the high-resolution monotonic clock of the operating system.
    ///
    /// This clock is not subject to frequency adjustments. On targets without such a clock,
    /// implementations fall back to the general-purpose monotonic clock.
    fn monotonic_raw_nanos(&self) -> u64;
}

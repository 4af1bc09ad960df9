use crate::ClockSource;
use crate::pal::{Platform, PlatformFacade};

/// Produces nanosecond timestamps for one measurement run.
///
/// Readings are nanoseconds since the clock was created and never decrease. The source is
/// fixed at creation; a meter creates a new clock only while no session is open, so the
/// timestamps of a session always come from one source.
#[derive(Debug)]
pub struct Clock {
    platform: PlatformFacade,
    source: ClockSource,
    epoch: u64,
}

impl Clock {
    /// Creates a clock that reads the given source of the real platform.
    #[must_use]
    pub fn new(source: ClockSource) -> Self {
        Self::with_platform(PlatformFacade::real(), source)
    }

    pub(crate) fn with_platform(platform: PlatformFacade, source: ClockSource) -> Self {
        let epoch = read(&platform, source);

        Self {
            platform,
            source,
            epoch,
        }
    }

    /// Returns the current timestamp in nanoseconds since the clock was created.
    #[must_use]
    #[inline]
    pub fn now(&self) -> u64 {
        read(&self.platform, self.source).saturating_sub(self.epoch)
    }

    /// The source this clock reads.
    #[must_use]
    pub fn source(&self) -> ClockSource {
        self.source
    }

    pub(crate) fn platform(&self) -> &PlatformFacade {
        &self.platform
    }
}

#[inline]
fn read(platform: &PlatformFacade, source: ClockSource) -> u64 {
    match source {
        ClockSource::MonotonicRaw => platform.monotonic_raw_nanos(),
        ClockSource::Instant => platform.instant_nanos(),
    }
}

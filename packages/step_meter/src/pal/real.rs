use std::time::Instant;

use crate::pal::Platform;

/// Reads time from the operating system of the build target.
#[derive(Clone, Debug)]
pub(crate) struct RealPlatform {
    // Instant has no absolute value, so instant readings are relative to this point.
    epoch: Instant,
}

impl RealPlatform {
    pub(crate) fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Platform for RealPlatform {
    fn instant_nanos(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_nanos())
            .expect("a process running for more than 500 years is not a realistic scenario")
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn monotonic_raw_nanos(&self) -> u64 {
        clock_gettime_nanos(libc::CLOCK_MONOTONIC_RAW)
    }

    #[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
    fn monotonic_raw_nanos(&self) -> u64 {
        clock_gettime_nanos(libc::CLOCK_MONOTONIC)
    }

    #[cfg(not(unix))]
    fn monotonic_raw_nanos(&self) -> u64 {
        self.instant_nanos()
    }
}

/// Reads the given POSIX clock and converts the result to nanoseconds.
#[cfg(unix)]
#[expect(
    clippy::cast_sign_loss,
    reason = "monotonic clocks never report negative seconds or nanoseconds"
)]
fn clock_gettime_nanos(clock_id: libc::clockid_t) -> u64 {
    use std::{io, mem};

    // SAFETY: All-zero is a valid initial value for this type.
    let mut ts: libc::timespec = unsafe { mem::zeroed() };

    // SAFETY: We are passing valid arguments, no other safety requirements.
    let result = unsafe { libc::clock_gettime(clock_id, &raw mut ts) };

    assert!(result == 0, "{}", io::Error::last_os_error());

    (ts.tv_sec as u64)
        .saturating_mul(1_000_000_000)
        .saturating_add(ts.tv_nsec as u64)
}

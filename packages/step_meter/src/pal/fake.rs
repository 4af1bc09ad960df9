use std::sync::{Arc, Mutex};

use crate::ERR_POISONED_LOCK;
use crate::pal::Platform;

#[derive(Debug)]
struct FakePlatformState {
    nanos: u64,

    // Added to `nanos` after every reading, so consecutive readings differ.
    auto_advance: u64,
}

/// Fake platform whose time only moves when the test says so.
///
/// Clones share the same state, so a test can keep one handle and advance time while
/// the meter under test reads through another. Both clock sources observe the same value.
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    state: Arc<Mutex<FakePlatformState>>,
}

impl FakePlatform {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakePlatformState {
                nanos: 0,
                auto_advance: 0,
            })),
        }
    }

    pub(crate) fn set_nanos(&self, nanos: u64) {
        self.state.lock().expect(ERR_POISONED_LOCK).nanos = nanos;
    }

    pub(crate) fn advance(&self, nanos: u64) {
        let mut state = self.state.lock().expect(ERR_POISONED_LOCK);
        state.nanos = state.nanos.saturating_add(nanos);
    }

    pub(crate) fn set_auto_advance(&self, nanos: u64) {
        self.state.lock().expect(ERR_POISONED_LOCK).auto_advance = nanos;
    }

    fn read(&self) -> u64 {
        let mut state = self.state.lock().expect(ERR_POISONED_LOCK);
        let nanos = state.nanos;
        state.nanos = nanos.saturating_add(state.auto_advance);
        nanos
    }
}

impl Platform for FakePlatform {
    fn instant_nanos(&self) -> u64 {
        self.read()
    }

    fn monotonic_raw_nanos(&self) -> u64 {
        self.read()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let platform = FakePlatform::new();
        assert_eq!(platform.instant_nanos(), 0);
        assert_eq!(platform.monotonic_raw_nanos(), 0);
    }

    #[test]
    fn advance_is_shared_between_clones() {
        let platform = FakePlatform::new();
        let clone = platform.clone();

        platform.advance(250);
        assert_eq!(clone.instant_nanos(), 250);

        clone.set_nanos(1_000);
        assert_eq!(platform.monotonic_raw_nanos(), 1_000);
    }

    #[test]
    fn auto_advance_moves_time_after_each_reading() {
        let platform = FakePlatform::new();
        platform.set_auto_advance(10);

        assert_eq!(platform.instant_nanos(), 0);
        assert_eq!(platform.instant_nanos(), 10);
        assert_eq!(platform.monotonic_raw_nanos(), 20);
    }
}

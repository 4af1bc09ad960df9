#[cfg(test)]
use crate::pal::FakePlatform;
use crate::pal::Platform;
use crate::pal::real::RealPlatform;

/// Switches between the real platform and, in unit tests, a fake one.
#[derive(Clone, Debug)]
pub(crate) enum PlatformFacade {
    Real(RealPlatform),

    #[cfg(test)]
    Fake(FakePlatform),
}

impl PlatformFacade {
    pub(crate) fn real() -> Self {
        Self::Real(RealPlatform::new())
    }

    #[cfg(test)]
    pub(crate) fn fake(platform: FakePlatform) -> Self {
        Self::Fake(platform)
    }
}

impl Platform for PlatformFacade {
    fn instant_nanos(&self) -> u64 {
        match self {
            Self::Real(platform) => platform.instant_nanos(),
            #[cfg(test)]
            Self::Fake(platform) => platform.instant_nanos(),
        }
    }

    fn monotonic_raw_nanos(&self) -> u64 {
        match self {
            Self::Real(platform) => platform.monotonic_raw_nanos(),
            #[cfg(test)]
            Self::Fake(platform) => platform.monotonic_raw_nanos(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn fake_facade_forwards_both_sources() {
        let fake = FakePlatform::new();
        fake.set_nanos(1_500);

        let facade = PlatformFacade::fake(fake);

        assert_eq!(facade.instant_nanos(), 1_500);
        assert_eq!(facade.monotonic_raw_nanos(), 1_500);
    }

    #[test]
    #[cfg_attr(miri, ignore)] // Miri cannot talk to the real platform.
    fn real_facade_is_monotonic() {
        let facade = PlatformFacade::real();

        let a = facade.monotonic_raw_nanos();
        let b = facade.monotonic_raw_nanos();
        assert!(b >= a);

        let c = facade.instant_nanos();
        let d = facade.instant_nanos();
        assert!(d >= c);
    }
}

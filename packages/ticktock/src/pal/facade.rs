//! Platform facade for switching between real and fake implementations.

use std::time::Instant;

use crate::pal::abstractions::Platform;
#[cfg(test)]
use crate::pal::fake::FakePlatform;
use crate::pal::real::RealPlatform;

/// Facade that allows switching between real and fake platform implementations.
#[derive(Debug, Clone)]
pub(crate) enum PlatformFacade {
    /// Real platform implementation reading the operating system clock.
    Real(RealPlatform),

    /// Fake platform implementation for testing.
    #[cfg(test)]
    Fake(FakePlatform),
}

impl PlatformFacade {
    /// Creates a new platform facade using the real implementation.
    pub(crate) fn real() -> Self {
        Self::Real(RealPlatform)
    }

    /// Creates a new platform facade using the fake implementation.
    #[cfg(test)]
    pub(crate) fn fake(fake_platform: FakePlatform) -> Self {
        Self::Fake(fake_platform)
    }
}

impl Platform for PlatformFacade {
    fn now(&self) -> Instant {
        match self {
            Self::Real(platform) => platform.now(),
            #[cfg(test)]
            Self::Fake(platform) => platform.now(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn real_clock_does_not_go_backwards() {
        let facade = PlatformFacade::real();

        let first = facade.now();
        let second = facade.now();

        assert!(second >= first);
    }

    #[test]
    fn fake_clock_is_passed_through() {
        let fake_platform = FakePlatform::new();
        let facade = PlatformFacade::fake(fake_platform.clone());
        let before = facade.now();

        fake_platform.advance(Duration::from_millis(300));

        assert_eq!(facade.now().duration_since(before), Duration::from_millis(300));
    }
}

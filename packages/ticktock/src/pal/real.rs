//! Real platform implementation backed by the operating system clock.

use std::time::Instant;

use crate::pal::abstractions::Platform;

/// Real implementation of the platform abstraction using [`Instant`].
#[derive(Debug, Clone)]
pub(crate) struct RealPlatform;

impl Platform for RealPlatform {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

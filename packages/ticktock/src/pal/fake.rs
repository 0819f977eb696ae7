//! Fake platform implementation for testing.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::pal::abstractions::Platform;

/// Internal state for the fake platform that can be shared between clones.
#[derive(Debug)]
struct FakePlatformState {
    now: Instant,
}

/// Fake implementation of the platform abstraction for testing.
///
/// The clock stands still until a test advances it. Multiple clones of the same
/// `FakePlatform` share the same clock, so a test can keep one clone and advance
/// time while an instance under test holds another.
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    state: Arc<Mutex<FakePlatformState>>,
}

impl FakePlatform {
    /// Creates a new fake platform whose clock starts at the current real time.
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakePlatformState {
                now: Instant::now(),
            })),
        }
    }

    /// Moves the clock forward by the given amount.
    ///
    /// This affects all clones of this platform.
    pub(crate) fn advance(&self, by: Duration) {
        let mut state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        state.now = state
            .now
            .checked_add(by)
            .expect("fake clock advanced beyond the range of Instant");
    }
}

impl Platform for FakePlatform {
    fn now(&self) -> Instant {
        self.state
            .lock()
            .expect("FakePlatform state lock should not be poisoned")
            .now
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn stands_still_until_advanced() {
        let platform = FakePlatform::new();

        assert_eq!(platform.now(), platform.now());
    }

    #[test]
    fn advances_by_exact_amount() {
        let platform = FakePlatform::new();
        let before = platform.now();

        platform.advance(Duration::from_millis(150));

        assert_eq!(platform.now().duration_since(before), Duration::from_millis(150));
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();
        let before = platform2.now();

        // Advancing one clone moves the clock of the other.
        platform1.advance(Duration::from_secs(2));

        assert_eq!(platform2.now().duration_since(before), Duration::from_secs(2));
    }
}

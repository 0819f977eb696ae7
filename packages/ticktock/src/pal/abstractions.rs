//! Platform abstraction trait definitions.

use std::fmt::Debug;
use std::time::Instant;

/// Provides access to a monotonically increasing, high-resolution clock.
///
/// All elapsed-time measurements are taken from this clock. It must never go
/// backwards and must not follow wall clock adjustments.
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Gets the current point in time.
    fn now(&self) -> Instant;
}

use thiserror::Error;

use crate::TimerId;

/// Errors that can occur when using a [`TickTock`][crate::TickTock] instance.
///
/// All of these indicate a defect in the profiling instrumentation of the caller
/// rather than a runtime condition to recover from. The state accumulated up to the
/// failing call remains intact and inspectable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A stopwatch was read with `tock` before it was started with `tick`.
    #[error("timer {id} has not been started with tick()")]
    UnstartedTimer {
        /// The identifier of the timer that was read.
        id: TimerId,
    },

    /// A profile was ended by name but a different profile is the innermost open one.
    #[error("expected to end profile '{expected}', received '{received}'")]
    MismatchedProfileName {
        /// Name of the innermost open profile.
        expected: String,

        /// Name given by the caller.
        received: String,
    },

    /// An operation needed an open profile but none is open.
    #[error("no profile is currently open")]
    NoActiveProfile,

    /// An operation that requires a quiescent instance was attempted while profiles are open.
    #[error("cannot {operation} while profiling is active, end all profiles first")]
    ActiveProfiling {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// Two instances were fused but they did not record the same profile tree.
    #[error("instances to be fused do not have the same profile tree")]
    StructuralMismatch,

    /// The same instance was passed more than once to `fuse_multiple`.
    #[error("the same instance was given more than once, which is not allowed")]
    Aliasing,
}

/// A specialized `Result` type for profiling operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn mismatched_name_mentions_both_names() {
        let error = Error::MismatchedProfileName {
            expected: "outer".to_string(),
            received: "inner".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("'outer'"));
        assert!(message.contains("'inner'"));
    }

    #[test]
    fn unstarted_timer_mentions_id() {
        let error = Error::UnstartedTimer {
            id: TimerId::from("load"),
        };

        assert_eq!(error.to_string(), "timer 'load' has not been started with tick()");
    }

    #[test]
    fn active_profiling_mentions_operation() {
        let error = Error::ActiveProfiling { operation: "reset" };

        assert_eq!(
            error.to_string(),
            "cannot reset while profiling is active, end all profiles first"
        );
    }
}

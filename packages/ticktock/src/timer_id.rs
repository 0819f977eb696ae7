use std::borrow::Cow;
use std::fmt;

/// Identifies one of the stopwatch timers of a [`TickTock`][crate::TickTock] instance.
///
/// Every instance has an anonymous timer used by [`tick()`][crate::TickTock::tick] and
/// [`tock()`][crate::TickTock::tock]. Any number of additional timers can be started
/// under a name or a number via [`tick_named()`][crate::TickTock::tick_named].
///
/// # Examples
///
/// ```
/// use ticktock::{TickTock, TimerId};
///
/// let mut tt = TickTock::new();
///
/// tt.tick_named("download");
/// tt.tick_named(42_u64);
///
/// let download = tt.tock_named("download").unwrap();
/// let numbered = tt.tock_named(TimerId::from(42_u64)).unwrap();
/// # _ = (download, numbered);
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TimerId {
    /// The anonymous timer.
    #[default]
    Anonymous,

    /// A timer identified by a name.
    Name(Cow<'static, str>),

    /// A timer identified by a number.
    Number(u64),
}

impl From<&'static str> for TimerId {
    fn from(value: &'static str) -> Self {
        Self::Name(Cow::Borrowed(value))
    }
}

impl From<String> for TimerId {
    fn from(value: String) -> Self {
        Self::Name(Cow::Owned(value))
    }
}

impl From<u64> for TimerId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "<anonymous>"),
            Self::Name(name) => write!(f, "'{name}'"),
            Self::Number(number) => write!(f, "#{number}"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn borrowed_and_owned_names_are_equal() {
        assert_eq!(TimerId::from("a"), TimerId::from("a".to_string()));
    }

    #[test]
    fn names_and_numbers_are_distinct() {
        assert_ne!(TimerId::from("1"), TimerId::from(1_u64));
        assert_ne!(TimerId::Anonymous, TimerId::from(0_u64));
    }

    #[test]
    fn display() {
        assert_eq!(TimerId::Anonymous.to_string(), "<anonymous>");
        assert_eq!(TimerId::from("x").to_string(), "'x'");
        assert_eq!(TimerId::from(7_u64).to_string(), "#7");
    }
}

use std::fmt;
use std::time::Duration;

use crate::thousands::fixed_two_decimals;

/// Ordered set of units that durations are reported in.
///
/// Units are ordered by increasing length, so `TimeUnit::Nanosecond < TimeUnit::Hour`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use ticktock::TimeUnit;
///
/// assert_eq!(TimeUnit::Second.next_smaller(), Some(TimeUnit::Millisecond));
/// assert_eq!(TimeUnit::Second.next_bigger(), Some(TimeUnit::Minute));
/// assert_eq!(TimeUnit::Hour.next_bigger(), None);
///
/// assert_eq!(
///     TimeUnit::suitable_for(Duration::from_micros(2500)),
///     TimeUnit::Millisecond
/// );
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum TimeUnit {
    /// One billionth of a second.
    Nanosecond,

    /// One millionth of a second.
    Microsecond,

    /// One thousandth of a second.
    Millisecond,

    /// One second.
    Second,

    /// Sixty seconds.
    Minute,

    /// Sixty minutes.
    Hour,
}

// In order of increasing length.
const ALL_UNITS: [TimeUnit; 6] = [
    TimeUnit::Nanosecond,
    TimeUnit::Microsecond,
    TimeUnit::Millisecond,
    TimeUnit::Second,
    TimeUnit::Minute,
    TimeUnit::Hour,
];

impl TimeUnit {
    /// All units in order of increasing length.
    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        ALL_UNITS.into_iter()
    }

    /// The short suffix used when printing values in this unit.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Nanosecond => "ns",
            Self::Microsecond => "us",
            Self::Millisecond => "ms",
            Self::Second => "s",
            Self::Minute => "min",
            Self::Hour => "h",
        }
    }

    /// The length of one of this unit, in seconds.
    #[must_use]
    pub const fn seconds(self) -> f64 {
        match self {
            Self::Nanosecond => 1e-9,
            Self::Microsecond => 1e-6,
            Self::Millisecond => 1e-3,
            Self::Second => 1.0,
            Self::Minute => 60.0,
            Self::Hour => 3600.0,
        }
    }

    /// The smallest unit that is longer than this one, if any.
    #[must_use]
    pub fn next_bigger(self) -> Option<Self> {
        Self::next_bigger_than(self.seconds())
    }

    /// The largest unit that is shorter than this one, if any.
    #[must_use]
    pub fn next_smaller(self) -> Option<Self> {
        Self::next_smaller_than(self.seconds())
    }

    /// The smallest unit that is longer than an arbitrary length given in seconds.
    #[must_use]
    pub fn next_bigger_than(seconds: f64) -> Option<Self> {
        Self::all().find(|unit| unit.seconds() > seconds)
    }

    /// The largest unit that is shorter than an arbitrary length given in seconds.
    #[must_use]
    pub fn next_smaller_than(seconds: f64) -> Option<Self> {
        Self::all().rev().find(|unit| unit.seconds() < seconds)
    }

    /// The largest unit that the duration is at least one of.
    ///
    /// Durations shorter than the smallest unit (including zero) get the smallest unit.
    #[must_use]
    pub fn suitable_for(duration: Duration) -> Self {
        let seconds = duration.as_secs_f64();

        Self::all()
            .rev()
            .find(|unit| seconds >= unit.seconds())
            .unwrap_or(Self::Nanosecond)
    }

    /// Converts a duration to a (fractional) number of this unit.
    #[must_use]
    pub fn convert(self, duration: Duration) -> f64 {
        duration.as_secs_f64() / self.seconds()
    }

    /// Formats a duration in this unit with two decimals, thousands separators and the
    /// unit suffix right-aligned to two characters, e.g. `1,234.50 ms` or `3.00  s`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use ticktock::TimeUnit;
    ///
    /// assert_eq!(
    ///     TimeUnit::Millisecond.format(Duration::from_micros(1_234_500)),
    ///     "1,234.50 ms"
    /// );
    /// assert_eq!(TimeUnit::Second.format(Duration::from_secs(3)), "3.00  s");
    /// ```
    #[must_use]
    pub fn format(self, duration: Duration) -> String {
        format!(
            "{} {:>2}",
            fixed_two_decimals(self.convert(duration)),
            self.suffix()
        )
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn units_are_ordered_by_length() {
        let units: Vec<_> = TimeUnit::all().collect();

        for pair in units.windows(2) {
            let [shorter, longer] = pair else {
                unreachable!("windows(2) yields pairs");
            };

            assert!(shorter < longer);
            assert!(shorter.seconds() < longer.seconds());
        }
    }

    #[test]
    fn next_bigger_and_smaller() {
        assert_eq!(TimeUnit::Second.next_bigger(), Some(TimeUnit::Minute));
        assert_eq!(TimeUnit::Second.next_smaller(), Some(TimeUnit::Millisecond));
        assert_eq!(TimeUnit::Nanosecond.next_smaller(), None);
        assert_eq!(TimeUnit::Hour.next_bigger(), None);
    }

    #[test]
    fn next_for_arbitrary_length() {
        // 69 seconds lies between a minute and an hour.
        assert_eq!(TimeUnit::next_bigger_than(69.0), Some(TimeUnit::Hour));
        assert_eq!(TimeUnit::next_smaller_than(69.0), Some(TimeUnit::Minute));

        assert_eq!(TimeUnit::next_bigger_than(1e6), None);
        assert_eq!(TimeUnit::next_smaller_than(1e-12), None);
    }

    #[test]
    fn suitable_unit() {
        assert_eq!(TimeUnit::suitable_for(Duration::ZERO), TimeUnit::Nanosecond);
        assert_eq!(
            TimeUnit::suitable_for(Duration::from_nanos(999)),
            TimeUnit::Nanosecond
        );
        assert_eq!(
            TimeUnit::suitable_for(Duration::from_micros(1)),
            TimeUnit::Microsecond
        );
        assert_eq!(
            TimeUnit::suitable_for(Duration::from_millis(1500)),
            TimeUnit::Second
        );
        assert_eq!(
            TimeUnit::suitable_for(Duration::from_secs(7200)),
            TimeUnit::Hour
        );
    }

    #[test]
    fn format_aligns_suffix() {
        assert_eq!(TimeUnit::Second.format(Duration::from_millis(2500)), "2.50  s");
        assert_eq!(
            TimeUnit::Microsecond.format(Duration::from_nanos(1500)),
            "1.50 us"
        );
        assert_eq!(TimeUnit::Minute.format(Duration::from_secs(90)), "1.50 min");
    }

    #[test]
    fn format_zero() {
        assert_eq!(TimeUnit::Millisecond.format(Duration::ZERO), "0.00 ms");
    }
}

use std::ops::{Deref, DerefMut};

use crate::{ProfileId, TickTock};

/// Keeps a profile open until dropped.
///
/// Created by [`TickTock::profile()`] and [`TickTock::profile_hits()`]. The guard
/// dereferences to the [`TickTock`] that created it, which is how nested profiles are
/// opened while the guard is alive.
///
/// When the guard is dropped, on any exit path including early returns and panics, it
/// first ends every profile still open inside its own profile and then ends its own
/// profile. This keeps the profile stack consistent no matter how the scope is left.
///
/// # Examples
///
/// ```
/// use ticktock::TickTock;
///
/// let mut tt = TickTock::new();
///
/// {
///     let mut request = tt.profile("request");
///     {
///         let _parse = request.profile("parse");
///     }
///     {
///         let _respond = request.profile("respond");
///     }
/// } // "request" ends here.
///
/// let names: Vec<_> = tt.iter().map(|profile| profile.name()).collect();
/// assert_eq!(names, ["request", "parse", "respond"]);
/// ```
#[derive(Debug)]
#[must_use = "The profile is ended when the guard is dropped"]
pub struct ProfileGuard<'a> {
    ticktock: &'a mut TickTock,
    profile: ProfileId,

    // Index of our own entry on the profile stack.
    position: usize,
}

impl<'a> ProfileGuard<'a> {
    pub(crate) fn new(ticktock: &'a mut TickTock, profile: ProfileId, position: usize) -> Self {
        Self {
            ticktock,
            profile,
            position,
        }
    }

    /// The profile kept open by this guard.
    #[must_use]
    pub fn id(&self) -> ProfileId {
        self.profile
    }
}

impl Deref for ProfileGuard<'_> {
    type Target = TickTock;

    fn deref(&self) -> &Self::Target {
        self.ticktock
    }
}

impl DerefMut for ProfileGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ticktock
    }
}

impl Drop for ProfileGuard<'_> {
    fn drop(&mut self) {
        self.ticktock.unwind_to(self.profile, self.position);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::pal::{FakePlatform, PlatformFacade};

    #[test]
    fn guard_identifies_its_profile() {
        let mut tt = TickTock::with_platform(PlatformFacade::fake(FakePlatform::new()));

        let id = {
            let guard = tt.profile("p");
            guard.id()
        };

        assert_eq!(tt.get(id).unwrap().name(), "p");
    }

    #[test]
    fn drop_records_elapsed_time() {
        let clock = FakePlatform::new();
        let mut tt = TickTock::with_platform(PlatformFacade::fake(clock.clone()));

        {
            let _guard = tt.profile("p");
            clock.advance(Duration::from_millis(12));
        }

        assert_eq!(tt.stats_by_profile_name("p"), Some((1, Duration::from_millis(12))));
    }

    #[test]
    fn nested_leftovers_are_timed_until_drop() {
        let clock = FakePlatform::new();
        let mut tt = TickTock::with_platform(PlatformFacade::fake(clock.clone()));

        {
            let mut guard = tt.profile("outer");
            guard.start_profile("left open");
            clock.advance(Duration::from_millis(5));
        }

        assert!(!tt.is_profiling());
        assert_eq!(
            tt.stats_by_profile_name("left open"),
            Some((1, Duration::from_millis(5)))
        );
    }
}

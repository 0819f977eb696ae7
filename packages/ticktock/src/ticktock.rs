//! The profiling engine.

use std::fmt;
use std::ptr;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use foldhash::{HashMap, HashMapExt};
use tracing::{debug, trace, warn};

use crate::pal::{Platform, PlatformFacade};
use crate::{
    Error, Profile, ProfileGuard, ProfileId, ProfileKey, Profiles, Report, Result, TimeUnit,
    TimerId,
};

/// Stopwatch timers and a hierarchical profiler of named code sections.
///
/// The stopwatch half of the API measures the time since a [`tick()`][Self::tick]:
///
/// ```
/// use ticktock::TickTock;
///
/// let mut tt = TickTock::new();
///
/// tt.tick();
/// // Some task.
/// let elapsed = tt.tock().unwrap();
/// # _ = elapsed;
/// ```
///
/// The profiling half of the API accumulates the time spent in named code sections.
/// Sections opened while another section is open are nested inside it, forming a tree
/// that mirrors the call structure of the profiled code. Opening the same section again
/// at the same place in the tree adds to the existing statistics.
///
/// ```
/// use ticktock::TickTock;
///
/// let mut tt = TickTock::new();
///
/// for _ in 0..100 {
///     let mut repeated = tt.profile("Repeated code");
///     // Some task.
///     {
///         let _subtask = repeated.profile("Subtask");
///         // Some subtask.
///     }
/// }
///
/// // Profiles can also be ended manually.
/// tt.start_profile("Manual");
/// tt.end_profile_named("Manual").unwrap();
///
/// // Quick operations can be measured in batches, registering one hit per operation.
/// {
///     let _batch = tt.profile_hits("Adding 1", 100);
///     let mut a = 0;
///     for _ in 0..100 {
///         a += 1;
///     }
///     # _ = a;
/// }
///
/// println!("{}", tt.stringify_sections(None).unwrap());
/// ```
///
/// # Threading
///
/// An instance is meant to be used from the thread that created it; profiling from
/// another thread is detected and logged as a warning. To profile multithreaded work,
/// give each thread its own instance and combine the results afterwards with
/// [`fuse()`][Self::fuse] or [`fuse_multiple()`][Self::fuse_multiple].
#[derive(Clone, Debug)]
pub struct TickTock {
    tick_starts: HashMap<TimerId, Instant>,

    // All profiles of the tree. A parent is always stored before its children.
    arena: Vec<Profile>,
    top_level: Vec<ProfileId>,
    index: HashMap<ProfileKey, ProfileId>,

    // Innermost open profile last.
    stack: Vec<OpenProfile>,

    owner: ThreadId,
    platform: PlatformFacade,
}

/// A profile that has been started but not yet ended.
#[derive(Clone, Copy, Debug)]
struct OpenProfile {
    profile: ProfileId,
    hits: u64,
    started: Instant,
}

impl TickTock {
    /// Creates an empty instance owned by the current thread.
    #[must_use]
    pub fn new() -> Self {
        Self::with_platform(PlatformFacade::real())
    }

    pub(crate) fn with_platform(platform: PlatformFacade) -> Self {
        Self {
            tick_starts: HashMap::new(),
            arena: Vec::new(),
            top_level: Vec::new(),
            index: HashMap::new(),
            stack: Vec::new(),
            owner: thread::current().id(),
            platform,
        }
    }

    /// Starts (or restarts) the anonymous timer.
    pub fn tick(&mut self) {
        self.tick_named(TimerId::Anonymous);
    }

    /// Starts (or restarts) the timer with the given identifier.
    ///
    /// Any number of timers can run at the same time without interfering with each other.
    pub fn tick_named(&mut self, id: impl Into<TimerId>) {
        self.check_thread("tick");
        self.tick_starts.insert(id.into(), self.platform.now());
    }

    /// Returns the time passed since the anonymous timer was started.
    ///
    /// The timer keeps running, so repeated calls measure from the same starting point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnstartedTimer`] if [`tick()`][Self::tick] has not been called.
    pub fn tock(&self) -> Result<Duration> {
        self.tock_named(TimerId::Anonymous)
    }

    /// Returns the time passed since the timer with the given identifier was started.
    ///
    /// The timer keeps running, so repeated calls measure from the same starting point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnstartedTimer`] if no timer with this identifier has been started.
    pub fn tock_named(&self, id: impl Into<TimerId>) -> Result<Duration> {
        let now = self.platform.now();
        let id = id.into();

        let started = self
            .tick_starts
            .get(&id)
            .ok_or(Error::UnstartedTimer { id })?;

        Ok(now.saturating_duration_since(*started))
    }

    /// Opens a profile that ends when the returned guard is dropped.
    ///
    /// The guard dereferences to this instance, so nested profiles are opened through it.
    /// If profiles nested inside the guard's profile are still open when the guard is
    /// dropped (e.g. because of an early return or a panic), they are ended first.
    ///
    /// # Examples
    ///
    /// ```
    /// use ticktock::TickTock;
    ///
    /// let mut tt = TickTock::new();
    ///
    /// {
    ///     let mut outer = tt.profile("outer");
    ///     let _inner = outer.profile("inner");
    /// }
    ///
    /// assert!(!tt.is_profiling());
    /// assert_eq!(tt.iter().count(), 2);
    /// ```
    pub fn profile(&mut self, name: impl Into<String>) -> ProfileGuard<'_> {
        self.profile_hits(name, 1)
    }

    /// Opens a profile that ends when the returned guard is dropped, registering the
    /// measured time as `hits` hits of equal length.
    ///
    /// This is useful when profiling a large number of quick operations or work spread
    /// over several workers, where individual operations cannot be timed. The following
    /// are equivalent, apart from measurement overhead:
    ///
    /// ```
    /// use ticktock::TickTock;
    ///
    /// let mut tt = TickTock::new();
    ///
    /// {
    ///     let _batch = tt.profile_hits("op", 5);
    ///     for _ in 0..5 {
    ///         // Operation.
    ///     }
    /// }
    ///
    /// for _ in 0..5 {
    ///     let _single = tt.profile("op");
    ///     // Operation.
    /// }
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `hits` is zero.
    pub fn profile_hits(&mut self, name: impl Into<String>, hits: u64) -> ProfileGuard<'_> {
        let position = self.stack.len();
        let profile = self.start_profile_hits(name, hits);

        ProfileGuard::new(self, profile, position)
    }

    /// Opens a profile that stays open until it is ended by
    /// [`end_profile()`][Self::end_profile] or [`end_profile_named()`][Self::end_profile_named].
    pub fn start_profile(&mut self, name: impl Into<String>) -> ProfileId {
        self.start_profile_hits(name, 1)
    }

    /// Opens a profile that stays open until it is ended manually, registering the
    /// measured time as `hits` hits of equal length.
    ///
    /// # Panics
    ///
    /// Panics if `hits` is zero.
    pub fn start_profile_hits(&mut self, name: impl Into<String>, hits: u64) -> ProfileId {
        assert!(hits != 0, "Hits cannot be zero");
        self.check_thread("start_profile");

        let profile = self.resolve(name.into());

        trace!(
            name = self.node(profile).name(),
            depth = self.stack.len(),
            hits,
            "profile started"
        );

        // Read the clock last to keep our own overhead out of the measurement.
        self.stack.push(OpenProfile {
            profile,
            hits,
            started: self.platform.now(),
        });

        profile
    }

    /// Ends the innermost open profile and returns the time it was open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveProfile`] if no profile is open.
    pub fn end_profile(&mut self) -> Result<Duration> {
        let ended = self.platform.now();
        self.check_thread("end_profile");

        self.close_innermost(ended).ok_or(Error::NoActiveProfile)
    }

    /// Ends the innermost open profile, verifying that it has the expected name, and
    /// returns the time it was open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MismatchedProfileName`] if the innermost open profile has a
    /// different name, in which case it stays open.
    ///
    /// Returns [`Error::NoActiveProfile`] if no profile is open.
    pub fn end_profile_named(&mut self, name: &str) -> Result<Duration> {
        let ended = self.platform.now();
        self.check_thread("end_profile");

        let open = self.stack.last().ok_or(Error::NoActiveProfile)?;
        let expected = self.node(open.profile).name();

        if expected != name {
            return Err(Error::MismatchedProfileName {
                expected: expected.to_string(),
                received: name.to_string(),
            });
        }

        Ok(self
            .close_innermost(ended)
            .expect("guarded by the stack check above"))
    }

    /// Adds a measurement that was taken outside of this instance.
    ///
    /// If `name` is given, the measurement goes to the profile with that name at the
    /// current position in the tree, exactly where [`profile()`][Self::profile] would
    /// have placed it: nested inside the innermost open profile, if any. No time is
    /// measured; `time` is registered as `hits` hits.
    ///
    /// If `name` is `None`, the measurement goes to the innermost open profile.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use ticktock::TickTock;
    ///
    /// let mut tt = TickTock::new();
    ///
    /// {
    ///     let mut batch = tt.profile("batch");
    ///     // The workers reported their own timings.
    ///     batch
    ///         .add_external_measurements(Some("worker"), Duration::from_millis(40), 4)
    ///         .unwrap();
    /// }
    ///
    /// let (hits, total) = tt.stats_by_profile_name("worker").unwrap();
    /// assert_eq!(hits, 4);
    /// assert_eq!(total, Duration::from_millis(40));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveProfile`] if `name` is `None` and no profile is open.
    ///
    /// # Panics
    ///
    /// Panics if `hits` is zero.
    pub fn add_external_measurements(
        &mut self,
        name: Option<&str>,
        time: Duration,
        hits: u64,
    ) -> Result<()> {
        assert!(hits != 0, "Hits cannot be zero");
        self.check_thread("add_external_measurements");

        let profile = match name {
            Some(name) => self.resolve(name.to_string()),
            None => self.stack.last().ok_or(Error::NoActiveProfile)?.profile,
        };

        self.node_mut(profile).record(time, hits);
        Ok(())
    }

    /// Clears all timers, profiles and measurements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActiveProfiling`] if any profile is open.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_quiescent("reset")?;

        debug!(
            profiles = self.arena.len(),
            timers = self.tick_starts.len(),
            "resetting instance"
        );

        self.tick_starts.clear();
        self.arena.clear();
        self.top_level.clear();
        self.index.clear();

        Ok(())
    }

    /// Adds the statistics of another instance to the statistics of this one.
    ///
    /// Both instances must have recorded the same profile tree: the same names at the same
    /// depths under the same parents. Hit counts and total times of corresponding profiles
    /// are summed. Neither instance may have open profiles.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::thread;
    ///
    /// use ticktock::TickTock;
    ///
    /// fn work(tt: &mut TickTock) {
    ///     let _section = tt.profile("work");
    /// }
    ///
    /// let mut tt = TickTock::new();
    /// work(&mut tt);
    ///
    /// let worker = thread::spawn(|| {
    ///     let mut tt = TickTock::new();
    ///     work(&mut tt);
    ///     tt
    /// })
    /// .join()
    /// .unwrap();
    ///
    /// tt.fuse(&worker).unwrap();
    /// assert_eq!(tt.stats_by_profile_name("work").unwrap().0, 2);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActiveProfiling`] if either instance has open profiles.
    ///
    /// Returns [`Error::StructuralMismatch`] if the profile trees differ, in which case
    /// this instance is left unchanged.
    pub fn fuse(&mut self, other: &Self) -> Result<()> {
        self.ensure_quiescent("fuse")?;
        other.ensure_quiescent("fuse")?;

        let counterparts = self.counterparts_of(other)?;

        for (theirs, mine) in other.arena.iter().zip(counterparts) {
            self.node_mut(mine).record(theirs.sum(), theirs.hit_count());
        }

        debug!(profiles = self.arena.len(), "fused profiling statistics");

        Ok(())
    }

    /// Combines the statistics of several instances into a new instance.
    ///
    /// The first instance is copied and the others are fused into the copy in order,
    /// as with [`fuse()`][Self::fuse]. The new instance is owned by the current thread.
    /// An empty list produces an empty instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Aliasing`] if the same instance is given more than once.
    ///
    /// Returns the errors of [`fuse()`][Self::fuse] if the instances cannot be fused.
    pub fn fuse_multiple(instances: &[&Self]) -> Result<Self> {
        let aliased = instances
            .iter()
            .enumerate()
            .any(|(i, a)| instances.iter().take(i).any(|b| ptr::eq(*a, *b)));

        if aliased {
            return Err(Error::Aliasing);
        }

        let Some((first, rest)) = instances.split_first() else {
            return Ok(Self::new());
        };

        let mut fused = (*first).clone();
        fused.rebind_to_current_thread();

        for other in rest {
            fused.fuse(other)?;
        }

        Ok(fused)
    }

    /// Creates a report of all profiles, for reading or printing.
    ///
    /// Total times are shown in `unit` and mean times in the next smaller unit. If `unit`
    /// is `None`, a suitable unit is picked for every value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActiveProfiling`] if any profile is open.
    pub fn stringify_sections(&self, unit: Option<TimeUnit>) -> Result<Report> {
        self.ensure_quiescent("stringify sections")?;

        Ok(Report::from_ticktock(self, unit))
    }

    /// Iterates over all profiles of the tree, depth first, each profile followed by the
    /// profiles nested inside it.
    pub fn iter(&self) -> Profiles<'_> {
        Profiles::new(self, self.top_level.iter().rev().copied().collect())
    }

    /// Iterates over a profile followed by all profiles nested inside it, depth first.
    ///
    /// # Panics
    ///
    /// Panics if the identifier does not belong to this instance.
    pub fn iter_subtree(&self, id: ProfileId) -> Profiles<'_> {
        let profile = self.node(id);

        Profiles::new(self, vec![profile.id()])
    }

    /// The top-level profiles, in the order they were first opened.
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.top_level.iter().map(|id| self.node(*id))
    }

    /// Gets a profile by its identifier.
    #[must_use]
    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.arena.get(id.index())
    }

    /// Returns the hit count and total time of a profile with the given name.
    ///
    /// As names do not uniquely identify profiles, this returns the statistics of the first
    /// created profile with this name. Returns `None` if there is no such profile.
    #[must_use]
    pub fn stats_by_profile_name(&self, name: &str) -> Option<(u64, Duration)> {
        self.arena
            .iter()
            .find(|profile| profile.name() == name)
            .map(|profile| (profile.hit_count(), profile.sum()))
    }

    /// Whether no profiling has been performed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }

    /// Whether any profile is currently open.
    #[must_use]
    pub fn is_profiling(&self) -> bool {
        !self.stack.is_empty()
    }

    /// The number of currently open profiles.
    #[must_use]
    pub fn active_depth(&self) -> usize {
        self.stack.len()
    }

    /// Makes the current thread the owner of this instance.
    ///
    /// Use this after handing an instance over to another thread that continues profiling
    /// with it, to avoid warnings about use from a foreign thread.
    pub fn rebind_to_current_thread(&mut self) {
        self.owner = thread::current().id();
    }

    /// Ends open profiles until the profile opened by a scope guard at `position` has
    /// been ended as well.
    pub(crate) fn unwind_to(&mut self, profile: ProfileId, position: usize) {
        let still_open = self
            .stack
            .get(position)
            .is_some_and(|open| open.profile == profile);

        if !still_open {
            // A reset after the manual end may have discarded the profile itself.
            warn!(
                ?profile,
                name = ?self.get(profile).map(Profile::name),
                "scoped profile was already ended manually"
            );
            return;
        }

        while self.stack.len() > position.saturating_add(1) {
            let ended = self.platform.now();

            if let Some(elapsed) = self.close_innermost(ended) {
                if !thread::panicking() {
                    warn!(
                        ?elapsed,
                        "ended a profile that was left open inside a scoped profile"
                    );
                }
            }
        }

        let ended = self.platform.now();
        self.close_innermost(ended);
    }

    pub(crate) fn node(&self, id: ProfileId) -> &Profile {
        self.arena
            .get(id.index())
            .expect("profile identifiers are only handed out by the instance that owns them")
    }

    fn node_mut(&mut self, id: ProfileId) -> &mut Profile {
        self.arena
            .get_mut(id.index())
            .expect("profile identifiers are only handed out by the instance that owns them")
    }

    /// Finds the profile with the given name at the current position in the tree,
    /// creating it if it does not exist yet.
    fn resolve(&mut self, name: String) -> ProfileId {
        let key = ProfileKey {
            name,
            depth: self.stack.len(),
            parent: self.stack.last().map(|open| open.profile),
        };

        if let Some(existing) = self.index.get(&key) {
            return *existing;
        }

        let id = ProfileId::new(self.arena.len());

        debug!(name = %key.name, depth = key.depth, "new profile");

        match key.parent {
            Some(parent) => self.node_mut(parent).add_child(id),
            None => self.top_level.push(id),
        }

        self.arena.push(Profile::new(id, key.clone()));
        self.index.insert(key, id);

        id
    }

    /// Pops the innermost open profile and records its measurement.
    ///
    /// Returns `None` if no profile is open.
    fn close_innermost(&mut self, ended: Instant) -> Option<Duration> {
        let open = self.stack.pop()?;
        let elapsed = ended.saturating_duration_since(open.started);

        let profile = self.node_mut(open.profile);
        profile.record(elapsed, open.hits);

        trace!(name = profile.name(), ?elapsed, "profile ended");

        Some(elapsed)
    }

    /// Maps every profile of `other`, in storage order, to the profile with the same
    /// identity in this instance.
    fn counterparts_of(&self, other: &Self) -> Result<Vec<ProfileId>> {
        if self.arena.len() != other.arena.len() {
            return Err(Error::StructuralMismatch);
        }

        let mut counterparts: Vec<ProfileId> = Vec::with_capacity(other.arena.len());

        for theirs in &other.arena {
            // Parents are stored before their children, so the parent is already mapped.
            let parent = theirs.parent().map(|parent| {
                *counterparts
                    .get(parent.index())
                    .expect("parents are stored before their children")
            });

            let key = ProfileKey {
                name: theirs.name().to_string(),
                depth: theirs.depth(),
                parent,
            };

            let mine = self.index.get(&key).ok_or(Error::StructuralMismatch)?;
            counterparts.push(*mine);
        }

        // Equal sizes and distinct identities make this a one-to-one mapping.
        Ok(counterparts)
    }

    fn ensure_quiescent(&self, operation: &'static str) -> Result<()> {
        if self.is_profiling() {
            return Err(Error::ActiveProfiling { operation });
        }

        Ok(())
    }

    fn check_thread(&self, operation: &'static str) {
        let current = thread::current().id();

        if current != self.owner {
            warn!(
                operation,
                owner = ?self.owner,
                ?current,
                "TickTock instance used from a thread other than its owner"
            );
        }
    }
}

impl Default for TickTock {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a report of all profiles with a suitable unit picked for every value.
///
/// Unlike [`TickTock::stringify_sections()`], this does not fail while profiles are open.
/// Open profiles only contribute the hits they have already completed.
impl fmt::Display for TickTock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Report::from_ticktock(self, None))
    }
}

impl<'a> IntoIterator for &'a TickTock {
    type Item = &'a Profile;
    type IntoIter = Profiles<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

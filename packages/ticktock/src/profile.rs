use std::fmt;
use std::time::Duration;

/// Identifies a [`Profile`] within the [`TickTock`][crate::TickTock] instance that created it.
///
/// Identifiers are indexes into the profile storage of one instance and are meaningless
/// for any other instance.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ProfileId(usize);

impl ProfileId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// The identity of a profile: two profiles are the same profile if and only if
/// they have the same name, are at the same depth and have the same parent.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ProfileKey {
    pub(crate) name: String,
    pub(crate) depth: usize,
    pub(crate) parent: Option<ProfileId>,
}

/// Aggregated timing data for one named code section at a specific place in the
/// profile tree.
///
/// The same name can occur in several places of the tree (at different depths or under
/// different parents), in which case each place has its own `Profile` that accumulates
/// independently.
///
/// # Examples
///
/// ```
/// use ticktock::TickTock;
///
/// let mut tt = TickTock::new();
///
/// {
///     let _outer = tt.profile("load");
/// }
///
/// let load = tt.profiles().next().unwrap();
/// assert_eq!(load.name(), "load");
/// assert_eq!(load.depth(), 0);
/// assert_eq!(load.hit_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Profile {
    id: ProfileId,
    name: String,
    depth: usize,
    parent: Option<ProfileId>,
    children: Vec<ProfileId>,

    hit_count: u64,
    total_time: Duration,
}

impl Profile {
    pub(crate) fn new(id: ProfileId, key: ProfileKey) -> Self {
        debug_assert_eq!(
            key.parent.is_none(),
            key.depth == 0,
            "only top-level profiles may be without a parent"
        );

        Self {
            id,
            name: key.name,
            depth: key.depth,
            parent: key.parent,
            children: Vec::new(),
            hit_count: 0,
            total_time: Duration::ZERO,
        }
    }

    /// The identifier of this profile within its instance.
    #[must_use]
    pub fn id(&self) -> ProfileId {
        self.id
    }

    /// The name of the profiled code section.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of ancestor profiles.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The enclosing profile, or `None` for a top-level profile.
    #[must_use]
    pub fn parent(&self) -> Option<ProfileId> {
        self.parent
    }

    /// The directly nested profiles, in the order they were first opened.
    #[must_use]
    pub fn children(&self) -> &[ProfileId] {
        &self.children
    }

    /// The number of hits registered.
    #[must_use]
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    /// The total time of all registered hits.
    #[must_use]
    pub fn sum(&self) -> Duration {
        self.total_time
    }

    /// The mean time of one hit, or zero if no hits have been registered.
    #[must_use]
    pub fn mean(&self) -> Duration {
        if self.hit_count == 0 {
            return Duration::ZERO;
        }

        Duration::from_nanos(
            self.total_time
                .as_nanos()
                .checked_div(u128::from(self.hit_count))
                .expect("guarded by if condition")
                .try_into()
                .expect("all realistic values fit in u64"),
        )
    }

    pub(crate) fn add_child(&mut self, child: ProfileId) {
        debug_assert!(
            !self.children.contains(&child),
            "a child is registered with its parent only once"
        );

        self.children.push(child);
    }

    /// Adds `hits` hits that together took `elapsed`.
    pub(crate) fn record(&mut self, elapsed: Duration, hits: u64) {
        self.total_time = self.total_time.checked_add(elapsed).expect(
            "profile time accumulation overflows Duration - this indicates an unrealistic scenario",
        );

        self.hit_count = self.hit_count.checked_add(hits).expect(
            "profile hit count overflows u64 - this indicates an unrealistic scenario",
        );
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

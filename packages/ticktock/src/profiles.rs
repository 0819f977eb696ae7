use std::iter::FusedIterator;

use crate::{Profile, ProfileId, TickTock};

/// Depth-first iterator over profiles, yielding every profile before the profiles
/// nested inside it.
///
/// Created by [`TickTock::iter()`] and [`TickTock::iter_subtree()`].
#[derive(Debug)]
pub struct Profiles<'a> {
    ticktock: &'a TickTock,

    // Next profile to yield last.
    pending: Vec<ProfileId>,
}

impl<'a> Profiles<'a> {
    pub(crate) fn new(ticktock: &'a TickTock, pending: Vec<ProfileId>) -> Self {
        Self { ticktock, pending }
    }
}

impl<'a> Iterator for Profiles<'a> {
    type Item = &'a Profile;

    fn next(&mut self) -> Option<Self::Item> {
        let profile = self.ticktock.node(self.pending.pop()?);

        self.pending
            .extend(profile.children().iter().rev().copied());

        Some(profile)
    }
}

impl FusedIterator for Profiles<'_> {}

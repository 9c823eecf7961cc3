use serde::Serialize;
use std::collections::BTreeSet;

/// Canonical, deduplicated set of seat tokens.
///
/// Only [`crate::services::seats::normalize_seats`] builds one, so every
/// member is already trimmed and upper-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SeatSet(BTreeSet<String>);

impl SeatSet {
    pub(crate) fn from_normalized(seats: BTreeSet<String>) -> Self {
        Self(seats)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, seat: &str) -> bool {
        self.0.contains(seat)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// True when none of these seats appear in `booked`.
    pub fn is_disjoint(&self, booked: &BTreeSet<String>) -> bool {
        self.0.is_disjoint(booked)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a SeatSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

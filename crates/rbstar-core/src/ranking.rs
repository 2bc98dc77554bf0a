//! Tie-aware rankings.
//!
//! A [`Ranking`] is an ordered sequence of tie-groups. Every element of a
//! group shares the group's rank; the next group starts after all of them.
//!
//! ```
//! use rbstar_core::Ranking;
//!
//! // 1 first, then 2 and 3 tied, then 4
//! let ranking = Ranking::from_groups(vec![vec![1], vec![2, 3], vec![4]]);
//! assert_eq!(ranking.len(), 4);
//! assert_eq!(ranking.num_groups(), 3);
//! assert!(ranking.validate().is_ok());
//! ```

use crate::error::MetricError;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use std::ops::Add;

/// An ordered sequence of groups of tied elements.
///
/// Empty groups are never stored. Elements are not deduplicated on
/// construction; call [`Ranking::validate`] once the ranking is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ranking<E> {
    groups: Vec<Vec<E>>,
}

impl<E> Default for Ranking<E> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

impl<E> Ranking<E> {
    /// Creates an empty ranking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ranking from groups of tied elements, best group first.
    pub fn from_groups<I, G>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = E>,
    {
        let mut ranking = Self::new();
        for group in groups {
            ranking.push_group(group);
        }
        ranking
    }

    /// Builds a ranking without ties: one singleton group per element.
    pub fn from_elements<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        Self {
            groups: elements.into_iter().map(|e| vec![e]).collect(),
        }
    }

    /// Appends a tie-group after the current last group.
    ///
    /// An empty group is ignored.
    pub fn push_group<G>(&mut self, group: G)
    where
        G: IntoIterator<Item = E>,
    {
        let group: Vec<E> = group.into_iter().collect();
        if !group.is_empty() {
            self.groups.push(group);
        }
    }

    /// Returns the tie-groups in rank order.
    pub fn groups(&self) -> &[Vec<E>] {
        &self.groups
    }

    /// Iterates the tie-groups in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, Vec<E>> {
        self.groups.iter()
    }

    /// Iterates every element in rank order (group members in stored order).
    pub fn elements(&self) -> impl Iterator<Item = &E> {
        self.groups.iter().flatten()
    }

    /// Number of tie-groups.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Number of elements across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<E: Clone> Ranking<E> {
    /// Returns a new ranking with the groups of `other` appended after ours.
    ///
    /// Elements present in both rankings are kept twice.
    pub fn concat(&self, other: &Ranking<E>) -> Ranking<E> {
        let mut groups = Vec::with_capacity(self.groups.len() + other.groups.len());
        groups.extend(self.groups.iter().cloned());
        groups.extend(other.groups.iter().cloned());
        Ranking { groups }
    }

    /// Returns the groups of this ranking restricted to elements for which
    /// `keep` holds, dropping groups that become empty.
    pub fn filter<F>(&self, mut keep: F) -> Ranking<E>
    where
        F: FnMut(&E) -> bool,
    {
        Ranking::from_groups(
            self.groups
                .iter()
                .map(|group| group.iter().filter(|e| keep(e)).cloned().collect::<Vec<_>>()),
        )
    }
}

impl<E: Eq + Hash + Display> Ranking<E> {
    /// Checks that no element appears more than once across all groups.
    pub fn validate(&self) -> Result<(), MetricError> {
        let mut seen = HashSet::with_capacity(self.len());
        for element in self.elements() {
            if !seen.insert(element) {
                return Err(MetricError::DuplicateElement {
                    element: element.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<E: Clone> Add<&Ranking<E>> for &Ranking<E> {
    type Output = Ranking<E>;

    fn add(self, other: &Ranking<E>) -> Ranking<E> {
        self.concat(other)
    }
}

impl<E> FromIterator<Vec<E>> for Ranking<E> {
    fn from_iter<I: IntoIterator<Item = Vec<E>>>(iter: I) -> Self {
        Self::from_groups(iter)
    }
}

impl<'a, E> IntoIterator for &'a Ranking<E> {
    type Item = &'a Vec<E>;
    type IntoIter = std::slice::Iter<'a, Vec<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

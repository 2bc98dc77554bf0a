//! Positive/negative relevance sets.

use crate::config::RELEVANCE_CUTOFF;
use crate::error::MetricError;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

/// Elements partitioned into positive and negative judgments.
///
/// Built incrementally with [`RelevanceSet::add`]; call
/// [`RelevanceSet::validate`] once fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelevanceSet<E> {
    positive: Vec<E>,
    negative: Vec<E>,
}

impl<E> Default for RelevanceSet<E> {
    fn default() -> Self {
        Self {
            positive: Vec::new(),
            negative: Vec::new(),
        }
    }
}

impl<E> RelevanceSet<E> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from explicit positive and negative elements.
    pub fn from_parts<P, N>(positive: P, negative: N) -> Self
    where
        P: IntoIterator<Item = E>,
        N: IntoIterator<Item = E>,
    {
        Self {
            positive: positive.into_iter().collect(),
            negative: negative.into_iter().collect(),
        }
    }

    /// Records a judgment: grades at or above [`RELEVANCE_CUTOFF`] are positive.
    pub fn add(&mut self, element: E, relevance: i32) {
        if relevance >= RELEVANCE_CUTOFF {
            self.positive.push(element);
        } else {
            self.negative.push(element);
        }
    }

    pub fn add_positive(&mut self, element: E) {
        self.positive.push(element);
    }

    pub fn add_negative(&mut self, element: E) {
        self.negative.push(element);
    }

    /// Positive elements in insertion order.
    pub fn positives(&self) -> &[E] {
        &self.positive
    }

    /// Negative elements in insertion order.
    pub fn negatives(&self) -> &[E] {
        &self.negative
    }

    /// Total number of judged elements.
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

impl<E: Eq + Hash> RelevanceSet<E> {
    /// Returns the positive elements as a set.
    pub fn positive_set(&self) -> HashSet<&E> {
        self.positive.iter().collect()
    }

    /// Returns the negative elements as a set.
    pub fn negative_set(&self) -> HashSet<&E> {
        self.negative.iter().collect()
    }
}

impl<E: Eq + Hash + Display> RelevanceSet<E> {
    /// Checks that no element is duplicated within or across the partitions.
    pub fn validate(&self) -> Result<(), MetricError> {
        let mut seen = HashSet::with_capacity(self.len());
        for element in self.positive.iter().chain(&self.negative) {
            if !seen.insert(element) {
                return Err(MetricError::DuplicateElement {
                    element: element.to_string(),
                });
            }
        }
        Ok(())
    }
}

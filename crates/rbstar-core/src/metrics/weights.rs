//! Rank-weight assignment for tie-aware rankings.
//!
//! Position i (1-indexed) of a ranking carries the rank-biased weight
//! (1 - φ)·φ^(i-1). A tie-group covering positions s+1..=s+g receives the sum
//! of its positions' weights, shared equally among its members:
//!
//! ```text
//! w(e) = (1 - φ) · φ^s · (1 - φ^g) / (g · (1 - φ))   for every e in the group
//! ```
//!
//! so the total mass of a ranking of n elements is 1 - φ^n regardless of how
//! its elements are tied.

use crate::config::Persistence;
use crate::ranking::Ranking;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Rank and weight assigned to one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankWeight {
    /// 1-indexed position of the first element of the element's group
    pub rank: usize,
    /// The element's share of its group's rank-biased mass
    pub weight: f64,
}

/// Per-element ranks and weights derived from one [`Ranking`].
///
/// Entries are kept in element order, which makes every sum over a table
/// independent of which ranking it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct RankWeightTable<E> {
    entries: BTreeMap<E, RankWeight>,
    positions: usize,
    remaining_mass: f64,
}

impl<E: Ord> RankWeightTable<E> {
    /// Returns the rank and weight of `element`, if it was ranked.
    pub fn get(&self, element: &E) -> Option<&RankWeight> {
        self.entries.get(element)
    }

    /// Returns the weight of `element`, if it was ranked.
    pub fn weight(&self, element: &E) -> Option<f64> {
        self.entries.get(element).map(|rw| rw.weight)
    }

    pub fn contains(&self, element: &E) -> bool {
        self.entries.contains_key(element)
    }
}

impl<E> RankWeightTable<E> {
    /// Iterates `(element, rank/weight)` pairs in element order.
    pub fn iter(&self) -> btree_map::Iter<'_, E, RankWeight> {
        self.entries.iter()
    }

    /// Number of distinct elements in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of ranked positions that were weighted.
    ///
    /// Equals [`len`](Self::len) for a validated ranking.
    pub fn positions(&self) -> usize {
        self.positions
    }

    /// φ^N for N weighted positions: the mass left for positions beyond the
    /// end of the ranking.
    pub fn remaining_mass(&self) -> f64 {
        self.remaining_mass
    }

    /// Sum of all element weights.
    pub fn total_weight(&self) -> f64 {
        self.entries.values().map(|rw| rw.weight).sum()
    }
}

/// Computes the rank and weight of every element of `ranking`.
///
/// # Example
///
/// ```
/// use rbstar_core::config::Persistence;
/// use rbstar_core::metrics::compute_rank_weights;
/// use rbstar_core::Ranking;
///
/// let phi = Persistence::new(0.5).unwrap();
/// let ranking = Ranking::from_groups(vec![vec!["a"], vec!["b", "c"]]);
/// let table = compute_rank_weights(&ranking, phi);
///
/// assert_eq!(table.get(&"a").unwrap().rank, 1);
/// assert_eq!(table.get(&"b").unwrap().rank, 2);
/// // Positions 2 and 3 carry 0.25 and 0.125; b and c split them evenly
/// assert!((table.weight(&"c").unwrap() - 0.1875).abs() < 1e-12);
/// ```
pub fn compute_rank_weights<E>(ranking: &Ranking<E>, phi: Persistence) -> RankWeightTable<E>
where
    E: Clone + Ord,
{
    let phi = phi.value();
    let mut entries = BTreeMap::new();
    let mut weight = 1.0 - phi;
    let mut remaining_mass = 1.0;
    let mut rank = 1;

    for group in ranking {
        let mut group_weight = 0.0;
        for _ in group {
            group_weight += weight;
            weight *= phi;
            remaining_mass *= phi;
        }

        let share = group_weight / group.len() as f64;
        for element in group {
            entries.insert(
                element.clone(),
                RankWeight {
                    rank,
                    weight: share,
                },
            );
        }
        rank += group.len();
    }

    RankWeightTable {
        entries,
        positions: rank - 1,
        remaining_mass,
    }
}

//! Rank-Biased Precision (ranking | set).
//!
//! # References
//!
//! - Moffat & Zobel (2008). "Rank-biased precision for measurement of retrieval effectiveness"

use super::weights::compute_rank_weights;
use super::MetricResult;
use crate::config::Persistence;
use crate::ranking::Ranking;
use crate::relevance::RelevanceSet;

/// Computes RBP of an observed ranking against a reference relevance set.
///
/// The lower bound counts only elements judged positive. The upper bound
/// starts from 1.0 and removes the weight of every element judged negative,
/// so unjudged elements and positions beyond the end of the ranking are
/// assumed relevant.
pub fn rb_precision<E>(
    observation: &Ranking<E>,
    reference: &RelevanceSet<E>,
    phi: Persistence,
) -> MetricResult
where
    E: Clone + Ord,
{
    let weights = compute_rank_weights(observation, phi);

    let lower: f64 = reference
        .positives()
        .iter()
        .filter_map(|e| weights.weight(e))
        .sum();

    let negative_mass: f64 = reference
        .negatives()
        .iter()
        .filter_map(|e| weights.weight(e))
        .sum();

    MetricResult::new(lower, 1.0 - negative_mass)
}

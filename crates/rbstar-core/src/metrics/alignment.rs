//! Rank-Biased Alignment (ranking | ranking).
//!
//! Each element shared by two rankings contributes the geometric mean of its
//! two rank weights. Identical infinite rankings score 1.0; any displacement
//! of an element lowers its contribution.

use super::weights::{compute_rank_weights, RankWeightTable};
use super::{missing_tail, MetricResult};
use crate::config::Persistence;
use crate::ranking::Ranking;

/// Computes RBA between two rankings. The result is symmetric in its
/// arguments.
///
/// The lower bound sums the contributions of elements present in both
/// rankings. For the upper bound each ranking is extended with the elements
/// only the other one holds (in the other's order), so both cover the union;
/// the extended pair is scored the same way and the mass φ^k beyond the k
/// positions of the union is added, assuming perfect agreement past the
/// known data.
///
/// When both rankings hold the same elements nothing is missing and the two
/// bounds coincide.
pub fn rb_alignment<E>(
    observation: &Ranking<E>,
    reference: &Ranking<E>,
    phi: Persistence,
) -> MetricResult
where
    E: Clone + Ord,
{
    let obs_weights = compute_rank_weights(observation, phi);
    let ref_weights = compute_rank_weights(reference, phi);
    let base = aligned_mass(&obs_weights, &ref_weights);

    let obs_tail = missing_tail(reference, &obs_weights);
    let ref_tail = missing_tail(observation, &ref_weights);
    if obs_tail.is_empty() && ref_tail.is_empty() {
        return MetricResult::new(base, base);
    }

    let obs_extended = compute_rank_weights(&observation.concat(&obs_tail), phi);
    let ref_extended = compute_rank_weights(&reference.concat(&ref_tail), phi);
    let upper = aligned_mass(&obs_extended, &ref_extended) + obs_extended.remaining_mass();

    MetricResult::new(base, upper)
}

/// Σ sqrt(w_a(e) · w_b(e)) over the elements both tables hold, in element order.
fn aligned_mass<E: Ord>(a: &RankWeightTable<E>, b: &RankWeightTable<E>) -> f64 {
    a.iter()
        .filter_map(|(element, wa)| b.weight(element).map(|wb| (wa.weight * wb).sqrt()))
        .sum()
}

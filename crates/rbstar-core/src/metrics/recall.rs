//! Rank-Biased Recall (set | ranking).

use super::weights::compute_rank_weights;
use super::MetricResult;
use crate::config::Persistence;
use crate::ranking::Ranking;
use crate::relevance::RelevanceSet;

/// Computes RBR of an observed relevance set against a reference ranking.
///
/// Each positive element of the observation that the reference ranks
/// contributes its reference weight to the lower bound. Positive elements the
/// reference never ranks are assumed to follow its last position, one after
/// another: the first at position N+1 with weight (1 - φ)·φ^N, the next at
/// N+2, and so on. Their weights form the residual.
///
/// Negative judgments in the observation are not used.
pub fn rb_recall<E>(
    observation: &RelevanceSet<E>,
    reference: &Ranking<E>,
    phi: Persistence,
) -> MetricResult
where
    E: Clone + Ord,
{
    let weights = compute_rank_weights(reference, phi);

    let mut lower = 0.0;
    let mut residual = 0.0;
    let mut next_weight = phi.complement() * weights.remaining_mass();

    for element in observation.positives() {
        match weights.weight(element) {
            Some(weight) => lower += weight,
            None => {
                residual += next_weight;
                next_weight *= phi.value();
            }
        }
    }

    MetricResult::new(lower, lower + residual)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phi(value: f64) -> Persistence {
        Persistence::new(value).unwrap()
    }

    #[test]
    fn test_all_positives_ranked() {
        let reference = Ranking::from_elements(1..=24u32);
        let observation = RelevanceSet::from_parts(vec![1, 2, 3], vec![]);
        let result = rb_recall(&observation, &reference, phi(0.8));

        assert!((result.lower_bound - 0.488).abs() < 1e-9);
        assert_eq!(result.residual(), 0.0);
    }

    #[test]
    fn test_missing_positives_follow_reference_tail() {
        let reference = Ranking::from_elements(1..=3u32);
        let observation = RelevanceSet::from_parts(vec![1, 7, 9], vec![]);
        let result = rb_recall(&observation, &reference, phi(0.8));

        // 7 and 9 land at ranks 4 and 5
        let expected_residual = 0.2 * 0.8f64.powi(3) + 0.2 * 0.8f64.powi(4);
        assert!((result.lower_bound - 0.2).abs() < 1e-9);
        assert!((result.residual() - expected_residual).abs() < 1e-9);
    }

    #[test]
    fn test_upper_bound_never_exceeds_one() {
        let reference = Ranking::from_elements([1u32]);
        let observation = RelevanceSet::from_parts(1..=200, vec![]);
        let result = rb_recall(&observation, &reference, phi(0.5));
        assert!(result.upper_bound <= 1.0 + 1e-12);
    }

    #[test]
    fn test_empty_observation() {
        let reference = Ranking::from_elements(1..=10u32);
        let observation = RelevanceSet::new();
        let result = rb_recall(&observation, &reference, phi(0.8));
        assert_eq!(result, MetricResult::new(0.0, 0.0));
    }

    #[test]
    fn test_negatives_are_ignored() {
        let reference = Ranking::from_elements(1..=5u32);
        let with_negatives = RelevanceSet::from_parts(vec![2], vec![1, 3, 99]);
        let without = RelevanceSet::from_parts(vec![2], vec![]);
        assert_eq!(
            rb_recall(&with_negatives, &reference, phi(0.8)),
            rb_recall(&without, &reference, phi(0.8))
        );
    }

    #[test]
    fn test_empty_reference() {
        let reference: Ranking<u32> = Ranking::new();
        let observation = RelevanceSet::from_parts(vec![1], vec![]);
        let result = rb_recall(&observation, &reference, phi(0.8));
        assert_eq!(result.lower_bound, 0.0);
        assert!((result.upper_bound - 0.2).abs() < 1e-12);
    }
}

//! Rank-Biased Overlap (ranking | ranking).
//!
//! RBO averages the agreement of two rankings' prefixes, weighting depth d by
//! (1 - φ)·φ^(d-1):
//!
//! ```text
//! RBO = Σ_d (1 - φ) · φ^(d-1) · X_d / d
//! ```
//!
//! where X_d is the overlap of the two depth-d prefixes. Ties are handled by
//! fractional inclusion: an element of a group of size g that starts after
//! position s is included to the extent (d - s) / g at depth d (clamped to
//! [0, 1]), and the overlap counts min(inclusion_a, inclusion_b) per element.
//! Without ties this is the size of the prefix intersection.
//!
//! # References
//!
//! - Webber, Moffat & Zobel (2010). "A similarity measure for indefinite rankings"
//! - Corsi & Urbano (2024). "The treatment of ties in rank-biased overlap"

use super::weights::compute_rank_weights;
use super::{missing_tail, MetricResult};
use crate::config::Persistence;
use crate::ranking::Ranking;
use std::collections::{BTreeMap, BTreeSet};

/// Computes RBO between two rankings. The result is symmetric in its
/// arguments.
///
/// The lower bound scores the common prefix depth k and extrapolates assuming
/// no further agreement: the overlap stays at X_k for every deeper prefix,
/// whose closed form is
///
/// ```text
/// X_k · (1 - φ) / φ · (-ln(1 - φ) - Σ_{d=1..k} φ^d / d)
/// ```
///
/// The upper bound extends each ranking with the elements only the other
/// holds, scores the extended pair to the full depth of their union, and adds
/// φ^depth for perfect agreement beyond it.
///
/// When both rankings hold the same elements nothing is missing and the two
/// bounds coincide.
pub fn rb_overlap<E>(
    observation: &Ranking<E>,
    reference: &Ranking<E>,
    phi: Persistence,
) -> MetricResult
where
    E: Clone + Ord,
{
    let prefix = OverlapState::run(observation, reference, phi);
    let lower = prefix.score + prefix.fixed_overlap_tail(phi);

    let obs_tail = missing_tail(reference, &compute_rank_weights(observation, phi));
    let ref_tail = missing_tail(observation, &compute_rank_weights(reference, phi));
    if obs_tail.is_empty() && ref_tail.is_empty() {
        return MetricResult::new(lower, lower);
    }

    let extended = OverlapState::run(
        &observation.concat(&obs_tail),
        &reference.concat(&ref_tail),
        phi,
    );
    debug_assert!((extended.overlap - extended.depth as f64).abs() < 1e-9);
    let upper = extended.score + extended.remaining_mass;

    // Both runs share the first k depths; only rounding can invert them
    MetricResult::new(lower, upper.max(lower))
}

/// Running state of the prefix scorer after its last depth.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OverlapState {
    /// Σ (1 - φ)·φ^(d-1)·X_d/d over the depths scored
    score: f64,
    /// X_d at the final depth
    overlap: f64,
    /// Final depth: the length of the shorter ranking
    depth: usize,
    /// φ^depth
    remaining_mass: f64,
    /// Σ φ^d / d over the depths scored
    log_series: f64,
}

impl OverlapState {
    /// Scores both rankings depth by depth until the shorter one runs out.
    fn run<E: Ord>(a: &Ranking<E>, b: &Ranking<E>, phi: Persistence) -> Self {
        let depth = a.len().min(b.len());
        let phi_value = phi.value();

        let mut cursor_a = GroupCursor::new(a);
        let mut cursor_b = GroupCursor::new(b);
        // Elements seen by both rankings but not yet fully included in both
        let mut pending: BTreeSet<&E> = BTreeSet::new();
        let mut settled = 0usize;
        let mut introduced = Vec::new();

        let mut state = OverlapState {
            score: 0.0,
            overlap: 0.0,
            depth,
            remaining_mass: 1.0,
            log_series: 0.0,
        };
        let mut weight = phi.complement();

        for d in 1..=depth {
            introduced.clear();
            cursor_a.advance_to(d, &mut introduced);
            pending.extend(introduced.drain(..).filter(|e| cursor_b.has_seen(e)));
            cursor_b.advance_to(d, &mut introduced);
            pending.extend(introduced.drain(..).filter(|e| cursor_a.has_seen(e)));

            let mut partial = 0.0;
            pending.retain(|e| {
                let ia = cursor_a.inclusion(e, d);
                let ib = cursor_b.inclusion(e, d);
                if ia >= 1.0 && ib >= 1.0 {
                    settled += 1;
                    false
                } else {
                    partial += ia.min(ib);
                    true
                }
            });

            state.overlap = settled as f64 + partial;
            state.score += weight * state.overlap / d as f64;
            weight *= phi_value;
            state.remaining_mass *= phi_value;
            state.log_series += state.remaining_mass / d as f64;
        }

        state
    }

    /// Mass contributed by every depth past the last one if the overlap never
    /// grows again.
    fn fixed_overlap_tail(&self, phi: Persistence) -> f64 {
        if self.depth == 0 {
            return 0.0;
        }
        let phi = phi.value();
        let series_limit = -(-phi).ln_1p();
        let rest = (series_limit - self.log_series).max(0.0);
        self.overlap * (1.0 - phi) / phi * rest
    }
}

/// Position of one tie-group: the number of elements ranked before it and
/// its size.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    size: usize,
}

impl Span {
    /// Fraction of the group inside the depth-`depth` prefix.
    fn inclusion(&self, depth: usize) -> f64 {
        if depth <= self.start {
            0.0
        } else if depth >= self.start + self.size {
            1.0
        } else {
            (depth - self.start) as f64 / self.size as f64
        }
    }
}

/// Walks a ranking's groups in order, recording the span of every element
/// whose group has been entered.
struct GroupCursor<'a, E> {
    groups: &'a [Vec<E>],
    next_group: usize,
    next_start: usize,
    spans: BTreeMap<&'a E, Span>,
}

impl<'a, E: Ord> GroupCursor<'a, E> {
    fn new(ranking: &'a Ranking<E>) -> Self {
        Self {
            groups: ranking.groups(),
            next_group: 0,
            next_start: 0,
            spans: BTreeMap::new(),
        }
    }

    /// Enters every group that starts before `depth`, pushing its members
    /// onto `introduced`.
    fn advance_to(&mut self, depth: usize, introduced: &mut Vec<&'a E>) {
        let groups = self.groups;
        while self.next_group < groups.len() && self.next_start < depth {
            let group = &groups[self.next_group];
            let span = Span {
                start: self.next_start,
                size: group.len(),
            };
            for element in group {
                self.spans.insert(element, span);
                introduced.push(element);
            }
            self.next_start += group.len();
            self.next_group += 1;
        }
    }

    fn has_seen(&self, element: &E) -> bool {
        self.spans.contains_key(element)
    }

    fn inclusion(&self, element: &E, depth: usize) -> f64 {
        self.spans
            .get(element)
            .map_or(0.0, |span| span.inclusion(depth))
    }
}

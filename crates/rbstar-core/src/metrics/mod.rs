//! Rank-biased metrics with residual bounds.
//!
//! Every metric compares an *observation* with a *reference* and returns a
//! [`MetricResult`]: a lower bound computed from the known data, an upper
//! bound assuming every unknown resolves favourably, and their difference,
//! the residual.
//!
//! | Metric | Observation | Reference | Function |
//! |--------|-------------|-----------|----------|
//! | RBP | ranking | set | [`rb_precision`] |
//! | RBR | set | ranking | [`rb_recall`] |
//! | RBA | ranking | ranking | [`rb_alignment`] |
//! | RBO | ranking | ranking | [`rb_overlap`] |
//!
//! All four share the rank weights of [`compute_rank_weights`] and are pure
//! functions of their inputs, so queries can be evaluated in parallel.
//!
//! # Example
//!
//! ```
//! use rbstar_core::config::Persistence;
//! use rbstar_core::metrics::{rb_overlap, Evidence, Metric};
//! use rbstar_core::Ranking;
//!
//! let phi = Persistence::new(0.8).unwrap();
//! let a = Ranking::from_elements(1..=10);
//! let b = Ranking::from_elements([2, 1, 4, 3, 6, 5, 8, 7, 10, 9]);
//!
//! let direct = rb_overlap(&a, &b, phi);
//! assert!((direct.lower_bound - 0.699).abs() < 1e-3);
//!
//! // The same computation through the metric selector
//! let dispatched = Metric::Overlap
//!     .evaluate(&Evidence::Ranking(a), &Evidence::Ranking(b), phi)
//!     .unwrap();
//! assert_eq!(direct, dispatched);
//! ```

mod alignment;
mod overlap;
mod precision;
mod recall;
mod weights;

pub use alignment::rb_alignment;
pub use overlap::rb_overlap;
pub use precision::rb_precision;
pub use recall::rb_recall;
pub use weights::{compute_rank_weights, RankWeight, RankWeightTable};

use crate::config::Persistence;
use crate::error::MetricError;
use crate::ranking::Ranking;
use crate::relevance::RelevanceSet;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use tracing::trace;

// ============================================================================
// Result
// ============================================================================

/// Lower and upper bound of one metric evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricResult {
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl MetricResult {
    pub fn new(lower_bound: f64, upper_bound: f64) -> Self {
        debug_assert!(
            upper_bound >= lower_bound - 1e-12,
            "upper bound {} below lower bound {}",
            upper_bound,
            lower_bound
        );
        // Adding 0.0 turns an empty sum's -0.0 into 0.0
        Self {
            lower_bound: lower_bound + 0.0,
            upper_bound: upper_bound + 0.0,
        }
    }

    /// Upper bound minus lower bound: the uncertainty left by missing data.
    pub fn residual(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

impl Serialize for MetricResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MetricResult", 3)?;
        state.serialize_field("lower_bound", &self.lower_bound)?;
        state.serialize_field("upper_bound", &self.upper_bound)?;
        state.serialize_field("residual", &self.residual())?;
        state.end()
    }
}

// ============================================================================
// Metric selection
// ============================================================================

/// The shape of a metric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Ranking,
    Set,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Ranking => f.write_str("ranking"),
            Shape::Set => f.write_str("set"),
        }
    }
}

/// One query's already-parsed observation or reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence<E> {
    Ranking(Ranking<E>),
    Set(RelevanceSet<E>),
}

impl<E> Evidence<E> {
    pub fn shape(&self) -> Shape {
        match self {
            Evidence::Ranking(_) => Shape::Ranking,
            Evidence::Set(_) => Shape::Set,
        }
    }

    /// An empty ranking or set, for queries with no data.
    pub fn empty(shape: Shape) -> Self {
        match shape {
            Shape::Ranking => Evidence::Ranking(Ranking::new()),
            Shape::Set => Evidence::Set(RelevanceSet::new()),
        }
    }
}

impl<E> From<Ranking<E>> for Evidence<E> {
    fn from(ranking: Ranking<E>) -> Self {
        Evidence::Ranking(ranking)
    }
}

impl<E> From<RelevanceSet<E>> for Evidence<E> {
    fn from(set: RelevanceSet<E>) -> Self {
        Evidence::Set(set)
    }
}

/// The four rank-biased metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    /// Rank-Biased Precision: ranking | set
    #[serde(rename = "RBP")]
    Precision,
    /// Rank-Biased Recall: set | ranking
    #[serde(rename = "RBR")]
    Recall,
    /// Rank-Biased Alignment: ranking | ranking
    #[serde(rename = "RBA")]
    Alignment,
    /// Rank-Biased Overlap: ranking | ranking
    #[serde(rename = "RBO")]
    Overlap,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Precision,
        Metric::Recall,
        Metric::Alignment,
        Metric::Overlap,
    ];

    /// Short name used in reports: RBP, RBR, RBA or RBO.
    pub fn short_name(&self) -> &'static str {
        match self {
            Metric::Precision => "RBP",
            Metric::Recall => "RBR",
            Metric::Alignment => "RBA",
            Metric::Overlap => "RBO",
        }
    }

    pub fn observation_shape(&self) -> Shape {
        match self {
            Metric::Recall => Shape::Set,
            _ => Shape::Ranking,
        }
    }

    pub fn reference_shape(&self) -> Shape {
        match self {
            Metric::Precision => Shape::Set,
            _ => Shape::Ranking,
        }
    }

    /// Evaluates this metric on one query.
    ///
    /// Returns [`MetricError::ShapeMismatch`], without computing anything,
    /// when either input has the wrong shape.
    pub fn evaluate<E>(
        &self,
        observation: &Evidence<E>,
        reference: &Evidence<E>,
        phi: Persistence,
    ) -> Result<MetricResult, MetricError>
    where
        E: Clone + Eq + Hash + Ord,
    {
        let result = match (self, observation, reference) {
            (Metric::Precision, Evidence::Ranking(obs), Evidence::Set(reference)) => {
                rb_precision(obs, reference, phi)
            }
            (Metric::Recall, Evidence::Set(obs), Evidence::Ranking(reference)) => {
                rb_recall(obs, reference, phi)
            }
            (Metric::Alignment, Evidence::Ranking(obs), Evidence::Ranking(reference)) => {
                rb_alignment(obs, reference, phi)
            }
            (Metric::Overlap, Evidence::Ranking(obs), Evidence::Ranking(reference)) => {
                rb_overlap(obs, reference, phi)
            }
            _ => return Err(self.shape_mismatch(observation.shape(), reference.shape())),
        };

        trace!(
            metric = self.short_name(),
            lower = result.lower_bound,
            upper = result.upper_bound,
            "evaluated query"
        );
        Ok(result)
    }

    /// Describes the first input whose shape does not fit this metric.
    fn shape_mismatch(&self, observation: Shape, reference: Shape) -> MetricError {
        let (role, expected, found) = if observation != self.observation_shape() {
            ("observation", self.observation_shape(), observation)
        } else {
            ("reference", self.reference_shape(), reference)
        };
        MetricError::ShapeMismatch {
            metric: *self,
            role,
            expected,
            found,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Error returned when parsing an unknown metric name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown metric: {0} (expected one of rbp, rbr, rba, rbo)")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.short_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// The groups of `other` restricted to elements absent from `present`.
///
/// Appending this tail to the ranking `present` was built from makes it
/// cover every element of `other`, in `other`'s order.
pub(crate) fn missing_tail<E>(other: &Ranking<E>, present: &RankWeightTable<E>) -> Ranking<E>
where
    E: Clone + Ord,
{
    other.filter(|e| !present.contains(e))
}

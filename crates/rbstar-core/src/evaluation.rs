//! Batch evaluation of a run against a reference, one query at a time.
//!
//! # Query coverage
//!
//! The reference decides which queries are scored:
//!
//! | Query present in | Outcome |
//! |------------------|---------|
//! | reference and observation | scored normally |
//! | reference only | scored against empty evidence of the observation's shape |
//! | observation only | skipped with a warning |
//!
//! Queries are scored in parallel with rayon; results come back ordered by
//! query id.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use rbstar_core::config::MetricConfig;
//! use rbstar_core::evaluation::{evaluate_queries, mean_result};
//! use rbstar_core::metrics::{Evidence, Metric};
//! use rbstar_core::ranking::Ranking;
//!
//! let mut observations = BTreeMap::new();
//! observations.insert("q1".to_string(), Evidence::from(Ranking::from_elements(["a", "b"])));
//! let mut references = BTreeMap::new();
//! references.insert("q1".to_string(), Evidence::from(Ranking::from_elements(["a", "b"])));
//!
//! let config = MetricConfig::new(Metric::Overlap, 0.9).unwrap();
//! let scored = evaluate_queries(&config, &observations, &references).unwrap();
//! assert_eq!(scored.len(), 1);
//!
//! let mean = mean_result(&scored);
//! assert!(mean.lower_bound <= mean.upper_bound);
//! ```

use crate::config::MetricConfig;
use crate::error::MetricError;
use crate::metrics::{Evidence, MetricResult};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::hash::Hash;
use tracing::{debug, warn};

/// Bounds computed for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryEvaluation {
    pub query_id: String,
    pub result: MetricResult,
}

/// Scores every query of `references` with the configured metric.
///
/// Fails on the first query whose evidence has the wrong shape for the
/// metric.
pub fn evaluate_queries<E>(
    config: &MetricConfig,
    observations: &BTreeMap<String, Evidence<E>>,
    references: &BTreeMap<String, Evidence<E>>,
) -> Result<Vec<QueryEvaluation>, MetricError>
where
    E: Clone + Eq + Hash + Ord + Send + Sync,
{
    for query_id in observations.keys().filter(|q| !references.contains_key(*q)) {
        warn!(query_id = %query_id, "query has no reference, skipping");
    }

    let empty = Evidence::empty(config.metric().observation_shape());
    debug!(
        metric = %config.metric(),
        phi = config.phi().value(),
        queries = references.len(),
        "evaluating queries"
    );

    references
        .par_iter()
        .map(|(query_id, reference)| {
            let observation = observations.get(query_id).unwrap_or(&empty);
            config
                .evaluate(observation, reference)
                .map(|result| QueryEvaluation {
                    query_id: query_id.clone(),
                    result,
                })
        })
        .collect()
}

/// Averages lower and upper bounds over queries. An empty slice averages to
/// zero.
pub fn mean_result(evaluations: &[QueryEvaluation]) -> MetricResult {
    if evaluations.is_empty() {
        return MetricResult::new(0.0, 0.0);
    }
    let n = evaluations.len() as f64;
    let lower: f64 = evaluations.iter().map(|e| e.result.lower_bound).sum();
    let upper: f64 = evaluations.iter().map(|e| e.result.upper_bound).sum();
    MetricResult::new(lower / n, upper / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Metric, Shape};
    use crate::ranking::Ranking;
    use crate::relevance::RelevanceSet;

    fn ranking(elements: &[&str]) -> Evidence<String> {
        Evidence::Ranking(Ranking::from_elements(elements.iter().map(|e| e.to_string())))
    }

    fn queries(entries: Vec<(&str, Evidence<String>)>) -> BTreeMap<String, Evidence<String>> {
        entries
            .into_iter()
            .map(|(q, evidence)| (q.to_string(), evidence))
            .collect()
    }

    #[test]
    fn test_results_ordered_by_query_id() {
        let references = queries(vec![
            ("q3", ranking(&["a"])),
            ("q1", ranking(&["a"])),
            ("q2", ranking(&["a"])),
        ]);
        let observations = references.clone();
        let config = MetricConfig::new(Metric::Alignment, 0.9).unwrap();

        let scored = evaluate_queries(&config, &observations, &references).unwrap();
        let ids: Vec<&str> = scored.iter().map(|e| e.query_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn test_missing_observation_scores_as_empty() {
        let references = queries(vec![("q1", ranking(&["a", "b"]))]);
        let observations = BTreeMap::new();
        let config = MetricConfig::new(Metric::Overlap, 0.9).unwrap();

        let scored = evaluate_queries(&config, &observations, &references).unwrap();
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].result.lower_bound, 0.0);
        assert!((scored[0].result.upper_bound - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_observation_uses_observation_shape() {
        // RBR observes a set and references a ranking
        let references = queries(vec![("q1", ranking(&["a", "b"]))]);
        let config = MetricConfig::new(Metric::Recall, 0.8).unwrap();
        assert_eq!(config.metric().observation_shape(), Shape::Set);

        let scored = evaluate_queries(&config, &BTreeMap::new(), &references).unwrap();
        assert_eq!(scored[0].result, MetricResult::new(0.0, 0.0));
    }

    #[test]
    fn test_observation_only_queries_skipped() {
        let references = queries(vec![("q1", ranking(&["a"]))]);
        let observations = queries(vec![("q1", ranking(&["a"])), ("q9", ranking(&["z"]))]);
        let config = MetricConfig::new(Metric::Overlap, 0.9).unwrap();

        let scored = evaluate_queries(&config, &observations, &references).unwrap();
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].query_id, "q1");
    }

    #[test]
    fn test_shape_mismatch_propagates() {
        let set = Evidence::Set(RelevanceSet::from_parts(vec!["a".to_string()], vec![]));
        let references = queries(vec![("q1", set)]);
        let observations = queries(vec![("q1", ranking(&["a"]))]);
        let config = MetricConfig::new(Metric::Overlap, 0.9).unwrap();

        let err = evaluate_queries(&config, &observations, &references).unwrap_err();
        assert!(matches!(err, MetricError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_mean_result() {
        let evaluations = vec![
            QueryEvaluation {
                query_id: "a".into(),
                result: MetricResult::new(0.2, 0.4),
            },
            QueryEvaluation {
                query_id: "b".into(),
                result: MetricResult::new(0.4, 1.0),
            },
        ];
        let mean = mean_result(&evaluations);
        assert!((mean.lower_bound - 0.3).abs() < 1e-12);
        assert!((mean.upper_bound - 0.7).abs() < 1e-12);
        assert!((mean.residual() - 0.4).abs() < 1e-12);

        assert_eq!(mean_result(&[]), MetricResult::new(0.0, 0.0));
    }
}

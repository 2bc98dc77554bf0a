//! Evaluate command implementation.
//!
//! Loads both input files, then scores every observation run against the
//! reference.

use crate::input;
use anyhow::{Context, Result};
use rbstar_core::config::MetricConfig;
use rbstar_core::evaluation::{evaluate_queries, mean_result, QueryEvaluation};
use rbstar_core::metrics::MetricResult;
use std::path::Path;
use tracing::info;

/// Per-query bounds of one observation run and their mean.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub name: String,
    pub queries: Vec<QueryEvaluation>,
    pub mean: MetricResult,
}

/// Scores each run of `observation` against the reference.
///
/// The metric decides which shape each file is read as. When the reference
/// holds several runs only the first (by name) is used.
pub fn execute_evaluation(
    config: &MetricConfig,
    observation: &Path,
    reference: &Path,
) -> Result<Vec<RunReport>> {
    let metric = config.metric();
    let observations = input::load_evidence(observation, metric.observation_shape())?;
    let (reference_name, references) =
        input::select_reference(input::load_evidence(reference, metric.reference_shape())?)?;

    info!(
        "Evaluating {} with phi = {} against {} ({} queries)",
        metric,
        config.phi().value(),
        reference_name,
        references.len()
    );

    observations
        .iter()
        .map(|(name, queries)| {
            let evaluations = evaluate_queries(config, queries, &references)
                .with_context(|| format!("Failed to evaluate run {}", name))?;
            let mean = mean_result(&evaluations);
            info!("Run {}: {} queries", name, evaluations.len());
            Ok(RunReport {
                name: name.clone(),
                queries: evaluations,
                mean,
            })
        })
        .collect()
}

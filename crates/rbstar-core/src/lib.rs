//! # rbstar Core
//!
//! Rank-biased evaluation metrics with explicit uncertainty.
//!
//! Every metric reports a lower bound computed from the known data and an
//! upper bound under the most favourable completion of the unknown data. The
//! gap between them is the residual: how much the score could still move if
//! the rankings were longer or the judgments more complete.
//!
//! ## Modules
//!
//! - [`metrics`] - RBP, RBR, RBA and RBO with their bounds, plus metric dispatch
//! - [`ranking`] - Rankings as ordered tie-groups
//! - [`relevance`] - Positive and negative relevance judgments
//! - [`config`] - Persistence parameter and metric configuration
//! - [`evaluation`] - Parallel per-query evaluation and aggregation
//! - [`trec`] - TREC run and qrels readers
//! - [`error`] - Error types for metric input and file parsing

pub mod config;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod ranking;
pub mod relevance;
pub mod trec;

pub use config::{MetricConfig, Persistence, DEFAULT_PHI};
pub use error::{MetricError, TrecError};
pub use evaluation::{evaluate_queries, QueryEvaluation};
pub use metrics::{Evidence, Metric, MetricResult, Shape};
pub use ranking::Ranking;
pub use relevance::RelevanceSet;

//! Error types for rbstar-core.
//!
//! This module defines the errors raised across the core library: metric
//! input errors (shape, integrity and domain) and TREC parsing errors.

use crate::metrics::{Metric, Shape};
use thiserror::Error;

/// Errors raised by metric configuration, validation and dispatch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    /// An observation or reference has the wrong shape for the metric
    #[error("{metric} requires the {role} to be a {expected}, found a {found}")]
    ShapeMismatch {
        metric: Metric,
        role: &'static str,
        expected: Shape,
        found: Shape,
    },
    /// A ranking or relevance set contains the same element twice
    #[error("Duplicate element: {element}")]
    DuplicateElement { element: String },
    /// Persistence parameter outside the open interval (0, 1)
    #[error("Invalid persistence parameter: {0} (must be in the open interval (0, 1))")]
    InvalidPersistence(f64),
}

/// Errors that can occur while reading TREC run and qrels files.
#[derive(Debug, Error)]
pub enum TrecError {
    /// Failed to read the input file
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
    /// A line has the wrong number of fields for the detected format
    #[error("Malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
    /// A numeric field could not be parsed
    #[error("Invalid {field} on line {line}: {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    /// The input is neither a run nor a qrels file
    #[error("Unrecognized input format: expected 6 (run) or 4 (qrels) fields, found {0}")]
    UnknownFormat(usize),
    /// A query contains duplicate documents
    #[error("Invalid data for query {query_id}: {source}")]
    Integrity {
        query_id: String,
        #[source]
        source: MetricError,
    },
}

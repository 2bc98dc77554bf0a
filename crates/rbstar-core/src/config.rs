//! Metric configuration.
//!
//! Production constants plus the validated persistence parameter and the
//! immutable [`MetricConfig`] handed to every evaluation.
//!
//! # Usage
//!
//! ```
//! use rbstar_core::config::{MetricConfig, DEFAULT_PHI};
//! use rbstar_core::metrics::Metric;
//!
//! let config = MetricConfig::new(Metric::Overlap, DEFAULT_PHI).unwrap();
//! assert_eq!(config.phi().value(), 0.95);
//!
//! // Persistence must lie strictly between 0 and 1
//! assert!(MetricConfig::new(Metric::Overlap, 1.0).is_err());
//! ```

use crate::error::MetricError;
use crate::metrics::{Evidence, Metric, MetricResult};
use serde::Serialize;
use std::hash::Hash;

// =============================================================================
// Defaults
// =============================================================================

/// Default persistence parameter.
///
/// A user continues to the next rank with probability 0.95, giving an
/// expected viewing depth of 1 / (1 - 0.95) = 20 documents.
pub const DEFAULT_PHI: f64 = 0.95;

/// Minimum relevance grade for a judgment to count as positive.
///
/// Grades below the cutoff (including negative grades used by some
/// collections) are negative judgments.
pub const RELEVANCE_CUTOFF: i32 = 1;

// =============================================================================
// Persistence
// =============================================================================

/// The persistence parameter φ, guaranteed to lie in the open interval (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Persistence(f64);

impl Persistence {
    /// Validates `phi` and wraps it.
    ///
    /// Returns [`MetricError::InvalidPersistence`] for values outside (0, 1)
    /// and for NaN.
    pub fn new(phi: f64) -> Result<Self, MetricError> {
        if phi > 0.0 && phi < 1.0 {
            Ok(Self(phi))
        } else {
            Err(MetricError::InvalidPersistence(phi))
        }
    }

    /// Returns φ.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns 1 - φ, the weight of the first rank.
    pub fn complement(self) -> f64 {
        1.0 - self.0
    }
}

impl Default for Persistence {
    fn default() -> Self {
        Self(DEFAULT_PHI)
    }
}

impl TryFrom<f64> for Persistence {
    type Error = MetricError;

    fn try_from(phi: f64) -> Result<Self, Self::Error> {
        Self::new(phi)
    }
}

// =============================================================================
// Metric configuration
// =============================================================================

/// A metric together with the persistence it is evaluated under.
///
/// Immutable once built; shared freely across worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricConfig {
    metric: Metric,
    phi: Persistence,
}

impl MetricConfig {
    /// Creates a configuration, rejecting φ outside (0, 1).
    pub fn new(metric: Metric, phi: f64) -> Result<Self, MetricError> {
        Ok(Self {
            metric,
            phi: Persistence::new(phi)?,
        })
    }

    /// Creates a configuration from an already validated persistence.
    pub fn with_persistence(metric: Metric, phi: Persistence) -> Self {
        Self { metric, phi }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn phi(&self) -> Persistence {
        self.phi
    }

    /// Evaluates one query's observation against its reference.
    pub fn evaluate<E>(
        &self,
        observation: &Evidence<E>,
        reference: &Evidence<E>,
    ) -> Result<MetricResult, MetricError>
    where
        E: Clone + Eq + Hash + Ord,
    {
        self.metric.evaluate(observation, reference, self.phi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_accepts_open_interval() {
        for phi in [0.001, 0.5, 0.8, 0.95, 0.999] {
            let p = Persistence::new(phi).unwrap();
            assert_eq!(p.value(), phi);
            assert!((p.complement() - (1.0 - phi)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_persistence_rejects_out_of_range() {
        for phi in [0.0, 1.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            assert!(
                Persistence::new(phi).is_err(),
                "phi = {} should be rejected",
                phi
            );
        }
    }

    #[test]
    fn test_default_persistence() {
        assert_eq!(Persistence::default().value(), DEFAULT_PHI);
    }

    #[test]
    fn test_metric_config_rejects_invalid_phi() {
        let err = MetricConfig::new(Metric::Alignment, 1.2).unwrap_err();
        assert_eq!(err, MetricError::InvalidPersistence(1.2));
    }

    #[test]
    fn test_metric_config_accessors() {
        let config = MetricConfig::new(Metric::Recall, 0.8).unwrap();
        assert_eq!(config.metric(), Metric::Recall);
        assert_eq!(config.phi().value(), 0.8);
    }
}

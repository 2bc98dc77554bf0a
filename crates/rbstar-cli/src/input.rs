//! Loading observation and reference files.

use anyhow::{anyhow, Context, Result};
use rbstar_core::metrics::{Evidence, Shape};
use rbstar_core::trec::{QueryMap, TrecFile};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Per-query evidence of every run in a file, keyed by run name.
pub type RunEvidence = BTreeMap<String, QueryMap<Evidence<String>>>;

/// Reads a TREC file and converts it into evidence of the requested shape.
pub fn load_evidence(path: &Path, shape: Shape) -> Result<RunEvidence> {
    let file =
        TrecFile::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let evidence = file
        .evidence(shape)
        .with_context(|| format!("Invalid data in {}", path.display()))?;

    info!(
        "Loaded {} file {} ({} run{})",
        file.format_name(),
        path.display(),
        evidence.len(),
        if evidence.len() == 1 { "" } else { "s" }
    );
    Ok(evidence)
}

/// Picks the run to use as reference: the first by name.
pub fn select_reference(mut runs: RunEvidence) -> Result<(String, QueryMap<Evidence<String>>)> {
    let count = runs.len();
    let (name, queries) = runs
        .pop_first()
        .ok_or_else(|| anyhow!("Reference file contains no runs"))?;

    if count > 1 {
        info!("Reference holds {} runs, using {}", count, name);
    }
    Ok((name, queries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_evidence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1 Q0 a 1 2.0 alpha").unwrap();
        writeln!(file, "1 Q0 b 1 1.0 beta").unwrap();

        let runs = load_evidence(file.path(), Shape::Ranking).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs["alpha"]["1"].shape(), Shape::Ranking);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.run");
        let err = load_evidence(&path, Shape::Set).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read"));
    }

    #[test]
    fn test_load_reports_integrity_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1 0 a 1").unwrap();
        writeln!(file, "1 0 a 0").unwrap();

        let err = load_evidence(file.path(), Shape::Set).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Invalid data in"));
        assert!(message.contains("query 1"));
    }

    #[test]
    fn test_select_first_reference() {
        let mut runs = RunEvidence::new();
        runs.insert("zeta".to_string(), QueryMap::new());
        runs.insert("alpha".to_string(), QueryMap::new());

        let (name, _) = select_reference(runs).unwrap();
        assert_eq!(name, "alpha");
    }

    #[test]
    fn test_select_from_empty() {
        assert!(select_reference(RunEvidence::new()).is_err());
    }
}

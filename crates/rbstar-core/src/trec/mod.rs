//! # TREC Input
//!
//! Readers for the two whitespace-separated formats used by TREC-style
//! evaluation campaigns:
//!
//! | Format | Fields                          | Becomes                      |
//! |--------|---------------------------------|------------------------------|
//! | run    | `qid Q0 docid rank score tag`   | ranking or relevance set     |
//! | qrels  | `qid iter docid relevance`      | relevance set                |
//!
//! The format is detected from the field count of the first non-blank line.
//! Every line of the file must then have the same number of fields.
//!
//! ```
//! use rbstar_core::metrics::Shape;
//! use rbstar_core::trec::TrecFile;
//!
//! let file = TrecFile::parse("101 Q0 d1 1 2.0 bm25\n101 Q0 d2 2 1.0 bm25\n").unwrap();
//! let evidence = file.evidence(Shape::Ranking).unwrap();
//! assert_eq!(evidence["bm25"]["101"].shape(), Shape::Ranking);
//! ```

mod qrels;
mod run;

pub use qrels::{Judgment, Qrels, QRELS_FIELDS};
pub use run::{Run, ScoredDoc, RUN_FIELDS};

use crate::error::{MetricError, TrecError};
use crate::metrics::{Evidence, Shape};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Per-query values keyed by query id.
pub type QueryMap<T> = BTreeMap<String, T>;

/// Run name under which a qrels file's judgments are reported.
pub const QRELS_RUN_NAME: &str = "qrels";

/// A parsed TREC file of either format.
#[derive(Debug, Clone, PartialEq)]
pub enum TrecFile {
    Run(Run),
    Qrels(Qrels),
}

impl TrecFile {
    /// Reads and parses a file from disk.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, TrecError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let file = Self::parse(&text)?;
        debug!(path = %path.display(), format = file.format_name(), "loaded TREC file");
        Ok(file)
    }

    /// Parses file contents, detecting the format.
    pub fn parse(text: &str) -> Result<Self, TrecError> {
        let fields = text
            .lines()
            .map(|line| line.split_whitespace().count())
            .find(|&count| count > 0)
            .unwrap_or(0);

        let file = match fields {
            RUN_FIELDS => TrecFile::Run(Run::parse(text)?),
            QRELS_FIELDS => TrecFile::Qrels(Qrels::parse(text)?),
            other => return Err(TrecError::UnknownFormat(other)),
        };

        match &file {
            TrecFile::Run(run) => debug!(runs = run.len(), "parsed run file"),
            TrecFile::Qrels(qrels) => debug!(queries = qrels.len(), "parsed qrels file"),
        }
        Ok(file)
    }

    pub fn format_name(&self) -> &'static str {
        match self {
            TrecFile::Run(_) => "run",
            TrecFile::Qrels(_) => "qrels",
        }
    }

    /// Converts the file into metric input of the requested shape, keyed by
    /// run name then query id.
    ///
    /// A run file yields one entry per run tag. A qrels file always yields
    /// relevance sets under [`QRELS_RUN_NAME`], whatever shape is asked for,
    /// so a mismatched metric is reported by [`Metric::evaluate`].
    ///
    /// [`Metric::evaluate`]: crate::metrics::Metric::evaluate
    pub fn evidence(
        &self,
        shape: Shape,
    ) -> Result<BTreeMap<String, QueryMap<Evidence<String>>>, TrecError> {
        match (self, shape) {
            (TrecFile::Run(run), Shape::Ranking) => Ok(wrap(run.rankings()?)),
            (TrecFile::Run(run), Shape::Set) => Ok(wrap(run.relevance_sets()?)),
            (TrecFile::Qrels(qrels), _) => {
                let sets = qrels.relevance_sets()?;
                let mut runs = BTreeMap::new();
                runs.insert(
                    QRELS_RUN_NAME.to_string(),
                    sets.into_iter()
                        .map(|(query_id, set)| (query_id, Evidence::Set(set)))
                        .collect(),
                );
                Ok(runs)
            }
        }
    }
}

impl FromStr for TrecFile {
    type Err = TrecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

fn wrap<T>(runs: BTreeMap<String, QueryMap<T>>) -> BTreeMap<String, QueryMap<Evidence<String>>>
where
    T: Into<Evidence<String>>,
{
    runs.into_iter()
        .map(|(tag, queries)| {
            let queries = queries
                .into_iter()
                .map(|(query_id, value)| (query_id, value.into()))
                .collect();
            (tag, queries)
        })
        .collect()
}

/// Attaches the query id to a validation failure.
fn validated<T>(query_id: &str, check: Result<(), MetricError>, value: T) -> Result<T, TrecError> {
    check
        .map(|()| value)
        .map_err(|source| TrecError::Integrity {
            query_id: query_id.to_string(),
            source,
        })
}

fn parse_number<T: FromStr>(value: &str, field: &'static str, line: usize) -> Result<T, TrecError> {
    value.parse().map_err(|_| TrecError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}

//! TREC relevance judgments: `qid iter docid relevance`.

use super::{parse_number, validated, QueryMap};
use crate::error::TrecError;
use crate::relevance::RelevanceSet;
use std::collections::BTreeMap;

/// Number of whitespace-separated fields on a qrels line.
pub const QRELS_FIELDS: usize = 4;

/// A graded judgment of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judgment {
    pub doc_id: String,
    pub relevance: i32,
}

/// Judgments keyed by query id, in file order within each query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qrels {
    queries: BTreeMap<String, Vec<Judgment>>,
}

impl Qrels {
    /// Parses qrels lines. Blank lines are skipped; the iteration column is
    /// ignored.
    pub fn parse(text: &str) -> Result<Self, TrecError> {
        let mut qrels = Qrels::default();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != QRELS_FIELDS {
                return Err(TrecError::MalformedLine {
                    line: line_no,
                    reason: format!(
                        "expected {} fields (qid iter docid relevance), found {}",
                        QRELS_FIELDS,
                        fields.len()
                    ),
                });
            }

            let relevance: i32 = parse_number(fields[3], "relevance", line_no)?;
            qrels
                .queries
                .entry(fields[0].to_string())
                .or_default()
                .push(Judgment {
                    doc_id: fields[2].to_string(),
                    relevance,
                });
        }

        Ok(qrels)
    }

    /// Number of judged queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn judgments(&self, query_id: &str) -> Option<&[Judgment]> {
        self.queries.get(query_id).map(Vec::as_slice)
    }

    /// Splits each query's judgments into positive and negative elements.
    pub fn relevance_sets(&self) -> Result<QueryMap<RelevanceSet<String>>, TrecError> {
        let mut sets = BTreeMap::new();
        for (query_id, judgments) in &self.queries {
            let mut set = RelevanceSet::new();
            for judgment in judgments {
                set.add(judgment.doc_id.clone(), judgment.relevance);
            }
            let set = validated(query_id, set.validate(), set)?;
            sets.insert(query_id.clone(), set);
        }
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grades_split_at_cutoff() {
        let text = "1 0 a 2\n1 0 b 0\n1 0 c 1\n2 0 d -1\n";
        let sets = Qrels::parse(text).unwrap().relevance_sets().unwrap();

        assert_eq!(sets["1"].positives(), &["a".to_string(), "c".to_string()]);
        assert_eq!(sets["1"].negatives(), &["b".to_string()]);
        assert!(sets["2"].positives().is_empty());
        assert_eq!(sets["2"].negatives(), &["d".to_string()]);
    }

    #[test]
    fn test_judgments_keep_file_order() {
        let qrels = Qrels::parse("q 0 z 1\nq 0 y 0\n").unwrap();
        let judgments = qrels.judgments("q").unwrap();
        assert_eq!(judgments[0].doc_id, "z");
        assert_eq!(judgments[1].relevance, 0);
        assert!(qrels.judgments("missing").is_none());
    }

    #[test]
    fn test_conflicting_judgments_rejected() {
        let qrels = Qrels::parse("1 0 a 1\n1 0 a 0\n").unwrap();
        let err = qrels.relevance_sets().unwrap_err();
        assert!(matches!(err, TrecError::Integrity { ref query_id, .. } if query_id == "1"));
    }

    #[test]
    fn test_non_integer_relevance() {
        let err = Qrels::parse("1 0 a 0.5\n").unwrap_err();
        assert!(matches!(
            err,
            TrecError::InvalidNumber {
                line: 1,
                field: "relevance",
                ..
            }
        ));
    }
}

//! TREC run files: `qid Q0 docid rank score tag`.

use super::{parse_number, validated, QueryMap};
use crate::error::TrecError;
use crate::ranking::Ranking;
use crate::relevance::RelevanceSet;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Number of whitespace-separated fields on a run line.
pub const RUN_FIELDS: usize = 6;

/// One retrieved document and its system score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: String,
    pub score: f64,
}

/// Retrieved documents of one or more runs, keyed by run tag then query id.
///
/// The rank column is ignored: documents are ordered by score, and equal
/// scores form a tie-group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    runs: BTreeMap<String, BTreeMap<String, Vec<ScoredDoc>>>,
}

impl Run {
    /// Parses run lines. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, TrecError> {
        let mut run = Run::default();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != RUN_FIELDS {
                return Err(TrecError::MalformedLine {
                    line: line_no,
                    reason: format!(
                        "expected {} fields (qid Q0 docid rank score tag), found {}",
                        RUN_FIELDS,
                        fields.len()
                    ),
                });
            }

            let score: f64 = parse_number(fields[4], "score", line_no)?;
            run.runs
                .entry(fields[5].to_string())
                .or_default()
                .entry(fields[0].to_string())
                .or_default()
                .push(ScoredDoc {
                    doc_id: fields[2].to_string(),
                    score,
                });
        }

        Ok(run)
    }

    /// Run tags in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.runs.keys().map(String::as_str)
    }

    /// Number of distinct run tags.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Retrieved documents of `tag`, per query.
    pub fn documents(&self, tag: &str) -> Option<&BTreeMap<String, Vec<ScoredDoc>>> {
        self.runs.get(tag)
    }

    /// Builds one validated ranking per query for every run.
    pub fn rankings(&self) -> Result<BTreeMap<String, QueryMap<Ranking<String>>>, TrecError> {
        self.convert(rank_by_score, |query_id, ranking| {
            validated(query_id, ranking.validate(), ranking)
        })
    }

    /// Treats every retrieved document as a positive element, one set per
    /// query for every run.
    pub fn relevance_sets(
        &self,
    ) -> Result<BTreeMap<String, QueryMap<RelevanceSet<String>>>, TrecError> {
        self.convert(
            |docs| RelevanceSet::from_parts(docs.iter().map(|d| d.doc_id.clone()), Vec::new()),
            |query_id, set| validated(query_id, set.validate(), set),
        )
    }

    fn convert<T, B, V>(
        &self,
        mut build: B,
        mut validate: V,
    ) -> Result<BTreeMap<String, QueryMap<T>>, TrecError>
    where
        B: FnMut(&[ScoredDoc]) -> T,
        V: FnMut(&str, T) -> Result<T, TrecError>,
    {
        let mut converted = BTreeMap::new();
        for (tag, queries) in &self.runs {
            let mut per_query = BTreeMap::new();
            for (query_id, docs) in queries {
                let value = validate(query_id, build(docs))?;
                per_query.insert(query_id.clone(), value);
            }
            converted.insert(tag.clone(), per_query);
        }
        Ok(converted)
    }
}

/// Orders documents by descending score, grouping equal scores.
///
/// Members of a tie-group are sorted by document id.
fn rank_by_score(docs: &[ScoredDoc]) -> Ranking<String> {
    let mut sorted: Vec<&ScoredDoc> = docs.iter().collect();
    sorted.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.doc_id.cmp(&b.doc_id),
        other => other,
    });

    let mut ranking = Ranking::new();
    let mut group: Vec<String> = Vec::new();
    let mut group_score = None;
    for doc in sorted {
        if group_score != Some(doc.score) && !group.is_empty() {
            ranking.push_group(std::mem::take(&mut group));
        }
        group_score = Some(doc.score);
        group.push(doc.doc_id.clone());
    }
    ranking.push_group(group);
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricError;

    const SAMPLE: &str = "101 Q0 doc1 1 1.5 run1\n\
                          101 Q0 doc2 2 0.4 run1\n\
                          102 Q0 doc3 1 2.0 run1\n";

    #[test]
    fn test_parse_groups_by_tag_and_query() {
        let run = Run::parse(SAMPLE).unwrap();
        assert_eq!(run.names().collect::<Vec<_>>(), vec!["run1"]);

        let docs = run.documents("run1").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs["101"].len(), 2);
        assert_eq!(docs["102"][0].doc_id, "doc3");
    }

    #[test]
    fn test_rankings_sort_by_score_and_tie() {
        let text = "7 Q0 low 1 0.1 sys\n\
                    7 Q0 b 2 0.9 sys\n\
                    7 Q0 a 3 0.9 sys\n\
                    7 Q0 top 4 3.0 sys\n";
        let rankings = Run::parse(text).unwrap().rankings().unwrap();
        let ranking = &rankings["sys"]["7"];

        assert_eq!(
            ranking.groups(),
            &[
                vec!["top".to_string()],
                vec!["a".to_string(), "b".to_string()],
                vec!["low".to_string()],
            ]
        );
    }

    #[test]
    fn test_relevance_sets_mark_every_document_positive() {
        let sets = Run::parse(SAMPLE).unwrap().relevance_sets().unwrap();
        let set_101 = &sets["run1"]["101"];
        assert!(set_101.positive_set().contains(&"doc1".to_string()));
        assert!(set_101.positive_set().contains(&"doc2".to_string()));
        assert!(set_101.negatives().is_empty());

        let set_102 = &sets["run1"]["102"];
        assert!(set_102.positive_set().contains(&"doc3".to_string()));
        assert!(!set_102.negative_set().contains(&"doc3".to_string()));
    }

    #[test]
    fn test_duplicate_document_is_integrity_error() {
        let text = "101 Q0 doc1 1 1.5 run1\n\
                    101 Q0 doc2 2 0.4 run1\n\
                    101 Q0 doc1 3 0.3 run1\n";
        let run = Run::parse(text).unwrap();

        for err in [
            run.rankings().unwrap_err(),
            run.relevance_sets().unwrap_err(),
        ] {
            match err {
                TrecError::Integrity { query_id, source } => {
                    assert_eq!(query_id, "101");
                    assert_eq!(
                        source,
                        MetricError::DuplicateElement {
                            element: "doc1".to_string()
                        }
                    );
                }
                other => panic!("expected integrity error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_wrong_field_count() {
        let err = Run::parse("101 Q0 doc1 1 1.5\n").unwrap_err();
        assert!(matches!(err, TrecError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn test_invalid_score() {
        let err = Run::parse("\n101 Q0 doc1 1 high run1\n").unwrap_err();
        assert!(matches!(
            err,
            TrecError::InvalidNumber {
                line: 2,
                field: "score",
                ..
            }
        ));
    }
}

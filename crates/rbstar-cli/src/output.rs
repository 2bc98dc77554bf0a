//! Output formatting for evaluation reports.
//!
//! Supports human-readable terminal output, JSON for scripting and a LaTeX
//! `tabular` for papers.

use crate::evaluate::RunReport;
use rbstar_core::metrics::{Metric, MetricResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Decimal places in human and LaTeX output.
const PRECISION: usize = 4;

/// JSON output structure for an evaluation
#[derive(Serialize)]
pub struct JsonOutput {
    pub metric: Metric,
    pub phi: f64,
    pub runs: BTreeMap<String, JsonRun>,
}

/// Mean bounds of one run plus its per-query bounds
#[derive(Serialize)]
pub struct JsonRun {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub residual: f64,
    pub queries: BTreeMap<String, MetricResult>,
}

impl From<&RunReport> for JsonRun {
    fn from(report: &RunReport) -> Self {
        Self {
            lower_bound: report.mean.lower_bound,
            upper_bound: report.mean.upper_bound,
            residual: report.mean.residual(),
            queries: report
                .queries
                .iter()
                .map(|q| (q.query_id.clone(), q.result))
                .collect(),
        }
    }
}

/// Formats reports as JSON.
pub fn format_json(metric: Metric, phi: f64, reports: &[RunReport]) -> String {
    let output = JsonOutput {
        metric,
        phi,
        runs: reports
            .iter()
            .map(|report| (report.name.clone(), JsonRun::from(report)))
            .collect(),
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Formats the mean bounds of each run as a LaTeX table.
pub fn format_latex(metric: Metric, phi: f64, reports: &[RunReport]) -> String {
    let mut output = String::new();
    output.push_str(&format!("% {} with phi = {}\n", metric, phi));
    output.push_str("\\begin{tabular}{lrrr}\n");
    output.push_str("\\hline\n");
    output.push_str("Run & Lower & Upper & Residual \\\\\n");
    output.push_str("\\hline\n");
    for report in reports {
        output.push_str(&format!(
            "{} & {:.p$} & {:.p$} & {:.p$} \\\\\n",
            latex_escape(&report.name),
            report.mean.lower_bound,
            report.mean.upper_bound,
            report.mean.residual(),
            p = PRECISION
        ));
    }
    output.push_str("\\hline\n");
    output.push_str("\\end{tabular}");
    output
}

/// Formats reports for human-readable terminal output.
pub fn format_human(metric: Metric, phi: f64, reports: &[RunReport]) -> String {
    if reports.is_empty() {
        return format!("No runs evaluated for {}", metric);
    }

    let width = reports
        .iter()
        .flat_map(|r| r.queries.iter().map(|q| q.query_id.len()))
        .chain(std::iter::once("mean".len()))
        .max()
        .unwrap_or(4);

    let mut output = String::new();
    output.push_str(&format!("{} (phi = {})\n", metric, phi));

    for report in reports {
        output.push_str(&format!("\n{}\n", report.name));
        for query in &report.queries {
            output.push_str(&format_row(&query.query_id, &query.result, width));
        }
        output.push_str(&format_row("mean", &report.mean, width));
    }

    output.trim_end().to_string()
}

fn format_row(label: &str, result: &MetricResult, width: usize) -> String {
    format!(
        "  {:<w$}  lower {:.p$}  upper {:.p$}  residual {:.p$}\n",
        label,
        result.lower_bound,
        result.upper_bound,
        result.residual(),
        w = width,
        p = PRECISION
    )
}

/// Escapes characters LaTeX treats specially in text mode.
fn latex_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\\' => escaped.push_str("\\textbackslash{}"),
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbstar_core::evaluation::QueryEvaluation;

    fn make_report(name: &str, rows: &[(&str, f64, f64)]) -> RunReport {
        let queries: Vec<QueryEvaluation> = rows
            .iter()
            .map(|&(query_id, lower, upper)| QueryEvaluation {
                query_id: query_id.to_string(),
                result: MetricResult::new(lower, upper),
            })
            .collect();
        let n = queries.len() as f64;
        let mean = MetricResult::new(
            queries.iter().map(|q| q.result.lower_bound).sum::<f64>() / n,
            queries.iter().map(|q| q.result.upper_bound).sum::<f64>() / n,
        );
        RunReport {
            name: name.to_string(),
            queries,
            mean,
        }
    }

    #[test]
    fn test_format_json() {
        let reports = vec![make_report("run1", &[("101", 0.25, 0.5), ("102", 0.75, 1.0)])];
        let output = format_json(Metric::Precision, 0.95, &reports);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["metric"], "RBP");
        assert_eq!(value["phi"], 0.95);
        let run = &value["runs"]["run1"];
        assert_eq!(run["lower_bound"], 0.5);
        assert_eq!(run["upper_bound"], 0.75);
        assert_eq!(run["residual"], 0.25);
        assert_eq!(run["queries"]["101"]["residual"], 0.25);
        assert_eq!(run["queries"]["102"]["upper_bound"], 1.0);
    }

    #[test]
    fn test_format_latex() {
        let reports = vec![
            make_report("run_a", &[("1", 0.1, 0.2)]),
            make_report("run2", &[("1", 0.3, 0.3)]),
        ];
        let output = format_latex(Metric::Overlap, 0.9, &reports);

        assert!(output.contains("\\begin{tabular}{lrrr}"));
        assert!(output.contains("run\\_a & 0.1000 & 0.2000 & 0.1000 \\\\"));
        assert!(output.contains("run2 & 0.3000 & 0.3000 & 0.0000 \\\\"));
        assert!(output.ends_with("\\end{tabular}"));
    }

    #[test]
    fn test_format_human() {
        let reports = vec![make_report("bm25", &[("101", 0.5, 0.625)])];
        let output = format_human(Metric::Alignment, 0.8, &reports);

        assert!(output.starts_with("RBA (phi = 0.8)"));
        assert!(output.contains("bm25"));
        assert!(output.contains("101   lower 0.5000  upper 0.6250  residual 0.1250"));
        assert!(output.contains("mean  lower 0.5000"));
    }

    #[test]
    fn test_format_human_empty() {
        let output = format_human(Metric::Recall, 0.9, &[]);
        assert!(output.contains("No runs evaluated"));
    }

    #[test]
    fn test_latex_escape() {
        assert_eq!(latex_escape("a_b&c"), "a\\_b\\&c");
        assert_eq!(latex_escape("50%"), "50\\%");
        assert_eq!(latex_escape("plain"), "plain");
    }
}

//! rbstar CLI - Rank-biased evaluation of TREC runs.
//!
//! # Usage
//!
//! ```bash
//! # Precision of every run in a run file against relevance judgments
//! rbstar -m rbp -o runs.trec -r judgments.qrels
//!
//! # Overlap between two systems, as JSON
//! rbstar -m rbo -o system_a.trec -r system_b.trec --json
//!
//! # LaTeX table with a custom persistence
//! rbstar -m rba -o runs.trec -r baseline.trec -p 0.8 --latex
//!
//! # Show help
//! rbstar --help
//! ```

mod evaluate;
mod input;
mod output;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rbstar_core::config::{MetricConfig, DEFAULT_PHI};
use rbstar_core::metrics::Metric;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Metric names accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    /// Rank-Biased Precision: observation ranking, reference judgments
    Rbp,
    /// Rank-Biased Recall: observation judgments, reference ranking
    Rbr,
    /// Rank-Biased Alignment: two rankings
    Rba,
    /// Rank-Biased Overlap: two rankings
    Rbo,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Rbp => Metric::Precision,
            MetricArg::Rbr => Metric::Recall,
            MetricArg::Rba => Metric::Alignment,
            MetricArg::Rbo => Metric::Overlap,
        }
    }
}

/// Rank-biased metrics with residual bounds.
///
/// Scores each run of the observation file against the reference and
/// reports lower and upper bounds, so the effect of unjudged documents and
/// truncated rankings stays visible.
#[derive(Parser)]
#[command(name = "rbstar", version, about)]
struct Cli {
    /// Metric to compute
    #[arg(short, long, value_enum)]
    metric: MetricArg,

    /// Observation file (TREC run or qrels)
    #[arg(short, long)]
    observation: PathBuf,

    /// Reference file (TREC run or qrels)
    #[arg(short, long)]
    reference: PathBuf,

    /// Persistence parameter, strictly between 0 and 1
    #[arg(short, long, env = "RBSTAR_PHI", default_value_t = DEFAULT_PHI)]
    phi: f64,

    /// Output results as JSON
    #[arg(long, conflicts_with = "latex")]
    json: bool,

    /// Output a LaTeX table of per-run means
    #[arg(long)]
    latex: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only results
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let metric = Metric::from(cli.metric);
    let config = MetricConfig::new(metric, cli.phi)?;
    let reports = evaluate::execute_evaluation(&config, &cli.observation, &cli.reference)?;

    let phi = config.phi().value();
    let output = if cli.json {
        output::format_json(metric, phi, &reports)
    } else if cli.latex {
        output::format_latex(metric, phi, &reports)
    } else {
        output::format_human(metric, phi, &reports)
    };

    println!("{}", output);
    Ok(())
}

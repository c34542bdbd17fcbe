//! CLI command definitions and handlers

mod analyze;
mod init;

pub use analyze::AnalyzeOptions;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (0 = auto, at most 64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Parse a score threshold in [0, 100]
fn parse_score(s: &str) -> Result<f64, String> {
    let score: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid score", s))?;
    if (0.0..=100.0).contains(&score) {
        Ok(score)
    } else {
        Err("score must be between 0 and 100".to_string())
    }
}

/// sitehealth - composite website health scoring
#[derive(Parser, Debug)]
#[command(name = "sitehealth")]
#[command(
    version,
    about = "Composite website health scoring across content, technical SEO, links, keywords, mobile, performance, ads, search console and analytics",
    long_about = "sitehealth scores a website on nine independent dimensions, combines them \
into one overall score and rating, and merges every dimension's advice into a single \
prioritized list of recommendations.\n\n\
Facts come from a recorded snapshot (--facts) or are generated deterministically \
from a seed (--seed) for demos.",
    after_help = "\
Examples:
  sitehealth analyze --facts site.json              Score a recorded facts snapshot
  sitehealth analyze --seed 42 --url https://a.test Score synthetic facts
  sitehealth analyze --facts site.json -f json      JSON output for scripting
  sitehealth init                                   Write a sitehealth.toml"
)]
pub struct Cli {
    /// Directory holding sitehealth.toml (default: current directory)
    #[arg(long, short = 'C', global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long, global = true, value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: Option<String>,

    /// Number of provider threads (0 = auto)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a sitehealth.toml config file with default settings
    Init {
        /// Overwrite an existing sitehealth.toml
        #[arg(long)]
        force: bool,
    },

    /// Score a site and print the composite report
    #[command(after_help = "\
Examples:
  sitehealth analyze --facts site.json                       Score a recorded snapshot
  sitehealth analyze --facts site.json --format markdown -o report.md
  sitehealth analyze --seed 7 --url https://shop.example.com Synthetic facts
  sitehealth analyze --facts site.json --skip ads --skip analytics
  sitehealth analyze --facts site.json --order impact --cap 5
  sitehealth analyze --facts site.json --fail-under 70      Exit code 1 below 70 (CI mode)
  sitehealth analyze --facts site.json --explain-score      Show the scoring breakdown")]
    Analyze {
        /// Facts snapshot JSON to score
        #[arg(long, value_name = "SNAPSHOT")]
        facts: Option<PathBuf>,

        /// Generate deterministic synthetic facts from this seed
        #[arg(long, conflicts_with = "facts")]
        seed: Option<u64>,

        /// Subject URL (default: the snapshot's url)
        #[arg(long)]
        url: Option<String>,

        /// Subject domain (default: derived from the URL)
        #[arg(long)]
        domain: Option<String>,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', value_parser = ["text", "json", "markdown", "md"])]
        format: Option<String>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Maximum recommendations in the report
        #[arg(long)]
        cap: Option<usize>,

        /// Recommendation order: priority or impact
        #[arg(long, value_parser = ["priority", "impact"])]
        order: Option<String>,

        /// Seconds each dimension's fetch may run, from when it starts, before it is marked as failed
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Skip a dimension (repeatable)
        #[arg(long, value_name = "DIMENSION")]
        skip: Vec<String>,

        /// Exit with code 1 when the overall score is below this value
        #[arg(long, value_parser = parse_score)]
        fail_under: Option<f64>,

        /// Show how the overall score was computed
        #[arg(long)]
        explain_score: bool,
    },
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { force } => init::run(&cli.dir, force),

        Commands::Analyze {
            facts,
            seed,
            url,
            domain,
            format,
            compact,
            output,
            cap,
            order,
            timeout,
            skip,
            fail_under,
            explain_score,
        } => analyze::run(
            &cli.dir,
            AnalyzeOptions {
                facts,
                seed,
                url,
                domain,
                format,
                compact,
                output,
                cap,
                order,
                timeout,
                skip,
                fail_under,
                explain_score,
            },
            cli.workers,
        ),
    }
}

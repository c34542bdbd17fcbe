//! Analyze command - score a site and render the composite report

use crate::config::{load_project_config, ProjectConfig};
use crate::context::{domain_of, RunContext};
use crate::facts::{FactProvider, FactSnapshot, SeededProvider};
use crate::models::{CompositeReport, Dimension};
use crate::pipeline::Analyzer;
use crate::reporters::{self, OutputFormat};
use crate::scoring::{self, MergeOptions};
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Subject used for seeded runs without `--url`
const DEFAULT_SEED_URL: &str = "https://example.com/";

/// Flags of the analyze command, before config defaults are applied
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub facts: Option<PathBuf>,
    pub seed: Option<u64>,
    pub url: Option<String>,
    pub domain: Option<String>,
    pub format: Option<String>,
    pub compact: bool,
    pub output: Option<PathBuf>,
    pub cap: Option<usize>,
    pub order: Option<String>,
    pub timeout: Option<u64>,
    pub skip: Vec<String>,
    pub fail_under: Option<f64>,
    pub explain_score: bool,
}

/// Settings after merging flags over sitehealth.toml
#[derive(Debug)]
struct EffectiveSettings {
    format: OutputFormat,
    merge: MergeOptions,
    timeout: Duration,
    workers: usize,
    dimensions: Vec<Dimension>,
    fail_under: Option<f64>,
}

/// Run the analyze command
pub fn run(dir: &Path, opts: AnalyzeOptions, workers: Option<usize>) -> Result<()> {
    let start_time = Instant::now();
    let config = load_project_config(dir);
    let settings = apply_config_defaults(&opts, &config, workers)?;

    let (ctx, providers) = build_providers(&opts, &settings.dimensions)?;
    info!(
        "Analyzing {} ({} dimensions)",
        ctx.subject_url,
        settings.dimensions.len()
    );

    let bar = ProgressBar::new(settings.dimensions.len() as u64);
    bar.set_style(create_bar_style());
    bar.set_message("Fetching facts...");
    let progress = bar.clone();

    let analyzer = Analyzer::new(settings.workers)
        .with_timeout(settings.timeout)
        .with_providers(providers)
        .with_progress_callback(Box::new(move |dimension: Dimension, done: usize, _total: usize| {
            progress.set_position(done as u64);
            progress.set_message(dimension.label());
        }));
    let report = analyzer.analyze(&ctx, &settings.merge)?;
    bar.finish_and_clear();

    let rendered = if settings.format == OutputFormat::Json && opts.compact {
        reporters::render_json_compact(&report)?
    } else {
        reporters::report_with_format(&report, settings.format)?
    };

    match &opts.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => print!("{rendered}"),
    }

    if opts.explain_score {
        // Keep machine-readable stdout parseable
        if settings.format == OutputFormat::Text && opts.output.is_none() {
            println!("\n{}", style("─".repeat(60)).dim());
            println!("{}", scoring::explain(&report));
        } else {
            eprintln!("{}", scoring::explain(&report));
        }
    }

    info!("Analysis complete in {:.2}s", start_time.elapsed().as_secs_f64());

    check_fail_threshold(settings.fail_under, &report);
    Ok(())
}

/// Flags win over sitehealth.toml, which wins over built-in defaults
fn apply_config_defaults(
    opts: &AnalyzeOptions,
    config: &ProjectConfig,
    workers: Option<usize>,
) -> Result<EffectiveSettings> {
    let format = opts
        .format
        .as_deref()
        .or(config.defaults.format.as_deref())
        .unwrap_or("text")
        .parse::<OutputFormat>()?;

    let mut merge = config.merge_options();
    if let Some(cap) = opts.cap {
        merge.cap = cap;
    }
    if let Some(order) = &opts.order {
        merge.order = order.parse()?;
    }

    let mut disabled = config.disabled_dimensions();
    for name in &opts.skip {
        disabled.push(name.parse::<Dimension>()?);
    }
    let dimensions = Dimension::ALL
        .into_iter()
        .filter(|d| !disabled.contains(d))
        .collect();

    Ok(EffectiveSettings {
        format,
        merge,
        timeout: opts
            .timeout
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.providers.timeout()),
        workers: workers.or(config.providers.workers).unwrap_or(0),
        dimensions,
        fail_under: opts.fail_under.or(config.defaults.fail_under),
    })
}

/// Run context and one provider per dimension, from a snapshot or a seed
fn build_providers(
    opts: &AnalyzeOptions,
    dimensions: &[Dimension],
) -> Result<(RunContext, Vec<Arc<dyn FactProvider>>)> {
    match (&opts.facts, opts.seed) {
        (Some(path), _) => {
            let snapshot = FactSnapshot::load(path)
                .with_context(|| format!("Failed to load facts from {}", path.display()))?;
            let url = opts
                .url
                .clone()
                .or_else(|| snapshot.url.clone())
                .context("No subject URL: pass --url or record \"url\" in the snapshot")?;
            let domain = opts
                .domain
                .clone()
                .or_else(|| snapshot.domain.clone())
                .unwrap_or_else(|| domain_of(&url));
            let providers = Arc::new(snapshot).providers(dimensions);
            Ok((RunContext::new(url, domain), providers))
        }
        (None, Some(seed)) => {
            let url = opts
                .url
                .clone()
                .unwrap_or_else(|| DEFAULT_SEED_URL.to_string());
            let domain = opts.domain.clone().unwrap_or_else(|| domain_of(&url));
            Ok((
                RunContext::new(url, domain),
                SeededProvider::all(seed, dimensions),
            ))
        }
        (None, None) => {
            anyhow::bail!("Nothing to analyze: pass --facts <SNAPSHOT> or --seed <N>")
        }
    }
}

/// Create bar progress style
fn create_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|s| s.progress_chars("█▓▒░  "))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// A score equal to the threshold passes
fn fails_threshold(fail_under: Option<f64>, score: f64) -> bool {
    fail_under.is_some_and(|threshold| score < threshold)
}

/// Exit with code 1 when the overall score is below the threshold
fn check_fail_threshold(fail_under: Option<f64>, report: &CompositeReport) {
    if let Some(threshold) = fail_under {
        if fails_threshold(fail_under, report.overall_score) {
            eprintln!(
                "Failing: overall score {:.1} is below --fail-under={}",
                report.overall_score, threshold
            );
            std::process::exit(1);
        }
    }
}

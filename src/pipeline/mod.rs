//! Concurrent analysis pipeline
//!
//! The `Analyzer` fetches facts for every registered dimension at once and
//! turns them into scored results:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Analyzer                          │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Spawn one fetch per provider (rayon pool)           │
//! │  2. Fan in over a channel, timing each fetch from start │
//! │  3. Err / panic / timeout -> status=error result        │
//! │  4. Score the facts that arrived                        │
//! │  5. Hand the full result map to the assembler           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregation never starts before every dimension has either reported or
//! been marked failed. Raising the run's cancel flag aborts collection and
//! discards whatever arrived.

use crate::context::RunContext;
use crate::facts::{DimensionFacts, FactProvider};
use crate::models::{CompositeReport, Dimension, DimensionResult};
use crate::scorers;
use crate::scoring::{self, MergeOptions};
use crossbeam_channel::RecvTimeoutError;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Per-dimension fetch budget when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How often the collector wakes to check for cancellation
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Called as each dimension's facts arrive: (dimension, done, total)
pub type ProgressCallback = Box<dyn Fn(Dimension, usize, usize) + Send + Sync>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("analysis cancelled")]
    Cancelled,

    #[error("failed to start provider workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Outcome of one provider call, reduced to what scoring needs
type Fetched = Result<DimensionFacts, String>;

/// Messages from provider workers to the collector
enum FetchEvent {
    Started(Dimension, Instant),
    Finished(Dimension, Fetched),
}

/// Runs fact providers concurrently and scores what they return
pub struct Analyzer {
    providers: Vec<Arc<dyn FactProvider>>,
    workers: usize,
    timeout: Duration,
    progress_callback: Option<ProgressCallback>,
}

impl Analyzer {
    /// Create an analyzer
    ///
    /// # Arguments
    /// * `workers` - Number of provider threads (0 = auto-detect)
    pub fn new(workers: usize) -> Self {
        let actual_workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(16)
        } else {
            workers
        };

        Self {
            providers: Vec::new(),
            workers: actual_workers,
            timeout: DEFAULT_TIMEOUT,
            progress_callback: None,
        }
    }

    /// Register a provider. A second provider for the same dimension is ignored.
    pub fn with_provider(mut self, provider: Arc<dyn FactProvider>) -> Self {
        let dimension = provider.dimension();
        if self.providers.iter().any(|p| p.dimension() == dimension) {
            warn!(
                "Ignoring provider {}: {} already has one",
                provider.name(),
                dimension
            );
        } else {
            debug!("Registering provider {} for {}", provider.name(), dimension);
            self.providers.push(provider);
        }
        self
    }

    pub fn with_providers(self, providers: impl IntoIterator<Item = Arc<dyn FactProvider>>) -> Self {
        providers
            .into_iter()
            .fold(self, |analyzer, provider| analyzer.with_provider(provider))
    }

    /// Time each fetch may take, counted from when a worker starts it
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Drop the providers of disabled dimensions so they are never fetched
    pub fn without(mut self, disabled: &[Dimension]) -> Self {
        self.providers.retain(|p| !disabled.contains(&p.dimension()));
        self
    }

    /// Dimensions that will be fetched, in priority order
    pub fn dimensions(&self) -> Vec<Dimension> {
        let mut dims: Vec<Dimension> = self.providers.iter().map(|p| p.dimension()).collect();
        dims.sort();
        dims
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Fetch and score every registered dimension.
    ///
    /// Every registered dimension appears in the result: scored from its
    /// facts, or with `status=error` when its provider failed, panicked or
    /// ran past the timeout.
    ///
    /// At most `workers` fetches run at once. Each dimension's clock starts
    /// when its fetch gets a slot, so time spent queued behind other
    /// providers does not count against it. A fetch that times out gives up
    /// its slot even though its thread may still be blocked.
    pub fn run(&self, ctx: &RunContext) -> Result<BTreeMap<Dimension, DimensionResult>, PipelineError> {
        let _entered = ctx.span().enter();
        if ctx.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let start = Instant::now();
        let total = self.providers.len();
        info!(
            "Fetching {} dimensions on {} workers (timeout {:?} each)",
            total, self.workers, self.timeout
        );

        // One thread per provider so a hung fetch never holds up a queued
        // one; the slot channel bounds how many fetch at once
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(total.max(1))
            .thread_name(|i| format!("sitehealth-provider-{i}"))
            .build()?;

        let (slot_tx, slot_rx) = crossbeam_channel::unbounded::<()>();
        for _ in 0..self.workers {
            let _ = slot_tx.send(());
        }

        let (tx, rx) = crossbeam_channel::unbounded::<FetchEvent>();
        let mut queued: BTreeMap<Dimension, String> = BTreeMap::new();
        for provider in &self.providers {
            queued.insert(provider.dimension(), provider.name().to_string());
            let provider = Arc::clone(provider);
            let tx = tx.clone();
            let slots = slot_rx.clone();
            let ctx = ctx.clone();
            pool.spawn(move || {
                // Slot sender is dropped once the run has finished or been cancelled
                if slots.recv().is_err() || ctx.is_cancelled() {
                    return;
                }
                let dimension = provider.dimension();
                let _ = tx.send(FetchEvent::Started(dimension, Instant::now()));
                let fetched = ctx.span().in_scope(|| fetch_one(provider.as_ref(), &ctx));
                let _ = tx.send(FetchEvent::Finished(dimension, fetched));
            });
        }
        drop(tx);

        // Started fetches and when each one expires
        let mut running: BTreeMap<Dimension, (String, Instant)> = BTreeMap::new();
        // Timed-out fetches whose thread is still blocked
        let mut stuck: BTreeSet<Dimension> = BTreeSet::new();
        let mut arrived: BTreeMap<Dimension, Fetched> = BTreeMap::new();
        let mut failed: BTreeMap<Dimension, String> = BTreeMap::new();

        while !queued.is_empty() || !running.is_empty() {
            if ctx.is_cancelled() {
                warn!(
                    "Analysis cancelled with {} dimensions outstanding",
                    queued.len() + running.len()
                );
                return Err(PipelineError::Cancelled);
            }

            let mut wake = Instant::now() + CANCEL_POLL;
            if let Some(expiry) = running.values().map(|(_, expiry)| *expiry).min() {
                wake = wake.min(expiry);
            }
            match rx.recv_deadline(wake) {
                Ok(FetchEvent::Started(dimension, at)) => {
                    if let Some(name) = queued.remove(&dimension) {
                        running.insert(dimension, (name, at + self.timeout));
                    }
                }
                Ok(FetchEvent::Finished(dimension, fetched)) => {
                    if running.remove(&dimension).is_some() {
                        let _ = slot_tx.send(());
                        arrived.insert(dimension, fetched);
                        self.report_progress(dimension, arrived.len() + failed.len(), total);
                    } else if stuck.remove(&dimension) {
                        debug!("Discarding late {} facts", dimension);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            let now = Instant::now();
            let expired: Vec<Dimension> = running
                .iter()
                .filter(|(_, (_, expiry))| *expiry <= now)
                .map(|(dimension, _)| *dimension)
                .collect();
            for dimension in expired {
                if let Some((name, _)) = running.remove(&dimension) {
                    warn!("Provider {} for {} timed out", name, dimension);
                    failed.insert(dimension, format!("{name} timed out after {:?}", self.timeout));
                    stuck.insert(dimension);
                    let _ = slot_tx.send(());
                    self.report_progress(dimension, arrived.len() + failed.len(), total);
                }
            }
        }
        drop(slot_tx);
        if ctx.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let unreported = queued
            .into_iter()
            .chain(running.into_iter().map(|(dimension, (name, _))| (dimension, name)));
        for (dimension, name) in unreported {
            failed.insert(dimension, format!("{name} stopped without reporting"));
        }

        let mut results = BTreeMap::new();
        for (dimension, cause) in failed {
            results.insert(dimension, DimensionResult::provider_failure(dimension, cause));
        }
        for (dimension, fetched) in arrived {
            let result = match fetched {
                Ok(facts) => scorers::score(dimension, &facts),
                Err(cause) => DimensionResult::provider_failure(dimension, cause),
            };
            debug!("{} scored {:.1} ({})", dimension, result.score, result.status);
            results.insert(dimension, result);
        }

        info!(
            "Collected {} dimensions in {:?}",
            results.len(),
            start.elapsed()
        );
        Ok(results)
    }

    fn report_progress(&self, dimension: Dimension, done: usize, total: usize) {
        if let Some(ref callback) = self.progress_callback {
            callback(dimension, done, total);
        }
    }

    /// Run every provider and assemble the composite report
    pub fn analyze(&self, ctx: &RunContext, options: &MergeOptions) -> Result<CompositeReport, PipelineError> {
        let results = self.run(ctx)?;
        let _entered = ctx.span().enter();
        Ok(scoring::assemble(
            &ctx.subject_url,
            &ctx.subject_domain,
            results,
            options,
        ))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Call one provider, turning errors and panics into a failure cause
fn fetch_one(provider: &dyn FactProvider, ctx: &RunContext) -> Fetched {
    let name = provider.name().to_string();
    let start = Instant::now();
    debug!("Fetching {} facts from {}", provider.dimension(), name);

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| provider.fetch(ctx)));
    match outcome {
        Ok(Ok(facts)) => {
            debug!("Provider {} returned in {:?}", name, start.elapsed());
            Ok(facts)
        }
        Ok(Err(e)) => {
            warn!("Provider {} failed: {}", name, e);
            Err(e.to_string())
        }
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            error!("Provider {} panicked: {}", name, panic_msg);
            Err(format!("{name} panicked: {panic_msg}"))
        }
    }
}

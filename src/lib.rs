//! sitehealth - composite website health scoring
//!
//! Scores a site on nine independent dimensions, combines the scores into
//! one overall score and rating, and merges every dimension's advice into
//! a single deduplicated, prioritized recommendation list.
//!
//! ```text
//! FactProvider ──► Analyzer (concurrent fetch) ──► scorers ──► scoring::assemble ──► CompositeReport
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod facts;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scorers;
pub mod scoring;

pub use context::RunContext;
pub use models::{CompositeReport, Dimension, DimensionResult, DimensionStatus, Rating};
pub use pipeline::{Analyzer, PipelineError};
